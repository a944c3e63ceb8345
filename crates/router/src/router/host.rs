use crate::router::{DefaultRouter, Router};
use crate::{HandlerChain, RequestContext, Route, RouteError, RouteInfo, RouteMethod, Routes};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Picks a router by the request host before any path matching happens.
///
/// Hosts are compared exactly, port included, against the `Host` header (or
/// the URI authority). Requests for an unregistered host, or without one, go
/// to the default router. Every host owns its router, trees are never shared.
///
/// `add`, `remove` and `routes` of the [`Router`] impl act on the default
/// router; per-host routes are registered through [`HostRouter::host_mut`].
#[derive(Debug, Default)]
pub struct HostRouter<R = DefaultRouter> {
    hosts: HashMap<String, R>,
    default: R,
}

impl<R: Router> HostRouter<R> {
    pub fn new(default: R) -> Self {
        Self { hosts: HashMap::new(), default }
    }

    /// Registers `router` for `host`, returning the router it replaces.
    pub fn host(&mut self, host: impl Into<String>, router: R) -> Option<R> {
        let host = host.into();
        debug!(host = %host, "host router registered");
        self.hosts.insert(host, router)
    }

    pub fn host_mut(&mut self, host: &str) -> Option<&mut R> {
        self.hosts.get_mut(host)
    }

    pub fn remove_host(&mut self, host: &str) -> Option<R> {
        let removed = self.hosts.remove(host);
        if removed.is_some() {
            debug!(host, "host router removed");
        }
        removed
    }

    pub fn default_router(&self) -> &R {
        &self.default
    }

    pub fn default_router_mut(&mut self) -> &mut R {
        &mut self.default
    }

    /// The router serving `host`.
    pub fn resolve(&self, host: Option<&str>) -> &R {
        match host.and_then(|host| self.hosts.get(host)) {
            Some(router) => router,
            None => {
                trace!(host, "no router for host, using default");
                &self.default
            }
        }
    }

    /// Registered host names, in no particular order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }
}

impl<R: Router> Router for HostRouter<R> {
    fn add(&mut self, route: Route) -> Result<RouteInfo, RouteError> {
        self.default.add(route)
    }

    fn remove(&mut self, method: &RouteMethod, path: &str) -> Result<(), RouteError> {
        self.default.remove(method, path)
    }

    fn routes(&self) -> Routes {
        self.default.routes()
    }

    fn route(&self, req: &mut RequestContext) -> Arc<HandlerChain> {
        self.resolve(req.host()).route(req)
    }
}
