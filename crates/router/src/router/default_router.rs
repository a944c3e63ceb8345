use crate::handler::{MethodNotAllowedHandler, NotFoundHandler, OptionsHandler};
use crate::router::pattern;
use crate::router::tree::Tree;
use crate::{
    HandlerChain, PathParams, RequestContext, RequestHandler, Route, RouteError, RouteInfo, RouteMethod, Router, Routes,
};
use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// The outcome of matching a method and a path.
#[derive(Debug, Clone)]
pub enum RouteMatch {
    /// A route matched, its params were pushed into the given [`PathParams`].
    Found(Arc<RouteInfo>),
    /// An `OPTIONS` request for a path registered under the listed methods.
    Options(Vec<Method>),
    /// The path is registered, but only under the listed methods.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Radix tree router holding one tree per method.
///
/// Lookup order for a request:
///
/// 1. the tree of the request method
/// 2. the tree of [`RouteMethod::Any`]
/// 3. the trees of the other methods: a match there answers `OPTIONS`
///    requests through the options handler and everything else with `405`
/// 4. the tree of [`RouteMethod::NotFound`]
/// 5. the not-found handler
///
/// `DefaultRouter` is not synchronized, see [`ConcurrentRouter`](crate::ConcurrentRouter).
#[derive(Debug)]
pub struct DefaultRouter {
    trees: Vec<(RouteMethod, Tree)>,
    routes: Vec<Arc<RouteInfo>>,
    max_params: usize,
    allow_overwriting_route: bool,
    auto_options: bool,
    not_found: Arc<HandlerChain>,
    method_not_allowed: Arc<HandlerChain>,
    options: Arc<HandlerChain>,
}

impl Default for DefaultRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultRouter {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// The largest number of params any route registered so far declares.
    ///
    /// Sizing [`PathParams`] with it avoids reallocation while routing.
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Matches `method` and the raw `path`, pushing captured params into `params`.
    pub fn lookup(&self, method: &Method, path: &str, params: &mut PathParams) -> RouteMatch {
        let found = self
            .trees
            .iter()
            .find(|(route_method, _)| route_method == method)
            .and_then(|(_, tree)| tree.find(path, params))
            .or_else(|| self.tree(&RouteMethod::Any).and_then(|tree| tree.find(path, params)));
        if let Some(route) = found {
            return RouteMatch::Found(Arc::clone(route));
        }

        let allowed = self.allowed_methods(method, path);
        if !allowed.is_empty() {
            trace!(%method, path, ?allowed, "path is registered for other methods");
            return if self.auto_options && *method == Method::OPTIONS {
                RouteMatch::Options(allowed)
            } else {
                RouteMatch::MethodNotAllowed(allowed)
            };
        }

        if let Some(route) = self.tree(&RouteMethod::NotFound).and_then(|tree| tree.find(path, params)) {
            return RouteMatch::Found(Arc::clone(route));
        }

        trace!(%method, path, "no route matched");
        RouteMatch::NotFound
    }

    fn allowed_methods(&self, method: &Method, path: &str) -> Vec<Method> {
        let mut scratch = PathParams::with_capacity(self.max_params);
        self.trees
            .iter()
            .filter_map(|(route_method, tree)| route_method.as_method().filter(|&m| m != method).map(|m| (m, tree)))
            .filter(|(_, tree)| tree.matches(path, &mut scratch))
            .map(|(m, _)| m.clone())
            .collect()
    }

    fn tree(&self, method: &RouteMethod) -> Option<&Tree> {
        self.trees.iter().find(|(route_method, _)| route_method == method).map(|(_, tree)| tree)
    }

    fn tree_entry(&mut self, method: &RouteMethod) -> &mut Tree {
        let index = match self.trees.iter().position(|(route_method, _)| route_method == method) {
            Some(index) => index,
            None => {
                self.trees.push((method.clone(), Tree::new()));
                self.trees.len() - 1
            }
        };
        &mut self.trees[index].1
    }
}

impl Router for DefaultRouter {
    fn add(&mut self, route: Route) -> Result<RouteInfo, RouteError> {
        let info = Arc::new(route.into_info().inspect_err(|e| debug!(cause = %e, "rejected route"))?);
        let segments = pattern::parse(info.path())?;

        let overwrite = self.allow_overwriting_route;
        let replaced = self
            .tree_entry(info.method())
            .insert(&segments, Arc::clone(&info), overwrite)
            .inspect_err(|e| debug!(cause = %e, "rejected route"))?;

        match replaced.and_then(|old| self.routes.iter_mut().find(|route| Arc::ptr_eq(route, &old))) {
            Some(slot) => *slot = Arc::clone(&info),
            None => self.routes.push(Arc::clone(&info)),
        }
        self.max_params = self.max_params.max(info.params().len());

        debug!(method = %info.method(), path = info.path(), name = info.name(), "route added");
        Ok(RouteInfo::clone(&info))
    }

    fn remove(&mut self, method: &RouteMethod, path: &str) -> Result<(), RouteError> {
        let path = pattern::normalize(path);
        let segments = pattern::parse(&path)?;

        let index = self
            .trees
            .iter()
            .position(|(route_method, _)| route_method == method)
            .ok_or_else(|| RouteError::not_found(method, &path))?;
        let tree = &mut self.trees[index].1;
        let removed = tree.remove(&segments).ok_or_else(|| RouteError::not_found(method, &path))?;
        if tree.is_empty() {
            self.trees.remove(index);
        }
        self.routes.retain(|route| !Arc::ptr_eq(route, &removed));

        debug!(%method, path = %path, "route removed");
        Ok(())
    }

    fn routes(&self) -> Routes {
        self.routes.iter().map(|route| RouteInfo::clone(route)).collect()
    }

    fn route(&self, req: &mut RequestContext) -> Arc<HandlerChain> {
        req.clear_routing();
        let (header, params) = req.routing_parts();
        params.reserve(self.max_params);

        match self.lookup(header.method(), header.path(), params) {
            RouteMatch::Found(route) => {
                let chain = Arc::clone(route.handler());
                req.set_route_info(route);
                chain
            }
            RouteMatch::Options(allowed) => {
                req.set_allowed_methods(allowed);
                Arc::clone(&self.options)
            }
            RouteMatch::MethodNotAllowed(allowed) => {
                req.set_allowed_methods(allowed);
                Arc::clone(&self.method_not_allowed)
            }
            RouteMatch::NotFound => Arc::clone(&self.not_found),
        }
    }
}

/// Configures a [`DefaultRouter`].
pub struct RouterBuilder {
    allow_overwriting_route: bool,
    auto_options: bool,
    not_found: HandlerChain,
    method_not_allowed: HandlerChain,
    options: HandlerChain,
}

impl RouterBuilder {
    fn new() -> Self {
        Self {
            allow_overwriting_route: false,
            auto_options: true,
            not_found: HandlerChain::from_handler(NotFoundHandler),
            method_not_allowed: HandlerChain::from_handler(MethodNotAllowedHandler),
            options: HandlerChain::from_handler(OptionsHandler),
        }
    }

    /// Lets a route registered again for the same method and path replace the
    /// old one instead of failing with [`RouteError::Duplicate`].
    #[must_use]
    pub fn allow_overwriting_route(mut self, allow: bool) -> Self {
        self.allow_overwriting_route = allow;
        self
    }

    /// Answers `OPTIONS` for paths registered under other methods with the
    /// options handler instead of `405`. Enabled by default.
    #[must_use]
    pub fn auto_options(mut self, enabled: bool) -> Self {
        self.auto_options = enabled;
        self
    }

    #[must_use]
    pub fn not_found_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.not_found = HandlerChain::from_handler(handler);
        self
    }

    /// The handler for `405` answers, [`RequestContext::allowed_methods`] holds the registered methods.
    #[must_use]
    pub fn method_not_allowed_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.method_not_allowed = HandlerChain::from_handler(handler);
        self
    }

    #[must_use]
    pub fn options_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.options = HandlerChain::from_handler(handler);
        self
    }

    pub fn build(self) -> DefaultRouter {
        DefaultRouter {
            trees: Vec::new(),
            routes: Vec::new(),
            max_params: 0,
            allow_overwriting_route: self.allow_overwriting_route,
            auto_options: self.auto_options,
            not_found: Arc::new(self.not_found),
            method_not_allowed: Arc::new(self.method_not_allowed),
            options: Arc::new(self.options),
        }
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("allow_overwriting_route", &self.allow_overwriting_route)
            .field("auto_options", &self.auto_options)
            .finish_non_exhaustive()
    }
}
