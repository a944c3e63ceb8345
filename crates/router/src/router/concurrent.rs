use crate::router::{DefaultRouter, Router};
use crate::{HandlerChain, RequestContext, Route, RouteError, RouteInfo, RouteMethod, Routes};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Wraps a router in a reader/writer lock so routes can be added and removed
/// while other threads keep routing requests.
///
/// `route` and `routes` share the read lock, `add`, `remove` and `update` take
/// the write lock. All methods take `&self`, wrap the router in an [`Arc`] to
/// share it.
///
/// A panic while the lock is held does not disable the router: a failed
/// registration never leaves the tree half written, so the poisoned lock is
/// taken over as is.
#[derive(Debug, Default)]
pub struct ConcurrentRouter<R = DefaultRouter> {
    inner: RwLock<R>,
}

impl<R: Router> ConcurrentRouter<R> {
    pub fn new(router: R) -> Self {
        Self { inner: RwLock::new(router) }
    }

    pub fn add(&self, route: Route) -> Result<RouteInfo, RouteError> {
        self.write().add(route)
    }

    pub fn remove(&self, method: &RouteMethod, path: &str) -> Result<(), RouteError> {
        self.write().remove(method, path)
    }

    /// A copy of the registered routes, taken under the read lock.
    pub fn routes(&self) -> Routes {
        self.read().routes()
    }

    pub fn route(&self, req: &mut RequestContext) -> Arc<HandlerChain> {
        self.read().route(req)
    }

    /// Runs `f` on the wrapped router under one write lock, so a batch of
    /// changes becomes visible to readers at once.
    pub fn update<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.write())
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, R> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, R> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_mut(&mut self) -> &mut R {
        self.inner.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: Router> From<R> for ConcurrentRouter<R> {
    fn from(router: R) -> Self {
        Self::new(router)
    }
}

impl<R: Router> Router for ConcurrentRouter<R> {
    fn add(&mut self, route: Route) -> Result<RouteInfo, RouteError> {
        self.get_mut().add(route)
    }

    fn remove(&mut self, method: &RouteMethod, path: &str) -> Result<(), RouteError> {
        self.get_mut().remove(method, path)
    }

    fn routes(&self) -> Routes {
        self.read().routes()
    }

    fn route(&self, req: &mut RequestContext) -> Arc<HandlerChain> {
        self.read().route(req)
    }
}
