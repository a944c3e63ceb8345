//! Request routing.
//!
//! - [`DefaultRouter`]: one radix tree per method, the routing algorithm itself
//! - [`HostRouter`]: picks a router by the request's `Host`
//! - [`ConcurrentRouter`]: a reader/writer lock around any router, so routes
//!   can change while requests are being served
//! - [`Group`]: registers routes under a shared prefix and middlewares
//!
//! # Example
//!
//! ```
//! use micro_router::router::{get, post};
//! use micro_router::{DefaultRouter, RequestContext, Router, handler_fn, ResponseResult};
//!
//! async fn hello() -> ResponseResult {
//!     Ok(http::Response::new("hello".into()))
//! }
//!
//! let mut router = DefaultRouter::new();
//! router.add(get("/users/:user", handler_fn(|_: &RequestContext| hello()))).unwrap();
//! router.add(post("/users", handler_fn(|_: &RequestContext| hello()))).unwrap();
//!
//! let mut req = RequestContext::new(http::Request::get("/users/42").body(()).unwrap());
//! let _chain = router.route(&mut req);
//! assert_eq!(req.path_params().get("user"), Some("42"));
//! ```

mod concurrent;
mod default_router;
mod group;
mod host;
pub(crate) mod pattern;
mod route;
mod tree;

pub use concurrent::ConcurrentRouter;
pub use default_router::{DefaultRouter, RouteMatch, RouterBuilder};
pub use group::Group;
pub use host::HostRouter;
pub use route::{Route, RouteInfo, Routes};
pub use route::{any, connect, delete, get, head, not_found, options, patch, post, put, trace};

use crate::{HandlerChain, RequestContext, RouteError, RouteMethod};
use std::sync::Arc;

/// The contract every router layer implements.
///
/// Mutation takes `&mut self`, so a router shared between threads can only be
/// changed through a synchronizing wrapper such as [`ConcurrentRouter`].
#[cfg_attr(test, mockall::automock)]
pub trait Router: Send + Sync {
    /// Registers a route, returning a copy of its description.
    ///
    /// Nothing is registered when an error is returned.
    fn add(&mut self, route: Route) -> Result<RouteInfo, RouteError>;

    /// Unregisters the route registered for exactly `method` and `path`.
    fn remove(&mut self, method: &RouteMethod, path: &str) -> Result<(), RouteError>;

    /// A copy of the registered routes, in registration order.
    fn routes(&self) -> Routes;

    /// Resolves the handler chain for `req`, filling its path params.
    ///
    /// A request matching no route resolves to the not-found or the
    /// method-not-allowed chain, never to an error.
    fn route(&self, req: &mut RequestContext) -> Arc<HandlerChain>;
}

impl<R: Router + ?Sized> Router for Box<R> {
    fn add(&mut self, route: Route) -> Result<RouteInfo, RouteError> {
        (**self).add(route)
    }

    fn remove(&mut self, method: &RouteMethod, path: &str) -> Result<(), RouteError> {
        (**self).remove(method, path)
    }

    fn routes(&self) -> Routes {
        (**self).routes()
    }

    fn route(&self, req: &mut RequestContext) -> Arc<HandlerChain> {
        (**self).route(req)
    }
}
