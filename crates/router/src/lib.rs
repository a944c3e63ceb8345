//! An HTTP path router built on compressed prefix trees
//!
//! The router stores `(method, host, path pattern) -> handler chain` registrations and,
//! for each request, finds the best matching registration while extracting named and
//! wildcard path params. Routes can be added and removed while requests are served.
//!
//! # Features
//!
//! - One radix tree per method, matching in time linear to the path length
//! - Static, `:param` and `*` catch-all segments, with backtracking between them
//! - Distinct not-found, method-not-allowed and automatic `OPTIONS` answers
//! - Per virtual host routers
//! - Route groups sharing a prefix and middlewares
//! - Reader/writer locked router for changes at runtime
//!
//! # Example
//!
//! ```
//! use micro_router::router::get;
//! use micro_router::{ConcurrentRouter, DefaultRouter, RequestContext, ResponseResult, handler_fn};
//! use std::sync::Arc;
//!
//! async fn user_events(user: String) -> ResponseResult {
//!     Ok(http::Response::new(format!("events of {user}").into()))
//! }
//!
//! let router = Arc::new(ConcurrentRouter::new(DefaultRouter::new()));
//! let handler = handler_fn(|req: &RequestContext| {
//!     user_events(req.path_params().get("user").unwrap_or_default().to_owned())
//! });
//! router.add(get("/users/:user/events", handler)).unwrap();
//!
//! let mut req = RequestContext::new(http::Request::get("/users/42/events").body(()).unwrap());
//! let _chain = router.route(&mut req);
//! assert_eq!(req.route_info().map(|route| route.path()), Some("/users/:user/events"));
//! assert_eq!(req.path_params().get("user"), Some("42"));
//! ```

mod error;
mod handler;
mod method;
mod params;
mod request;

pub mod router;

#[cfg(test)]
mod test_util;

pub use error::RouteError;
pub use handler::BoxError;
pub use handler::BoxedHandler;
pub use handler::FnHandler;
pub use handler::HandlerChain;
pub use handler::RequestHandler;
pub use handler::ResponseResult;
pub use handler::handler_fn;
pub use handler::{MethodNotAllowedHandler, NotFoundHandler, OptionsHandler};
pub use handler::{Middleware, MiddlewareFn, middleware_fn};
pub use method::RouteMethod;
pub use params::{PathParam, PathParams};
pub use request::{RequestContext, RequestHeader};
pub use router::Router;
pub use router::{ConcurrentRouter, DefaultRouter, Group, HostRouter, RouteMatch, RouterBuilder};
pub use router::{Route, RouteInfo, Routes};
