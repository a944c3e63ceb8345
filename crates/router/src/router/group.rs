use crate::router::Router;
use crate::{Middleware, RequestHandler, Route, RouteError, RouteInfo, RouteMethod};
use http::Method;
use std::fmt;
use std::sync::Arc;

/// Registers routes under a shared path prefix and shared middlewares.
///
/// A group only rewrites routes before handing them to the router: the prefix
/// is put in front of the route path and the group middlewares in front of the
/// route middlewares. Nothing about a group is left at request time.
///
/// ```
/// use micro_router::{DefaultRouter, Group, RequestContext, ResponseResult, Router, handler_fn};
///
/// async fn ok() -> ResponseResult {
///     Ok(http::Response::new("ok".into()))
/// }
///
/// let mut router = DefaultRouter::new();
/// let mut api = Group::new(&mut router, "/api");
/// api.get("/users", handler_fn(|_: &RequestContext| ok())).unwrap();
/// api.group("/v2").get("/users/:id", handler_fn(|_: &RequestContext| ok())).unwrap();
///
/// let paths = router.routes().iter().map(|route| route.path().to_owned()).collect::<Vec<_>>();
/// assert_eq!(paths, ["/api/users", "/api/v2/users/:id"]);
/// ```
pub struct Group<'r, R: Router + ?Sized> {
    router: &'r mut R,
    prefix: String,
    middlewares: Vec<Arc<dyn Middleware>>,
}

macro_rules! group_method {
    ($fn_name:ident, $method:expr) => {
        pub fn $fn_name<H: RequestHandler + 'static>(
            &mut self,
            path: &str,
            handler: H,
        ) -> Result<RouteInfo, RouteError> {
            self.add(Route::new($method, path, handler))
        }
    };
}

impl<'r, R: Router + ?Sized> Group<'r, R> {
    pub fn new(router: &'r mut R, prefix: impl Into<String>) -> Self {
        Self { router, prefix: prefix.into(), middlewares: Vec::new() }
    }

    /// Adds a middleware applied to every route registered afterwards.
    #[must_use]
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn add(&mut self, mut route: Route) -> Result<RouteInfo, RouteError> {
        route.set_path(format!("{}{}", self.prefix, route.path()));
        route.prepend_middlewares(&self.middlewares);
        self.router.add(route)
    }

    /// A nested group, extending this group's prefix and middlewares.
    pub fn group(&mut self, prefix: &str) -> Group<'_, R> {
        Group {
            router: &mut *self.router,
            prefix: format!("{}{}", self.prefix, prefix),
            middlewares: self.middlewares.clone(),
        }
    }

    group_method!(get, Method::GET);
    group_method!(post, Method::POST);
    group_method!(put, Method::PUT);
    group_method!(delete, Method::DELETE);
    group_method!(head, Method::HEAD);
    group_method!(options, Method::OPTIONS);
    group_method!(patch, Method::PATCH);
    group_method!(any, RouteMethod::Any);
    group_method!(not_found, RouteMethod::NotFound);
}

impl<R: Router + ?Sized> fmt::Debug for Group<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("prefix", &self.prefix)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}
