use http::Method;
use std::fmt;

/// The method a route is registered under.
///
/// Besides real HTTP methods a route can be registered for [`RouteMethod::Any`],
/// which answers every method that has no dedicated route for the path, or for
/// [`RouteMethod::NotFound`], which answers requests that matched nothing else
/// below the route's prefix (e.g. a custom 404 for `/api/*`).
///
/// The request method's own tree is searched before the `Any` tree, so any
/// route of that method wins over an `Any` route, even a less specific one:
/// with `GET /users/:id` and `ANY /users/new`, `GET /users/new` is answered by
/// `/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Method(Method),
    Any,
    NotFound,
}

impl RouteMethod {
    /// Returns the HTTP method, or `None` for the special route methods.
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            RouteMethod::Method(method) => Some(method),
            RouteMethod::Any | RouteMethod::NotFound => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RouteMethod::Method(method) => method.as_str(),
            RouteMethod::Any => "ANY",
            RouteMethod::NotFound => "NOT_FOUND",
        }
    }
}

impl From<Method> for RouteMethod {
    #[inline]
    fn from(method: Method) -> Self {
        RouteMethod::Method(method)
    }
}

impl From<&Method> for RouteMethod {
    #[inline]
    fn from(method: &Method) -> Self {
        RouteMethod::Method(method.clone())
    }
}

impl PartialEq<Method> for RouteMethod {
    fn eq(&self, other: &Method) -> bool {
        self.as_method() == Some(other)
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
