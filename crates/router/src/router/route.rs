use crate::router::pattern;
use crate::{BoxedHandler, HandlerChain, Middleware, RequestHandler, RouteError, RouteMethod};
use http::Method;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A route to register: method, path pattern, handler, middlewares and an optional name.
pub struct Route {
    method: RouteMethod,
    path: String,
    handler: BoxedHandler,
    middlewares: Vec<Arc<dyn Middleware>>,
    name: Option<String>,
}

impl Route {
    pub fn new<H>(method: impl Into<RouteMethod>, path: impl Into<String>, handler: H) -> Self
    where
        H: RequestHandler + 'static,
    {
        Self::boxed(method, path, Arc::new(handler))
    }

    pub fn boxed(method: impl Into<RouteMethod>, path: impl Into<String>, handler: BoxedHandler) -> Self {
        Self { method: method.into(), path: path.into(), handler, middlewares: Vec::new(), name: None }
    }

    /// Names the route, the default name is `"<METHOD>:<path>"`.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a middleware, middlewares run in the order they were added.
    #[must_use]
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    #[must_use]
    pub fn with_middlewares(mut self, middlewares: impl IntoIterator<Item = Arc<dyn Middleware>>) -> Self {
        self.middlewares.extend(middlewares);
        self
    }

    pub fn method(&self) -> &RouteMethod {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn set_path(&mut self, path: String) {
        self.path = path;
    }

    /// Puts `middlewares` in front of the route's own middlewares.
    pub(crate) fn prepend_middlewares(&mut self, middlewares: &[Arc<dyn Middleware>]) {
        self.middlewares.splice(0..0, middlewares.iter().cloned());
    }

    /// Builds the immutable description of this route, normalizing its path.
    pub(crate) fn into_info(self) -> Result<RouteInfo, RouteError> {
        let path = pattern::normalize(&self.path);
        let params = pattern::param_names(&pattern::parse(&path)?);
        let name = self.name.unwrap_or_else(|| format!("{}:{}", self.method, path));
        let handler = Arc::new(HandlerChain::new(self.handler, self.middlewares));
        Ok(RouteInfo { method: self.method, path, name, params, handler })
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

macro_rules! method_route {
    ($fn_name:ident, $method:expr) => {
        pub fn $fn_name<H: RequestHandler + 'static>(path: impl Into<String>, handler: H) -> Route {
            Route::new($method, path, handler)
        }
    };
}

method_route!(get, Method::GET);
method_route!(post, Method::POST);
method_route!(put, Method::PUT);
method_route!(delete, Method::DELETE);
method_route!(head, Method::HEAD);
method_route!(options, Method::OPTIONS);
method_route!(connect, Method::CONNECT);
method_route!(patch, Method::PATCH);
method_route!(trace, Method::TRACE);
method_route!(any, RouteMethod::Any);
method_route!(not_found, RouteMethod::NotFound);

/// Description of a registered route.
///
/// Values handed out by a router are copies: changing them never affects routing.
#[derive(Clone)]
pub struct RouteInfo {
    method: RouteMethod,
    path: String,
    name: String,
    params: Vec<String>,
    handler: Arc<HandlerChain>,
}

impl RouteInfo {
    pub fn method(&self) -> &RouteMethod {
        &self.method
    }

    /// The normalized path pattern the route was registered with.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Param names in path order, a bare catch-all is named `*`.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn handler(&self) -> &Arc<HandlerChain> {
        &self.handler
    }

    /// Builds a URL for this route, substituting `values` for its params in order.
    pub fn reverse<S: AsRef<str>>(&self, values: &[S]) -> String {
        pattern::reverse(&self.path, values)
    }
}

impl PartialEq for RouteInfo {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.path == other.path
            && self.name == other.name
            && self.params == other.params
            && Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteInfo")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// An owned list of [`RouteInfo`] in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routes {
    inner: Vec<RouteInfo>,
}

impl Routes {
    pub fn into_inner(self) -> Vec<RouteInfo> {
        self.inner
    }

    pub fn find_by_method_path(&self, method: &RouteMethod, path: &str) -> Option<&RouteInfo> {
        self.inner.iter().find(|info| &info.method == method && info.path == path)
    }

    pub fn filter_by_method(&self, method: &RouteMethod) -> Routes {
        self.filter(|info| &info.method == method)
    }

    pub fn filter_by_path(&self, path: &str) -> Routes {
        self.filter(|info| info.path == path)
    }

    pub fn filter_by_name(&self, name: &str) -> Routes {
        self.filter(|info| info.name == name)
    }

    /// Builds a URL for the first route named `name`.
    pub fn reverse<S: AsRef<str>>(&self, name: &str, values: &[S]) -> Result<String, RouteError> {
        self.inner
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.reverse(values))
            .ok_or_else(|| RouteError::unknown_name(name))
    }

    fn filter(&self, predicate: impl Fn(&RouteInfo) -> bool) -> Routes {
        self.inner.iter().filter(|info| predicate(info)).cloned().collect()
    }
}

impl Deref for Routes {
    type Target = [RouteInfo];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Routes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl From<Vec<RouteInfo>> for Routes {
    fn from(inner: Vec<RouteInfo>) -> Self {
        Self { inner }
    }
}

impl FromIterator<RouteInfo> for Routes {
    fn from_iter<I: IntoIterator<Item = RouteInfo>>(iter: I) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}

impl IntoIterator for Routes {
    type Item = RouteInfo;
    type IntoIter = std::vec::IntoIter<RouteInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Routes {
    type Item = &'a RouteInfo;
    type IntoIter = std::slice::Iter<'a, RouteInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
