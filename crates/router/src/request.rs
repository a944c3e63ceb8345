//! Request side types the router reads from and writes into.
//!
//! - `RequestHeader`: the bodyless request (method, uri, headers)
//! - `RequestContext`: the header plus the routing results (path params,
//!   matched route, allowed methods)

use crate::{PathParams, RouteInfo};
use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};
use std::sync::Arc;

/// Represents an HTTP request header.
///
/// This struct wraps a `http::Request<()>`, the body never reaches the router.
#[derive(Debug)]
pub struct RequestHeader {
    inner: Request<()>,
}

impl AsRef<Request<()>> for RequestHeader {
    fn as_ref(&self) -> &Request<()> {
        &self.inner
    }
}

impl RequestHeader {
    /// Consumes the header and returns the inner `Request<()>`.
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Returns a reference to the request's URI.
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    /// Returns the raw, still percent-encoded, path of the request.
    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Returns the request's HTTP version.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns a reference to the request's headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Returns the virtual host of the request.
    ///
    /// The `Host` header wins; absolute-form request targets fall back to the
    /// URI authority. The value is returned as sent, port included.
    pub fn host(&self) -> Option<&str> {
        self.inner
            .headers()
            .get(http::header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| self.inner.uri().authority().map(http::uri::Authority::as_str))
    }
}

/// Converts request parts into a RequestHeader.
impl From<Parts> for RequestHeader {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}

/// Converts a bodyless request into a RequestHeader.
impl From<Request<()>> for RequestHeader {
    #[inline]
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}

/// Represents the context of an HTTP request while it is routed and handled.
///
/// The router fills the path params, the matched [`RouteInfo`] and, for
/// `405`/`OPTIONS` answers, the methods the path is registered under.
/// A context can be pooled: [`RequestContext::reset`] swaps in the next request
/// and keeps the params allocation.
#[derive(Debug)]
pub struct RequestContext {
    header: RequestHeader,
    path_params: PathParams,
    route_info: Option<Arc<RouteInfo>>,
    allowed_methods: Vec<Method>,
}

impl RequestContext {
    /// Creates a new RequestContext for the given request header
    pub fn new(header: impl Into<RequestHeader>) -> Self {
        Self::with_params_capacity(header, 0)
    }

    /// Creates a context whose params hold `capacity` entries without reallocating.
    pub fn with_params_capacity(header: impl Into<RequestHeader>, capacity: usize) -> Self {
        Self {
            header: header.into(),
            path_params: PathParams::with_capacity(capacity),
            route_info: None,
            allowed_methods: Vec::new(),
        }
    }

    /// Reuses this context for another request, returning the previous header.
    pub fn reset(&mut self, header: impl Into<RequestHeader>) -> RequestHeader {
        self.clear_routing();
        std::mem::replace(&mut self.header, header.into())
    }

    /// Returns a reference to the underlying RequestHeader
    pub fn request_header(&self) -> &RequestHeader {
        &self.header
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        self.header.method()
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        self.header.uri()
    }

    /// Returns the raw path of the request
    pub fn path(&self) -> &str {
        self.header.path()
    }

    /// Returns the virtual host of the request, see [`RequestHeader::host`]
    pub fn host(&self) -> Option<&str> {
        self.header.host()
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        self.header.headers()
    }

    /// Returns a reference to the path parameters extracted from the request URL
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// The route the request was matched to, `None` when routing fell back to
    /// the not-found, method-not-allowed or options handler.
    pub fn route_info(&self) -> Option<&RouteInfo> {
        self.route_info.as_deref()
    }

    /// Methods registered for the request path, filled when the request method
    /// itself is not registered for it.
    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    pub(crate) fn clear_routing(&mut self) {
        self.path_params.clear();
        self.route_info = None;
        self.allowed_methods.clear();
    }

    /// Splits the context so the path can be read while params are written.
    pub(crate) fn routing_parts(&mut self) -> (&RequestHeader, &mut PathParams) {
        (&self.header, &mut self.path_params)
    }

    pub(crate) fn set_route_info(&mut self, route_info: Arc<RouteInfo>) {
        self.route_info = Some(route_info);
    }

    pub(crate) fn set_allowed_methods(&mut self, methods: Vec<Method>) {
        self.allowed_methods = methods;
    }
}

#[cfg(test)]
mod tests {
    use super::RequestContext;
    use http::{Method, Request};

    fn request(host: Option<&str>, uri: &str) -> Request<()> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(host) = host {
            builder = builder.header(http::header::HOST, host);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn host_prefers_header() {
        let ctx = RequestContext::new(request(Some("api.example.com:8080"), "http://other.example.com/x"));
        assert_eq!(ctx.host(), Some("api.example.com:8080"));
    }

    #[test]
    fn host_falls_back_to_authority() {
        let ctx = RequestContext::new(request(None, "http://other.example.com/x"));
        assert_eq!(ctx.host(), Some("other.example.com"));

        let ctx = RequestContext::new(request(None, "/x"));
        assert_eq!(ctx.host(), None);
    }

    #[test]
    fn path_is_not_decoded() {
        let ctx = RequestContext::new(request(None, "/files/a%2Fb"));
        assert_eq!(ctx.path(), "/files/a%2Fb");
    }

    #[test]
    fn reset_swaps_header_and_clears_routing() {
        let mut ctx = RequestContext::with_params_capacity(request(None, "/a"), 3);
        ctx.set_allowed_methods(vec![Method::GET]);

        let previous = ctx.reset(request(None, "/b"));
        assert_eq!(previous.path(), "/a");
        assert_eq!(ctx.path(), "/b");
        assert!(ctx.allowed_methods().is_empty());
        assert!(ctx.path_params().capacity() >= 3);
    }
}
