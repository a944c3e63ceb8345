use crate::{BoxedHandler, RequestContext, ResponseResult, handler_fn};
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use std::sync::Arc;

pub(crate) fn text(body: &'static str) -> ResponseResult {
    Ok(Response::new(Bytes::from_static(body.as_bytes())))
}

pub(crate) fn status(status: StatusCode) -> ResponseResult {
    Ok(Response::builder().status(status).body(Bytes::new())?)
}

/// A handler answering with a fixed body, so tests can tell routes apart.
pub(crate) fn named(body: &'static str) -> BoxedHandler {
    Arc::new(handler_fn(move |_: &RequestContext| async move { text(body) }))
}

pub(crate) fn request(method: Method, path: &str) -> RequestContext {
    RequestContext::new(Request::builder().method(method).uri(path).body(()).unwrap())
}

pub(crate) fn request_with_host(method: Method, host: &str, path: &str) -> RequestContext {
    RequestContext::new(
        Request::builder().method(method).uri(path).header(http::header::HOST, host).body(()).unwrap(),
    )
}

pub(crate) fn body_of(response: &Response<Bytes>) -> &str {
    std::str::from_utf8(response.body()).unwrap()
}

/// Routes logging to the test output, for tests that want to see the router's traces.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().try_init();
}
