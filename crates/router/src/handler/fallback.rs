//! Built-in handlers used when a request resolves to no registered route.

use crate::RequestContext;
use crate::handler::{RequestHandler, ResponseResult};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderValue, Method, Response, StatusCode};

/// Answers `404 Not Found`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFoundHandler;

#[async_trait]
impl RequestHandler for NotFoundHandler {
    async fn invoke(&self, _req: &mut RequestContext) -> ResponseResult {
        Ok(Response::builder().status(StatusCode::NOT_FOUND).body(Bytes::from_static(b"404 not found"))?)
    }
}

/// Answers `405 Method Not Allowed` with an `Allow` header listing the
/// methods registered for the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodNotAllowedHandler;

#[async_trait]
impl RequestHandler for MethodNotAllowedHandler {
    async fn invoke(&self, req: &mut RequestContext) -> ResponseResult {
        Ok(Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(http::header::ALLOW, allow_header(req.allowed_methods(), false)?)
            .body(Bytes::from_static(b"405 method not allowed"))?)
    }
}

/// Answers an `OPTIONS` request with `204 No Content` and an `Allow` header.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptionsHandler;

#[async_trait]
impl RequestHandler for OptionsHandler {
    async fn invoke(&self, req: &mut RequestContext) -> ResponseResult {
        Ok(Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header(http::header::ALLOW, allow_header(req.allowed_methods(), true)?)
            .body(Bytes::new())?)
    }
}

fn allow_header(methods: &[Method], with_options: bool) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
    let mut names = methods.iter().map(Method::as_str).collect::<Vec<_>>();
    if with_options && !methods.contains(&Method::OPTIONS) {
        names.push(Method::OPTIONS.as_str());
    }
    HeaderValue::from_str(&names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::{MethodNotAllowedHandler, NotFoundHandler, OptionsHandler};
    use crate::RequestHandler;
    use crate::test_util::request;
    use http::{Method, StatusCode};

    #[tokio::test]
    async fn not_found() {
        let mut ctx = request(Method::GET, "/missing");
        let response = NotFoundHandler.invoke(&mut ctx).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn method_not_allowed_lists_methods() {
        let mut ctx = request(Method::DELETE, "/users");
        ctx.set_allowed_methods(vec![Method::GET, Method::POST]);

        let response = MethodNotAllowedHandler.invoke(&mut ctx).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[http::header::ALLOW], "GET, POST");
    }

    #[tokio::test]
    async fn options_adds_itself() {
        let mut ctx = request(Method::OPTIONS, "/users");
        ctx.set_allowed_methods(vec![Method::GET]);

        let response = OptionsHandler.invoke(&mut ctx).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[http::header::ALLOW], "GET, OPTIONS");
    }
}
