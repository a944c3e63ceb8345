//! Handlers the router hands back to its caller.
//!
//! The router never runs a handler: [`Router::route`](crate::Router::route)
//! returns a [`HandlerChain`] and the server layer invokes it.

mod chain;
mod fallback;
mod middleware;

pub use chain::HandlerChain;
pub use fallback::{MethodNotAllowedHandler, NotFoundHandler, OptionsHandler};
pub use middleware::{Middleware, MiddlewareFn, middleware_fn};

use crate::RequestContext;
use async_trait::async_trait;
use bytes::Bytes;
use http::Response;
use std::error::Error;
use std::sync::Arc;

pub type BoxError = Box<dyn Error + Send + Sync>;

pub type ResponseResult = Result<Response<Bytes>, BoxError>;

/// A shared, type erased handler.
pub type BoxedHandler = Arc<dyn RequestHandler>;

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: &mut RequestContext) -> ResponseResult;
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Arc<H> {
    async fn invoke(&self, req: &mut RequestContext) -> ResponseResult {
        (**self).invoke(req).await
    }
}

/// Handler built from an async closure, see [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// Wraps a closure into a [`RequestHandler`].
///
/// The closure reads what it needs from the request synchronously and returns
/// a future that no longer borrows it:
///
/// ```
/// use bytes::Bytes;
/// use micro_router::{handler_fn, RequestContext, ResponseResult};
///
/// let handler = handler_fn(|req: &RequestContext| {
///     let id = req.path_params().get("id").unwrap_or_default().to_owned();
///     async move {
///         let response: ResponseResult = Ok(http::Response::new(Bytes::from(id)));
///         response
///     }
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(&RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = ResponseResult> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(&RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = ResponseResult> + Send + 'static,
{
    async fn invoke(&self, req: &mut RequestContext) -> ResponseResult {
        (self.f)(&*req).await
    }
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestHandler, ResponseResult, handler_fn};
    use crate::RequestContext;
    use crate::test_util::{body_of, request, text};
    use bytes::Bytes;
    use http::{Method, Response};
    use std::sync::Arc;

    fn assert_is_handler<T: RequestHandler>(_handler: &T) {
        // no op
    }

    #[tokio::test]
    async fn closure_handler_reads_request() {
        let handler = handler_fn(|req: &RequestContext| {
            let path = req.path().to_owned();
            async move {
                let response: ResponseResult = Ok(Response::new(Bytes::from(path)));
                response
            }
        });
        assert_is_handler(&handler);

        let mut ctx = request(Method::GET, "/hello");
        let response = handler.invoke(&mut ctx).await.unwrap();
        assert_eq!(body_of(&response), "/hello");
    }

    #[tokio::test]
    async fn arc_handler_delegates() {
        let handler = Arc::new(handler_fn(|_: &RequestContext| async { text("ok") }));
        assert_is_handler(&handler);

        let mut ctx = request(Method::GET, "/");
        assert_eq!(body_of(&handler.invoke(&mut ctx).await.unwrap()), "ok");
    }
}
