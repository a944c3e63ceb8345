use crate::RequestContext;
use crate::handler::{BoxedHandler, RequestHandler, ResponseResult};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Wraps a handler into another handler.
///
/// Middlewares are applied once, when a route is registered, so a request
/// only pays for the calls the middlewares themselves make.
pub trait Middleware: Send + Sync {
    fn decorate(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn decorate(&self, next: BoxedHandler) -> BoxedHandler {
        (**self).decorate(next)
    }
}

/// Middleware built from a closure, see [`middleware_fn`].
pub struct MiddlewareFn<F> {
    f: Arc<F>,
}

/// Wraps a closure receiving the request and the next handler into a [`Middleware`].
///
/// ```
/// use micro_router::{middleware_fn, RequestHandler};
///
/// let server_header = middleware_fn(|req, next| {
///     Box::pin(async move {
///         next.invoke(req).await.map(|mut response| {
///             response.headers_mut().insert(http::header::SERVER, http::HeaderValue::from_static("micro"));
///             response
///         })
///     })
/// });
/// # let _ = server_header;
/// ```
pub fn middleware_fn<F>(f: F) -> MiddlewareFn<F>
where
    F: for<'a> Fn(&'a mut RequestContext, BoxedHandler) -> BoxFuture<'a, ResponseResult> + Send + Sync + 'static,
{
    MiddlewareFn { f: Arc::new(f) }
}

impl<F> Middleware for MiddlewareFn<F>
where
    F: for<'a> Fn(&'a mut RequestContext, BoxedHandler) -> BoxFuture<'a, ResponseResult> + Send + Sync + 'static,
{
    fn decorate(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(FnMiddlewareHandler { f: Arc::clone(&self.f), next })
    }
}

impl<F> std::fmt::Debug for MiddlewareFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareFn").finish_non_exhaustive()
    }
}

struct FnMiddlewareHandler<F> {
    f: Arc<F>,
    next: BoxedHandler,
}

#[async_trait]
impl<F> RequestHandler for FnMiddlewareHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext, BoxedHandler) -> BoxFuture<'a, ResponseResult> + Send + Sync,
{
    async fn invoke(&self, req: &mut RequestContext) -> ResponseResult {
        (self.f)(req, Arc::clone(&self.next)).await
    }
}
