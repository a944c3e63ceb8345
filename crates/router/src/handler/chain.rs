use crate::RequestContext;
use crate::handler::{BoxedHandler, Middleware, RequestHandler, ResponseResult};
use std::fmt;
use std::sync::Arc;

/// The middlewares and terminal handler of one route.
///
/// The chain is composed when it is built: the first middleware is the
/// outermost one and sees the request first.
pub struct HandlerChain {
    handler: BoxedHandler,
    middlewares: Vec<Arc<dyn Middleware>>,
    entry: BoxedHandler,
}

impl HandlerChain {
    pub fn new(handler: BoxedHandler, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        let entry = middlewares.iter().rev().fold(Arc::clone(&handler), |next, middleware| middleware.decorate(next));
        Self { handler, middlewares, entry }
    }

    /// A chain holding only `handler`.
    pub fn from_handler(handler: impl RequestHandler + 'static) -> Self {
        Self::new(Arc::new(handler), Vec::new())
    }

    /// The terminal handler, without middlewares.
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// Runs the request through the middlewares and the terminal handler.
    pub async fn invoke(&self, req: &mut RequestContext) -> ResponseResult {
        self.entry.invoke(req).await
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain").field("middlewares", &self.middlewares.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::HandlerChain;
    use crate::handler::Middleware;
    use crate::test_util::{body_of, named, request, status, text};
    use crate::{RequestContext, RequestHandler, handler_fn, middleware_fn};
    use http::{HeaderValue, Method, StatusCode};
    use std::sync::Arc;

    fn tag(name: &'static str) -> Arc<dyn Middleware> {
        Arc::new(middleware_fn(move |req, next| {
            Box::pin(async move {
                next.invoke(req).await.map(|mut response| {
                    response.headers_mut().append("x-trace", HeaderValue::from_static(name));
                    response
                })
            })
        }))
    }

    #[tokio::test]
    async fn first_middleware_is_outermost() {
        let chain = HandlerChain::new(named("done"), vec![tag("outer"), tag("inner")]);
        assert_eq!(chain.middlewares().len(), 2);

        let mut ctx = request(Method::GET, "/");
        let response = chain.invoke(&mut ctx).await.unwrap();

        let trace = response.headers().get_all("x-trace").iter().map(|v| v.to_str().unwrap()).collect::<Vec<_>>();
        assert_eq!(trace, vec!["inner", "outer"]);
        assert_eq!(body_of(&response), "done");
    }

    #[tokio::test]
    async fn middleware_can_short_circuit() {
        let deny: Arc<dyn Middleware> =
            Arc::new(middleware_fn(|_req, _next| Box::pin(async { status(StatusCode::FORBIDDEN) })));
        let unreachable = handler_fn(|_: &RequestContext| async { text("unreachable") });
        let chain = HandlerChain::new(Arc::new(unreachable), vec![deny]);

        let mut ctx = request(Method::GET, "/");
        let response = chain.invoke(&mut ctx).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn handler_skips_middlewares() {
        let chain = HandlerChain::new(named("raw"), vec![tag("outer")]);

        let mut ctx = request(Method::GET, "/");
        let response = chain.handler().invoke(&mut ctx).await.unwrap();
        assert!(response.headers().get("x-trace").is_none());
    }

    #[tokio::test]
    async fn single_handler_chain() {
        let chain = HandlerChain::from_handler(handler_fn(|_: &RequestContext| async { text("alone") }));
        assert!(chain.middlewares().is_empty());

        let mut ctx = request(Method::GET, "/");
        assert_eq!(body_of(&chain.invoke(&mut ctx).await.unwrap()), "alone");
    }
}
