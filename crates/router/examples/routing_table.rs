use bytes::Bytes;
use http::{Method, Request, Response};
use micro_router::router::{get, post};
use micro_router::{ConcurrentRouter, DefaultRouter, Group, HostRouter, Router};
use micro_router::{RequestContext, ResponseResult, handler_fn, middleware_fn};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

async fn user_events(user: String) -> ResponseResult {
    Ok(Response::new(Bytes::from(format!("events of user {user}\r\n"))))
}

async fn static_text(text: &'static str) -> ResponseResult {
    Ok(Response::new(Bytes::from_static(text.as_bytes())))
}

fn build_router() -> HostRouter {
    let mut router = HostRouter::default();

    let timing = middleware_fn(|req, next| {
        Box::pin(async move {
            let start = Instant::now();
            let response = next.invoke(req).await;
            info!(path = req.path(), elapsed = ?start.elapsed(), "api request");
            response
        })
    });

    let mut api = Group::new(&mut router, "/api").with(timing);
    let registered = [
        api.get(
            "/users/:user/events",
            handler_fn(|req: &RequestContext| {
                let user = req.path_params().get("user").unwrap_or_default().to_owned();
                user_events(user)
            }),
        ),
        api.get("/users/:user/events/public", handler_fn(|_: &RequestContext| static_text("public events\r\n"))),
        api.not_found("/*", handler_fn(|_: &RequestContext| static_text("no such api\r\n"))),
    ];
    for result in registered {
        if let Err(e) = result {
            error!(cause = %e, "failed to register route");
        }
    }

    if let Err(e) = router.add(get("/", handler_fn(|_: &RequestContext| static_text("home\r\n")))) {
        error!(cause = %e, "failed to register route");
    }

    let mut admin = DefaultRouter::new();
    if let Err(e) = admin.add(get("/*", handler_fn(|_: &RequestContext| static_text("admin\r\n")))) {
        error!(cause = %e, "failed to register route");
    }
    router.host("admin.localhost", admin);

    router
}

async fn dispatch(router: &ConcurrentRouter<HostRouter>, method: Method, host: &str, path: &str) {
    let request = match Request::builder().method(method).uri(path).header(http::header::HOST, host).body(()) {
        Ok(request) => request,
        Err(e) => {
            warn!(cause = %e, path, "invalid request");
            return;
        }
    };

    let mut req = RequestContext::new(request);
    let chain = router.route(&mut req);
    let route = req.route_info().map(|route| route.name().to_owned());
    match chain.invoke(&mut req).await {
        Ok(response) => info!(
            method = %req.method(),
            host,
            path,
            route = route.as_deref(),
            status = response.status().as_u16(),
            body = ?response.body(),
            "routed"
        ),
        Err(e) => error!(cause = %e, path, "handler failed"),
    }
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Arc::new(ConcurrentRouter::new(build_router()));
    for route in router.routes().iter() {
        info!(method = %route.method(), path = route.path(), name = route.name(), "registered");
    }

    dispatch(&router, Method::GET, "localhost", "/api/users/42/events").await;
    dispatch(&router, Method::GET, "localhost", "/api/users/42/events/public").await;
    dispatch(&router, Method::GET, "localhost", "/api/unknown").await;
    dispatch(&router, Method::POST, "localhost", "/").await;
    dispatch(&router, Method::OPTIONS, "localhost", "/").await;
    dispatch(&router, Method::GET, "localhost", "/missing").await;
    dispatch(&router, Method::GET, "admin.localhost", "/settings").await;

    // routes can change while other tasks keep routing
    let writer = {
        let router = Arc::clone(&router);
        tokio::spawn(async move {
            router.add(post("/", handler_fn(|_: &RequestContext| static_text("posted\r\n"))))
        })
    };
    match writer.await {
        Ok(Ok(route)) => info!(name = route.name(), "route added at runtime"),
        Ok(Err(e)) => error!(cause = %e, "failed to add route"),
        Err(e) => error!(cause = %e, "writer task failed"),
    }
    dispatch(&router, Method::POST, "localhost", "/").await;

    if let Err(e) = router.update(|router| router.remove(&Method::GET.into(), "/")) {
        error!(cause = %e, "failed to remove route");
    }
    dispatch(&router, Method::GET, "localhost", "/").await;
}
