use http::Method;
use micro_router::router::Route;
use micro_router::{DefaultRouter, RequestContext, ResponseResult, RouteError, Router, handler_fn};

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    method: &'static str,
    path: &'static str,
}

impl TestCase {
    pub const fn new(name: &'static str, group: TestGroup, method: &'static str, path: &'static str) -> Self {
        Self { name, group, method, path }
    }

    pub const fn static_path(name: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Static, "GET", path)
    }

    pub const fn param(name: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Param, "GET", path)
    }

    pub const fn any(name: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Any, "GET", path)
    }

    pub const fn miss(name: &'static str, method: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Miss, method, path)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn method(&self) -> Method {
        to_method(self.method)
    }

    pub fn path(&self) -> &'static str {
        self.path
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Static,
    Param,
    Any,
    Miss,
}

/// A named table of `(method, pattern)` registrations.
#[derive(Debug, Copy, Clone)]
pub struct RouteSet {
    name: &'static str,
    routes: &'static [(&'static str, &'static str)],
}

impl RouteSet {
    pub const fn new(name: &'static str, routes: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, routes }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.routes
            .iter()
            .map(|&(method, path)| Route::new(to_method(method), path, handler_fn(|_: &RequestContext| empty())))
    }

    /// Registers every route of the set into `router`.
    pub fn register<R: Router + ?Sized>(&self, router: &mut R) -> Result<(), RouteError> {
        self.routes().try_for_each(|route| router.add(route).map(drop))
    }

    pub fn build(&self) -> Result<DefaultRouter, RouteError> {
        let mut router = DefaultRouter::new();
        self.register(&mut router)?;
        Ok(router)
    }
}

async fn empty() -> ResponseResult {
    Ok(http::Response::default())
}

fn to_method(method: &str) -> Method {
    Method::from_bytes(method.as_bytes()).expect("route sets only hold valid methods")
}

/// A subset of the GitHub REST API, a common router benchmark.
pub static GITHUB_API: RouteSet = RouteSet::new(
    "github_api",
    &[
        ("GET", "/authorizations"),
        ("GET", "/authorizations/:id"),
        ("POST", "/authorizations"),
        ("DELETE", "/authorizations/:id"),
        ("GET", "/applications/:client_id/tokens/:access_token"),
        ("DELETE", "/applications/:client_id/tokens"),
        ("GET", "/events"),
        ("GET", "/repos/:owner/:repo/events"),
        ("GET", "/networks/:owner/:repo/events"),
        ("GET", "/orgs/:org/events"),
        ("GET", "/users/:user/received_events"),
        ("GET", "/users/:user/received_events/public"),
        ("GET", "/users/:user/events"),
        ("GET", "/users/:user/events/public"),
        ("GET", "/users/:user/events/orgs/:org"),
        ("GET", "/feeds"),
        ("GET", "/notifications"),
        ("PUT", "/notifications"),
        ("GET", "/repos/:owner/:repo/notifications"),
        ("GET", "/notifications/threads/:id"),
        ("GET", "/repos/:owner/:repo/stargazers"),
        ("GET", "/users/:user/starred"),
        ("GET", "/user/starred"),
        ("GET", "/user/starred/:owner/:repo"),
        ("PUT", "/user/starred/:owner/:repo"),
        ("DELETE", "/user/starred/:owner/:repo"),
        ("GET", "/gists"),
        ("GET", "/gists/:id"),
        ("POST", "/gists"),
        ("GET", "/repos/:owner/:repo/git/blobs/:sha"),
        ("GET", "/repos/:owner/:repo/git/refs/*"),
        ("GET", "/repos/:owner/:repo/issues"),
        ("GET", "/repos/:owner/:repo/issues/:number"),
        ("POST", "/repos/:owner/:repo/issues"),
        ("GET", "/repos/:owner/:repo/issues/:number/comments"),
        ("GET", "/repos/:owner/:repo/pulls"),
        ("GET", "/repos/:owner/:repo/pulls/:number"),
        ("GET", "/repos/:owner/:repo/pulls/:number/files"),
        ("GET", "/search/repositories"),
        ("GET", "/search/code"),
        ("GET", "/user"),
        ("GET", "/user/repos"),
        ("GET", "/user/orgs"),
        ("GET", "/users/:user"),
        ("GET", "/users/:user/repos"),
        ("GET", "/static/*"),
    ],
);

pub static GITHUB_CASES: [TestCase; 8] = [
    TestCase::static_path("static_short", "/user"),
    TestCase::static_path("static_long", "/search/repositories"),
    TestCase::param("param_one", "/users/octocat"),
    TestCase::param("param_three", "/repos/rust-lang/rust/issues/4242"),
    TestCase::param("param_backtrack", "/users/octocat/events/orgs/rust-lang"),
    TestCase::any("any", "/repos/rust-lang/rust/git/refs/heads/master/x"),
    TestCase::miss("not_found", "GET", "/nothing/here"),
    TestCase::miss("method_not_allowed", "PATCH", "/repos/rust-lang/rust/issues"),
];
