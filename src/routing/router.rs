use crate::http::request::Method;

/// The handler a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Root,
    Echo,
    UserAgent,
    FileGet,
    FilePost,
    NotFound,
}

/// How a route tests the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// The whole path must be equal.
    Exact(&'static str),
    /// Literal string prefix; the remainder becomes the route parameter.
    Prefix(&'static str),
    /// Matches every path.
    Any,
}

impl PathMatch {
    /// Returns the route parameter when `path` matches.
    pub fn matches<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathMatch::Exact(expected) => (path == *expected).then_some(""),
            PathMatch::Prefix(prefix) => path.strip_prefix(prefix),
            PathMatch::Any => Some(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: PathMatch,
    pub handler: Handler,
}

impl Route {
    pub fn new(method: Method, path: PathMatch, handler: Handler) -> Self {
        Self {
            method,
            path,
            handler,
        }
    }
}

/// Outcome of looking a request up in the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Matched { handler: Handler, param: &'a str },
    MethodNotAllowed,
}

/// Ordered route table; the first matching entry wins.
///
/// A request no entry matches resolves to [`Resolution::MethodNotAllowed`].
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(vec![
            Route::new(Method::GET, PathMatch::Exact("/"), Handler::Root),
            Route::new(Method::GET, PathMatch::Prefix("/echo/"), Handler::Echo),
            Route::new(Method::GET, PathMatch::Exact("/user-agent"), Handler::UserAgent),
            Route::new(Method::GET, PathMatch::Prefix("/files/"), Handler::FileGet),
            Route::new(Method::GET, PathMatch::Any, Handler::NotFound),
            Route::new(Method::POST, PathMatch::Prefix("/files/"), Handler::FilePost),
            Route::new(Method::POST, PathMatch::Any, Handler::NotFound),
        ])
    }
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn resolve<'a>(&self, method: &Method, path: &'a str) -> Resolution<'a> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route.path.matches(path).map(|param| Resolution::Matched {
                    handler: route.handler,
                    param,
                })
            })
            .unwrap_or(Resolution::MethodNotAllowed)
    }
}
