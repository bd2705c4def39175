//! Named route helpers
//!
//! Resolves accessors such as `book_path` or `book_url` to path or URL
//! generation for the `book` route.

use super::params::Args;
use super::router::Router;
use crate::errors::{RoutingError, RoutingResult};

const PATH_SUFFIX: &str = "_path";
const URL_SUFFIX: &str = "_url";

/// What a helper accessor generates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Path,
    Url,
}

impl UrlKind {
    /// Split an accessor into route name and kind
    pub fn split(accessor: &str) -> Option<(&str, UrlKind)> {
        if let Some(name) = accessor.strip_suffix(PATH_SUFFIX) {
            Some((name, UrlKind::Path))
        } else {
            accessor
                .strip_suffix(URL_SUFFIX)
                .map(|name| (name, UrlKind::Url))
        }
    }
}

/// Path and URL generation by accessor name
///
/// ```
/// use elif_router::{Args, Registrar, RouteHelpers, RouterBuilder, to};
///
/// let mut builder = RouterBuilder::new();
/// builder.get("/login", to("sessions#new").name("login")).unwrap();
/// let router = builder.freeze();
///
/// let helpers = RouteHelpers::new(&router);
/// assert_eq!(helpers.call("login_path", &Args::new()).unwrap(), "/login");
/// assert_eq!(helpers.call("login_url", &Args::new()).unwrap(), "http://localhost:9292/login");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteHelpers<'r> {
    router: &'r Router,
}

impl<'r> RouteHelpers<'r> {
    pub fn new(router: &'r Router) -> Self {
        Self { router }
    }

    pub fn path(&self, name: &str, args: &Args) -> RoutingResult<String> {
        self.router.path(name, args)
    }

    pub fn url(&self, name: &str, args: &Args) -> RoutingResult<String> {
        self.router.url(name, args)
    }

    /// Generate by accessor: `<name>_path` or `<name>_url`
    pub fn call(&self, accessor: &str, args: &Args) -> RoutingResult<String> {
        match UrlKind::split(accessor) {
            Some((name, UrlKind::Path)) => self.path(name, args),
            Some((name, UrlKind::Url)) => self.url(name, args),
            None => Err(RoutingError::UnknownHelper(accessor.to_string())),
        }
    }

    /// Whether the accessor has a recognised suffix; the route itself may
    /// still be missing
    pub fn responds_to(&self, accessor: &str) -> bool {
        UrlKind::split(accessor).is_some()
    }
}
