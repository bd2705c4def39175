//! Routes, mounts and endpoints
//!
//! A [`Route`] binds a compiled template to an endpoint and, optionally, a
//! name. A [`Mount`] is a route that matches a path prefix and may be
//! restricted to hosts matching a pattern. Both are immutable once built.

use super::params::{Args, Params};
use super::pattern::Template;
use super::registry::ControllerRegistry;
use crate::errors::{RoutingError, RoutingResult};
use crate::naming;
use crate::request::Env;
use crate::response::Response;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Anything that can answer a request
pub trait Endpoint: Send + Sync {
    fn call(&self, env: &mut Env) -> Response;
}

impl<F> Endpoint for F
where
    F: Fn(&mut Env) -> Response + Send + Sync,
{
    fn call(&self, env: &mut Env) -> Response {
        self(env)
    }
}

/// What a route dispatches to
#[derive(Clone)]
pub enum EndpointRef {
    /// A handler invoked directly
    Handler(Arc<dyn Endpoint>),
    /// A controller looked up in the [`ControllerRegistry`] when called
    Controller {
        controller: String,
        action: Option<String>,
    },
}

impl EndpointRef {
    /// Parse a `"controller#action"` reference.
    ///
    /// The controller part is classified, so `"admin/sessions#new"` refers to
    /// `Admin::Sessions` with action `new`.
    pub fn parse(reference: &str) -> Self {
        let (controller, action) = match reference.split_once('#') {
            Some((controller, action)) => (controller, Some(action.to_string())),
            None => (reference, None),
        };
        EndpointRef::Controller {
            controller: naming::classify(controller),
            action: action.filter(|action| !action.is_empty()),
        }
    }

    pub fn controller(&self) -> Option<&str> {
        match self {
            EndpointRef::Controller { controller, .. } => Some(controller.as_str()),
            EndpointRef::Handler(_) => None,
        }
    }

    pub fn action(&self) -> Option<&str> {
        match self {
            EndpointRef::Controller { action, .. } => action.as_deref(),
            EndpointRef::Handler(_) => None,
        }
    }

    /// Short description for route listings
    pub fn describe(&self) -> String {
        match self {
            EndpointRef::Handler(_) => "<handler>".to_string(),
            EndpointRef::Controller {
                controller,
                action: Some(action),
            } => format!("{}#{}", controller, action),
            EndpointRef::Controller { controller, .. } => controller.clone(),
        }
    }

    /// Record the controller and action on the context and invoke the endpoint
    pub fn call(&self, env: &mut Env) -> RoutingResult<Response> {
        env.action = self.action().map(str::to_string);
        match self {
            EndpointRef::Handler(handler) => {
                env.controller = None;
                Ok(handler.call(env))
            }
            EndpointRef::Controller { controller, .. } => {
                env.controller = Some(controller.clone());
                let endpoint = ControllerRegistry::global()
                    .resolve(controller)
                    .ok_or_else(|| RoutingError::UnresolvedController(controller.clone()))?;
                Ok(endpoint.call(env))
            }
        }
    }
}

impl fmt::Debug for EndpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRef::Handler(_) => f.write_str("Handler(..)"),
            EndpointRef::Controller { controller, action } => f
                .debug_struct("Controller")
                .field("controller", controller)
                .field("action", action)
                .finish(),
        }
    }
}

#[derive(Clone)]
enum Target {
    Handler(Arc<dyn Endpoint>),
    Reference(String),
}

/// Everything a registration call needs besides verb and path
///
/// ```
/// use elif_router::routing::to;
///
/// let def = to("books#show").name("book").constraint("id", r"\d+");
/// assert_eq!(def.route_name(), Some("book"));
/// ```
#[derive(Clone)]
pub struct RouteDef {
    target: Target,
    name: Option<String>,
    constraints: Vec<(String, String)>,
}

impl RouteDef {
    /// Dispatch to a `"controller#action"` reference
    pub fn to<S: Into<String>>(reference: S) -> Self {
        Self::new(Target::Reference(reference.into()))
    }

    /// Dispatch to a handler
    pub fn handler<E: Endpoint + 'static>(endpoint: E) -> Self {
        Self::endpoint(Arc::new(endpoint))
    }

    /// Dispatch to a shared endpoint, such as a frozen router
    pub fn endpoint(endpoint: Arc<dyn Endpoint>) -> Self {
        Self::new(Target::Handler(endpoint))
    }

    fn new(target: Target) -> Self {
        Self {
            target,
            name: None,
            constraints: Vec::new(),
        }
    }

    /// Name the route for path and URL generation
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Constrain a capture: `int`, `uuid`, `alpha`, `slug` or a regular expression
    pub fn constraint<K: Into<String>, V: Into<String>>(mut self, key: K, constraint: V) -> Self {
        self.constraints.push((key.into(), constraint.into()));
        self
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn constraints(&self) -> &[(String, String)] {
        &self.constraints
    }

    /// Prefix a `"controller#action"` reference; handlers are left alone
    pub(crate) fn within_namespace(mut self, namespace: Option<&str>) -> Self {
        if let Target::Reference(reference) = &self.target {
            self.target = Target::Reference(naming::join(&[namespace, Some(reference.as_str())], "/"));
        }
        self
    }

    /// Prefix the route name, if there is one
    pub(crate) fn within_name(mut self, prefix: Option<&str>) -> Self {
        if let Some(name) = &self.name {
            self.name = Some(naming::join(&[prefix, Some(name.as_str())], "/"));
        }
        self
    }

    pub(crate) fn endpoint_ref(&self) -> EndpointRef {
        match &self.target {
            Target::Handler(handler) => EndpointRef::Handler(Arc::clone(handler)),
            Target::Reference(reference) => EndpointRef::parse(reference),
        }
    }
}

impl fmt::Debug for RouteDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDef")
            .field("endpoint", &self.endpoint_ref())
            .field("name", &self.name)
            .field("constraints", &self.constraints)
            .finish()
    }
}

/// Shorthand for [`RouteDef::to`]
pub fn to<S: Into<String>>(reference: S) -> RouteDef {
    RouteDef::to(reference)
}

/// Shorthand for [`RouteDef::handler`]
pub fn handler<E: Endpoint + 'static>(endpoint: E) -> RouteDef {
    RouteDef::handler(endpoint)
}

/// A compiled path bound to an endpoint
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    template: Template,
    endpoint: EndpointRef,
    name: Option<String>,
}

impl Route {
    /// Build a route; the path is cleaned before it is compiled
    pub fn new(path: &str, def: &RouteDef) -> RoutingResult<Self> {
        let path = naming::cleanpath(path);
        let template = Template::with_constraints(&path, def.constraints())?;
        Ok(Self {
            path,
            template,
            endpoint: def.endpoint_ref(),
            name: def.route_name().map(naming::route_name),
        })
    }

    /// The cleaned path template
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn endpoint(&self) -> &EndpointRef {
        &self.endpoint
    }

    /// The normalized route name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Match the whole path
    pub fn match_path(&self, path: &str) -> Option<Params> {
        self.template.match_path(path)
    }

    /// Expand to a path, unused arguments appended as a query string
    pub fn expand(&self, args: &Args) -> RoutingResult<String> {
        self.template.expand_with_query(args)
    }
}

/// A sub-application matched by path prefix
#[derive(Debug, Clone)]
pub struct Mount {
    route: Route,
    host: Option<Regex>,
}

impl Mount {
    pub fn new(at: &str, app: Arc<dyn Endpoint>, host: Option<&str>) -> RoutingResult<Self> {
        let route = Route::new(at, &RouteDef::endpoint(app))?;
        let host = host
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    RoutingError::compile(pattern, format!("invalid host pattern: {}", e))
                })
            })
            .transpose()?;
        Ok(Self { route, host })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn path(&self) -> &str {
        self.route.path()
    }

    pub fn host_pattern(&self) -> Option<&str> {
        self.host.as_ref().map(Regex::as_str)
    }

    /// Match the request when the host is accepted and the path starts with
    /// the mount prefix
    pub fn match_env(&self, env: &Env, trust_forwarded: bool) -> Option<Params> {
        if let Some(host) = &self.host {
            let accepted = env
                .resolved_host(trust_forwarded)
                .map_or(false, |resolved| host.is_match(resolved));
            if !accepted {
                return None;
            }
        }
        self.route
            .template()
            .peek(&env.path)
            .map(|(_, params)| params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(_: &mut Env) -> Response {
        Response::ok().text("ok")
    }

    #[test]
    fn test_endpoint_reference_parsing() {
        let endpoint = EndpointRef::parse("admin/sessions#new");
        assert_eq!(endpoint.controller(), Some("Admin::Sessions"));
        assert_eq!(endpoint.action(), Some("new"));
        assert_eq!(endpoint.describe(), "Admin::Sessions#new");

        let endpoint = EndpointRef::parse("dashboard");
        assert_eq!(endpoint.controller(), Some("Dashboard"));
        assert_eq!(endpoint.action(), None);
    }

    #[test]
    fn test_route_cleans_path_and_normalizes_name() {
        let route = Route::new("books//:id/", &to("books#show").name("BookDetail")).unwrap();
        assert_eq!(route.path(), "/books/:id");
        assert_eq!(route.name(), Some("book_detail"));
        assert!(route.match_path("/books/82").is_some());
    }

    #[test]
    fn test_route_rejects_bad_templates() {
        assert!(Route::new("/books/(:id", &to("books#show")).is_err());
        assert!(Route::new("/books/:id", &to("books#show").constraint("slug", "slug")).is_err());
    }

    #[test]
    fn test_handler_call_records_no_controller() {
        let route = Route::new("/", &handler(ok)).unwrap();
        let mut env = Env::get("/");
        env.controller = Some("Stale".to_string());

        let response = route.endpoint().call(&mut env).unwrap();
        assert_eq!(response.body(), "ok");
        assert_eq!(env.controller, None);
        assert_eq!(env.action, None);
    }

    #[test]
    fn test_unregistered_controller_is_an_error() {
        let route = Route::new("/", &to("never/registered#index")).unwrap();
        let mut env = Env::get("/");
        let err = route.endpoint().call(&mut env).unwrap_err();
        assert_eq!(
            err,
            RoutingError::UnresolvedController("Never::Registered".to_string())
        );
        assert_eq!(env.action.as_deref(), Some("index"));
    }

    #[test]
    fn test_namespace_prefix_only_applies_to_references() {
        let def = to("sessions#new").within_namespace(Some("admin"));
        assert_eq!(def.endpoint_ref().controller(), Some("Admin::Sessions"));

        let def = handler(ok).within_namespace(Some("admin"));
        assert_eq!(def.endpoint_ref().controller(), None);
    }

    #[test]
    fn test_mount_host_restriction() {
        let mount = Mount::new("/admin", Arc::new(ok), Some("^api\\.")).unwrap();
        let plain = Env::get("/admin").with_host("example.com");
        let api = Env::get("/admin").with_host("api.example.com");
        let forwarded = || {
            Env::get("/admin")
                .with_host("example.com")
                .with_forwarded_host("api.example.com")
        };

        assert!(mount.match_env(&plain, true).is_none());
        assert!(mount.match_env(&api, true).is_some());
        assert!(mount.match_env(&forwarded(), true).is_some());
        assert!(mount.match_env(&forwarded(), false).is_none());
    }

    #[test]
    fn test_invalid_host_pattern() {
        assert!(Mount::new("/admin", Arc::new(ok), Some("(")).is_err());
    }
}
