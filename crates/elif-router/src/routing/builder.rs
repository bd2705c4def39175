//! Route registration
//!
//! [`Registrar`] is the registration surface shared by [`RouterBuilder`] and
//! [`Scope`]: per-verb methods, mounts, scopes and namespaces. The builder
//! owns the table until [`RouterBuilder::freeze`] turns it into a
//! [`Router`].

use super::params::Args;
use super::route::{Endpoint, Mount, Route, RouteDef};
use super::router::{Entry, RouteInfo, RouteTable, Router};
use super::scope::{Scope, ScopeOptions};
use super::{HttpMethod, VERBS};
use crate::config::RouterConfig;
use crate::errors::{RoutingError, RoutingResult};
use std::sync::Arc;
use tracing::debug;

/// Something routes can be registered on
pub trait Registrar {
    /// Register a route for a verb
    fn add(&mut self, verb: &str, path: &str, def: RouteDef) -> RoutingResult<&Route>;

    /// Mount an application under a path prefix, optionally only for hosts
    /// matching `host`
    fn add_mount(
        &mut self,
        at: &str,
        app: Arc<dyn Endpoint>,
        host: Option<&str>,
    ) -> RoutingResult<&Mount>;

    fn get(&mut self, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        self.add("GET", path, def)
    }

    fn post(&mut self, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        self.add("POST", path, def)
    }

    fn put(&mut self, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        self.add("PUT", path, def)
    }

    fn patch(&mut self, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        self.add("PATCH", path, def)
    }

    fn delete(&mut self, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        self.add("DELETE", path, def)
    }

    fn options(&mut self, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        self.add("OPTIONS", path, def)
    }

    /// Mount an application under a path prefix for every verb
    fn mount<E: Endpoint + 'static>(&mut self, at: &str, app: E) -> RoutingResult<&Mount>
    where
        Self: Sized,
    {
        self.add_mount(at, Arc::new(app), None)
    }

    /// Mount an application for requests whose host matches `host`
    fn mount_on_host<E: Endpoint + 'static>(
        &mut self,
        at: &str,
        host: &str,
        app: E,
    ) -> RoutingResult<&Mount>
    where
        Self: Sized,
    {
        self.add_mount(at, Arc::new(app), Some(host))
    }

    /// Register routes with path, namespace and name prefixes
    fn scope<F>(&mut self, options: ScopeOptions, routes: F) -> RoutingResult<()>
    where
        Self: Sized,
        F: FnOnce(&mut Scope<'_>) -> RoutingResult<()>,
    {
        let mut scope = Scope::new(self, options);
        routes(&mut scope)
    }

    /// A scope whose path, namespace and name prefixes are all `name`
    fn namespace<F>(&mut self, name: &str, routes: F) -> RoutingResult<()>
    where
        Self: Sized,
        F: FnOnce(&mut Scope<'_>) -> RoutingResult<()>,
    {
        self.scope(ScopeOptions::namespace(name), routes)
    }
}

/// Mutable route table used while routes are being declared
///
/// ```
/// use elif_router::{Args, Registrar, RouterBuilder, to};
///
/// let mut builder = RouterBuilder::new();
/// builder.get("/login", to("sessions#new").name("login")).unwrap();
/// assert_eq!(
///     builder.path("login", &Args::new().with("return_to", "/")).unwrap(),
///     "/login?return_to=%2F"
/// );
/// ```
#[derive(Debug, Default)]
pub struct RouterBuilder {
    table: RouteTable,
}

impl RouterBuilder {
    /// A builder generating URLs against `http://localhost:9292`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RouterConfig) -> RoutingResult<Self> {
        Ok(Self {
            table: RouteTable::new(config)?,
        })
    }

    pub fn with_base_url<T: Into<String>>(base_url: T) -> RoutingResult<Self> {
        Self::with_config(RouterConfig::with_base_url(base_url))
    }

    pub fn config(&self) -> &RouterConfig {
        self.table.config()
    }

    /// Generate the path of a named route registered so far
    pub fn path(&self, name: &str, args: &Args) -> RoutingResult<String> {
        self.table.path(name, args)
    }

    /// Generate the absolute URL of a named route registered so far
    pub fn url(&self, name: &str, args: &Args) -> RoutingResult<String> {
        self.table.url(name, args)
    }

    pub fn named(&self, name: &str) -> Option<&Route> {
        self.table.named(name)
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.routes()
    }

    /// Stop accepting routes
    pub fn freeze(self) -> Router {
        debug!("Router frozen with {} routes", self.table.len());
        Router::from_table(self.table)
    }
}

impl Registrar for RouterBuilder {
    fn add(&mut self, verb: &str, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        let verb: HttpMethod = verb.parse()?;
        let route = Route::new(path, &def)?;
        debug!(
            "Registered route: {} {} -> {}",
            verb,
            route.path(),
            route.endpoint().describe()
        );
        Ok(self.table.push(Entry::Route(route), &[verb]).route())
    }

    fn add_mount(
        &mut self,
        at: &str,
        app: Arc<dyn Endpoint>,
        host: Option<&str>,
    ) -> RoutingResult<&Mount> {
        let mount = Mount::new(at, app, host)?;
        debug!(
            "Mounted application at {} (host: {})",
            mount.path(),
            mount.host_pattern().unwrap_or("any")
        );
        self.table
            .push(Entry::Mount(mount), &VERBS)
            .as_mount()
            .ok_or_else(|| RoutingError::compile(at, "mount entry was not stored"))
    }
}
