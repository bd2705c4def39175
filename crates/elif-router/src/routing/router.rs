//! Route table, dispatch and generation
//!
//! The table keeps every entry in registration order, an index of entries by
//! verb and an index of named routes. [`RouterBuilder`](super::RouterBuilder)
//! fills it; [`Router`] is the frozen form used to serve requests.

use super::params::{Args, Params};
use super::route::{Endpoint, Mount, Route};
use super::{HttpMethod, VERBS};
use crate::config::RouterConfig;
use crate::errors::{RoutingError, RoutingResult};
use crate::naming;
use crate::request::Env;
use crate::response::Response;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, trace, warn};

/// A registered route or mount
#[derive(Debug, Clone)]
pub enum Entry {
    Route(Route),
    Mount(Mount),
}

impl Entry {
    /// The route itself, or the route a mount wraps
    pub fn route(&self) -> &Route {
        match self {
            Entry::Route(route) => route,
            Entry::Mount(mount) => mount.route(),
        }
    }

    pub fn as_mount(&self) -> Option<&Mount> {
        match self {
            Entry::Mount(mount) => Some(mount),
            Entry::Route(_) => None,
        }
    }

    pub fn is_mount(&self) -> bool {
        matches!(self, Entry::Mount(_))
    }

    fn recognize(&self, env: &Env, trust_forwarded: bool) -> Option<Params> {
        match self {
            Entry::Route(route) => route.match_path(&env.path),
            Entry::Mount(mount) => mount.match_env(env, trust_forwarded),
        }
    }
}

/// The entry a request resolved to, with the parameters it captured
#[derive(Debug)]
pub struct RouteMatch<'r> {
    pub entry: &'r Entry,
    pub params: Params,
}

/// Route metadata for introspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub verbs: Vec<HttpMethod>,
    pub path: String,
    pub name: Option<String>,
    pub params: Vec<String>,
    pub endpoint: String,
    pub mount: bool,
}

// Scheme, host and port used for absolute URLs.
#[derive(Debug, Clone)]
struct Authority {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Default for Authority {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: Some(9292),
        }
    }
}

/// Storage shared by the builder and the frozen router
#[derive(Debug, Clone, Default)]
pub(crate) struct RouteTable {
    config: RouterConfig,
    authority: Authority,
    entries: Vec<Entry>,
    by_verb: HashMap<HttpMethod, Vec<usize>>,
    named: HashMap<String, usize>,
}

impl RouteTable {
    pub(crate) fn new(config: RouterConfig) -> RoutingResult<Self> {
        let base = config.parsed_base_url()?;
        let host = base
            .host_str()
            .ok_or_else(|| RoutingError::InvalidBaseUrl {
                url: config.base_url.clone(),
                message: "base URL must include a host".to_string(),
            })?
            .to_string();
        let authority = Authority {
            scheme: base.scheme().to_string(),
            host,
            port: base.port_or_known_default(),
        };
        Ok(Self {
            config,
            authority,
            ..Self::default()
        })
    }

    pub(crate) fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Append an entry under the given verbs, returning its index
    /// Append an entry for the given verbs and return it
    pub(crate) fn push(&mut self, entry: Entry, verbs: &[HttpMethod]) -> &Entry {
        let index = self.entries.len();
        if let Some(name) = entry.route().name() {
            if self.named.insert(name.to_string(), index).is_some() {
                warn!("Route name '{}' was already registered, replacing it", name);
            }
        }
        self.entries.push(entry);
        for verb in verbs {
            self.by_verb.entry(*verb).or_default().push(index);
        }
        &self.entries[index]
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn recognize<'r>(&'r self, env: &Env) -> Option<RouteMatch<'r>> {
        let Ok(verb) = HttpMethod::try_from(&env.method) else {
            trace!("No routes for unsupported verb {}", env.method);
            return None;
        };
        let candidates = self.by_verb.get(&verb)?;
        let trust_forwarded = self.config.trust_forwarded_host;

        for &index in candidates {
            let entry = &self.entries[index];
            trace!("Trying {} {} against {}", verb, env.path, entry.route().path());
            if let Some(params) = entry.recognize(env, trust_forwarded) {
                trace!("Matched {} {} to {}", verb, env.path, entry.route().path());
                return Some(RouteMatch { entry, params });
            }
        }

        trace!("No route matched {} {}", verb, env.path);
        None
    }

    pub(crate) fn path(&self, name: &str, args: &Args) -> RoutingResult<String> {
        let index = self
            .named
            .get(&naming::route_name(name))
            .ok_or_else(|| RoutingError::NameNotFound(name.to_string()))?;
        self.entries[*index].route().expand(args)
    }

    pub(crate) fn url(&self, name: &str, args: &Args) -> RoutingResult<String> {
        let mut args = args.clone();
        let subdomain = args.remove("subdomain");

        let mut url = format!("{}://", self.authority.scheme);
        if let Some(subdomain) = subdomain {
            url.push_str(&subdomain.joined());
            url.push('.');
        }
        url.push_str(&self.authority.host);
        if let Some(port) = self.authority.port.filter(|port| *port != 80 && *port != 443) {
            url.push_str(&format!(":{}", port));
        }
        url.push_str(&self.path(name, &args)?);
        Ok(url)
    }

    pub(crate) fn named(&self, name: &str) -> Option<&Route> {
        self.named
            .get(&naming::route_name(name))
            .map(|index| self.entries[*index].route())
    }

    pub(crate) fn routes(&self) -> Vec<RouteInfo> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.info(index, entry))
            .collect()
    }

    pub(crate) fn routes_for(&self, verb: HttpMethod) -> Vec<RouteInfo> {
        self.by_verb
            .get(&verb)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| self.info(index, &self.entries[index]))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn info(&self, index: usize, entry: &Entry) -> RouteInfo {
        let route = entry.route();
        let verbs = VERBS
            .iter()
            .copied()
            .filter(|verb| {
                self.by_verb
                    .get(verb)
                    .map_or(false, |indices| indices.contains(&index))
            })
            .collect();
        RouteInfo {
            verbs,
            path: route.path().to_string(),
            name: route.name().map(str::to_string),
            params: route.template().names().to_vec(),
            endpoint: route.endpoint().describe(),
            mount: entry.is_mount(),
        }
    }
}

/// A frozen route table
///
/// Built by [`RouterBuilder::freeze`](super::RouterBuilder::freeze). It has no
/// registration methods and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    pub(crate) fn from_table(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn config(&self) -> &RouterConfig {
        self.table.config()
    }

    /// Find the first entry matching the request, without calling it
    pub fn recognize<'r>(&'r self, env: &Env) -> Option<RouteMatch<'r>> {
        self.table.recognize(env)
    }

    /// Dispatch the request.
    ///
    /// Captured parameters are merged into `env.params` and the matched
    /// controller and action are recorded before the endpoint runs. When no
    /// entry matches, the not-found response is returned.
    pub fn call(&self, env: &mut Env) -> RoutingResult<Response> {
        match self.table.recognize(env) {
            Some(matched) => {
                env.params.merge(matched.params);
                matched.entry.route().endpoint().call(env)
            }
            None => Ok(Response::not_found()),
        }
    }

    /// Generate the path of a named route
    ///
    /// ```
    /// use elif_router::{Args, Registrar, RouterBuilder, to};
    ///
    /// let mut builder = RouterBuilder::new();
    /// builder.get("/books/:id", to("books#show").name("book")).unwrap();
    /// let router = builder.freeze();
    ///
    /// assert_eq!(router.path("book", &Args::new().with("id", 82)).unwrap(), "/books/82");
    /// ```
    pub fn path(&self, name: &str, args: &Args) -> RoutingResult<String> {
        self.table.path(name, args)
    }

    /// Generate the absolute URL of a named route; a `subdomain` argument
    /// is prepended to the host
    pub fn url(&self, name: &str, args: &Args) -> RoutingResult<String> {
        self.table.url(name, args)
    }

    /// The route registered under a name
    pub fn named(&self, name: &str) -> Option<&Route> {
        self.table.named(name)
    }

    /// Every entry in registration order
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.routes()
    }

    /// Entries that can answer the verb, in match order
    pub fn routes_for(&self, verb: HttpMethod) -> Vec<RouteInfo> {
        self.table.routes_for(verb)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

impl Endpoint for Router {
    fn call(&self, env: &mut Env) -> Response {
        match Router::call(self, env) {
            Ok(response) => response,
            Err(e) => {
                error!("Routing failed for {} {}: {}", env.method, env.path, e);
                Response::with_status(StatusCode::INTERNAL_SERVER_ERROR).text(e.to_string())
            }
        }
    }
}
