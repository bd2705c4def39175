//! Pattern routing for elif.rs
//!
//! This module provides:
//! - A URL template compiler (literals, `:captures`, `*splats`, optional groups)
//! - Anchored matching and prefix peeking against compiled templates
//! - Template expansion with leftover arguments serialized as a query string
//! - An ordered, verb-indexed route table with first-match dispatch
//! - Scopes and namespaces composing path, controller and name prefixes
//! - Mounted sub-applications, optionally restricted by host
//! - Named route path and URL generation

// Template engine
pub mod lexer;
pub mod compiler;
pub mod pattern;
pub mod matcher;
pub mod generator;
pub mod params;

// Route table
pub mod route;
pub mod registry;
pub mod builder;
pub mod scope;
pub mod router;
pub mod helpers;

pub use pattern::{Constraint, Segment, Template};
pub use params::{Args, ParamValue, Params};
pub use route::{handler, to, Endpoint, EndpointRef, Mount, Route, RouteDef};
pub use registry::ControllerRegistry;
pub use builder::{Registrar, RouterBuilder};
pub use scope::{Scope, ScopeOptions};
pub use router::{Entry, RouteInfo, RouteMatch, Router};
pub use helpers::{RouteHelpers, UrlKind};

use crate::errors::RoutingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// HTTP methods supported by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    OPTIONS,
}

/// Every supported verb, in registration order for mounts
pub const VERBS: [HttpMethod; 6] = [
    HttpMethod::GET,
    HttpMethod::POST,
    HttpMethod::PUT,
    HttpMethod::PATCH,
    HttpMethod::DELETE,
    HttpMethod::OPTIONS,
];

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RoutingError;

    /// Parse a verb case-insensitively; anything outside [`VERBS`] is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let verb = s.to_uppercase();
        VERBS
            .iter()
            .copied()
            .find(|method| method.as_str() == verb)
            .ok_or(RoutingError::UnsupportedVerb(verb))
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = RoutingError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => http::Method::GET,
            HttpMethod::POST => http::Method::POST,
            HttpMethod::PUT => http::Method::PUT,
            HttpMethod::PATCH => http::Method::PATCH,
            HttpMethod::DELETE => http::Method::DELETE,
            HttpMethod::OPTIONS => http::Method::OPTIONS,
        }
    }
}
