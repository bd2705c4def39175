//! # elif-router
//!
//! Pattern-based request dispatch for the elif.rs web framework.
//!
//! This crate provides:
//! - Path templates with captures, splats, optional groups and constraints
//! - An ordered, verb-indexed route table where the first match wins
//! - Scopes and namespaces for grouping routes under shared prefixes
//! - Mounted sub-applications, optionally restricted by host
//! - Named route path and URL generation with query-string overflow
//!
//! ```
//! use elif_router::{Args, Env, Registrar, Response, RouterBuilder, handler, to};
//!
//! let mut builder = RouterBuilder::new();
//! builder.get("/", handler(|_: &mut Env| Response::ok().text("home"))).unwrap();
//! builder.get("/books/:id", to("books#show").name("book")).unwrap();
//! let router = builder.freeze();
//!
//! let response = router.call(&mut Env::get("/")).unwrap();
//! assert_eq!(response.body(), "home");
//! assert_eq!(router.path("book", &Args::new().with("id", 82)).unwrap(), "/books/82");
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod naming;
pub mod request;
pub mod response;
pub mod routing;

pub use config::{RouterConfig, RouterDefaults};
pub use errors::{RoutingError, RoutingResult};
pub use request::Env;
pub use response::Response;

// Re-export routing types
pub use routing::registry::register_controller;
pub use routing::{
    handler,
    to,
    Args,
    ControllerRegistry,
    Endpoint,
    EndpointRef,
    HttpMethod,
    Mount,
    ParamValue,
    Params,
    Registrar,
    Route,
    RouteDef,
    RouteHelpers,
    RouteInfo,
    RouteMatch,
    Router,
    RouterBuilder,
    Scope,
    ScopeOptions,
    Template,
    UrlKind,
    VERBS,
};
