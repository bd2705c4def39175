//! Routing error types
//!
//! Every failure the router can report, from template compilation at startup
//! to name lookups during URL generation. "No route matched" is not an error;
//! dispatch reports it through the not-found response instead.

use thiserror::Error;

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Routing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Invalid route pattern '{pattern}': {message}")]
    Compile { pattern: String, message: String },

    #[error("Unsupported verb '{0}'")]
    UnsupportedVerb(String),

    #[error("cannot expand '{pattern}' with keys [{given}]: missing key(s) {}", missing.join(", "))]
    Expansion {
        pattern: String,
        given: String,
        missing: Vec<String>,
    },

    #[error("No route called '{0}' was found")]
    NameNotFound(String),

    #[error("Unknown route helper '{0}', expected a '_path' or '_url' suffix")]
    UnknownHelper(String),

    #[error("Controller '{0}' is not registered")]
    UnresolvedController(String),

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Configuration error for '{field}': {message}")]
    Config { field: String, message: String },
}

impl RoutingError {
    /// Create a template compilation error
    pub fn compile<P: Into<String>, M: Into<String>>(pattern: P, message: M) -> Self {
        RoutingError::Compile {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create an expansion error listing the keys that were missing
    pub fn expansion<P: Into<String>>(pattern: P, given: &[&str], missing: Vec<String>) -> Self {
        RoutingError::Expansion {
            pattern: pattern.into(),
            given: given.join(", "),
            missing,
        }
    }

    /// Create a configuration error
    pub fn config<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        RoutingError::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error is raised while the route table is being built
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            RoutingError::Compile { .. }
                | RoutingError::UnsupportedVerb(_)
                | RoutingError::InvalidBaseUrl { .. }
                | RoutingError::Config { .. }
        )
    }
}
