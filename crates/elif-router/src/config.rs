//! Router configuration
//!
//! Provides the settings a router needs at construction time: the base URL
//! used for absolute URL generation and whether forwarded-host headers are
//! honoured when matching host-restricted mounts.

use crate::errors::{RoutingError, RoutingResult};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Default configuration values
pub struct RouterDefaults;

impl RouterDefaults {
    pub const BASE_URL: &'static str = "http://localhost:9292";
    pub const TRUST_FORWARDED_HOST: bool = true;
}

/// Router specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Base URL for `url()` generation (scheme, host and port are used)
    pub base_url: String,
    /// Prefer `X-Forwarded-Host` over `Host` when resolving the request host
    pub trust_forwarded_host: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_url: RouterDefaults::BASE_URL.to_string(),
            trust_forwarded_host: RouterDefaults::TRUST_FORWARDED_HOST,
        }
    }
}

impl RouterConfig {
    /// Create a configuration with the given base URL and default settings
    pub fn with_base_url<T: Into<String>>(base_url: T) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from `ROUTER_BASE_URL` and `ROUTER_TRUST_FORWARDED_HOST`
    pub fn from_env() -> RoutingResult<Self> {
        let base_url = get_env_or_default("ROUTER_BASE_URL", RouterDefaults::BASE_URL);

        let trust_forwarded_host = get_env_or_default(
            "ROUTER_TRUST_FORWARDED_HOST",
            &RouterDefaults::TRUST_FORWARDED_HOST.to_string(),
        )
        .parse::<bool>()
        .map_err(|_| {
            RoutingError::config(
                "trust_forwarded_host",
                format!(
                    "expected true or false, got '{}'",
                    env::var("ROUTER_TRUST_FORWARDED_HOST").unwrap_or_default()
                ),
            )
        })?;

        let config = RouterConfig {
            base_url,
            trust_forwarded_host,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL is absolute and carries a host
    pub fn validate(&self) -> RoutingResult<()> {
        self.parsed_base_url().map(|_| ())
    }

    pub(crate) fn parsed_base_url(&self) -> RoutingResult<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| RoutingError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;

        if url.host_str().is_none() {
            return Err(RoutingError::InvalidBaseUrl {
                url: self.base_url.clone(),
                message: "base URL must include a host".to_string(),
            });
        }

        Ok(url)
    }
}

// Helper function for environment variable handling
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Global test lock to prevent concurrent environment modifications
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clean_test_env() {
        env::remove_var("ROUTER_BASE_URL");
        env::remove_var("ROUTER_TRUST_FORWARDED_HOST");
    }

    #[test]
    fn test_router_config_defaults() {
        let config = RouterConfig::default();

        assert_eq!(config.base_url, RouterDefaults::BASE_URL);
        assert_eq!(config.trust_forwarded_host, RouterDefaults::TRUST_FORWARDED_HOST);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_router_config_from_env() {
        let _guard = TEST_MUTEX.lock().unwrap();
        env::set_var("ROUTER_BASE_URL", "https://elif.rs");
        env::set_var("ROUTER_TRUST_FORWARDED_HOST", "false");

        let config = RouterConfig::from_env().unwrap();

        assert_eq!(config.base_url, "https://elif.rs");
        assert!(!config.trust_forwarded_host);

        clean_test_env();
    }

    #[test]
    fn test_router_config_invalid_env() {
        let _guard = TEST_MUTEX.lock().unwrap();
        env::set_var("ROUTER_TRUST_FORWARDED_HOST", "sometimes");

        let result = RouterConfig::from_env();
        assert!(matches!(result, Err(RoutingError::Config { ref field, .. }) if field == "trust_forwarded_host"));

        clean_test_env();
    }

    #[test]
    fn test_router_config_validation() {
        assert!(RouterConfig::with_base_url("not a url").validate().is_err());
        assert!(RouterConfig::with_base_url("mailto:someone@example.com").validate().is_err());
        assert!(RouterConfig::with_base_url("http://example.com:8080").validate().is_ok());
    }
}
