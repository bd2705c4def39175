//! Request context passed through dispatch
//!
//! [`Env`] carries what the transport knows about a request (verb, path and
//! the host signals) in, and what routing decided (captured parameters,
//! controller and action) out to the endpoint.

use crate::routing::Params;
use once_cell::unsync::OnceCell;
use std::collections::HashMap;

const FORWARDED_HOST: &str = "x-forwarded-host";

/// The request context an endpoint receives
#[derive(Debug, Clone)]
pub struct Env {
    pub method: http::Method,
    pub path: String,
    pub forwarded_host: Option<String>,
    pub host: Option<String>,
    pub server_name: Option<String>,
    pub server_addr: Option<String>,
    /// Free-form values set by the transport or by outer endpoints
    pub extensions: HashMap<String, String>,
    /// Parameters captured by every router the request passed through
    pub params: Params,
    /// Controller identifier of the matched route, when it named one
    pub controller: Option<String>,
    /// Action of the matched route, when it named one
    pub action: Option<String>,
    resolved_host: OnceCell<Option<String>>,
}

impl Env {
    pub fn new<P: Into<String>>(method: http::Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            forwarded_host: None,
            host: None,
            server_name: None,
            server_addr: None,
            extensions: HashMap::new(),
            params: Params::new(),
            controller: None,
            action: None,
            resolved_host: OnceCell::new(),
        }
    }

    /// Shorthand for a `GET` request to `path`
    pub fn get<P: Into<String>>(path: P) -> Self {
        Self::new(http::Method::GET, path)
    }

    /// Build a context from an `http::Request`.
    ///
    /// The path comes from the request URI, the host from the `Host` header
    /// and the server name from the URI authority when the request line
    /// carried one.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        let mut env = Self::new(request.method().clone(), request.uri().path());
        env.forwarded_host = header(FORWARDED_HOST);
        env.host = header(http::header::HOST.as_str());
        env.server_name = request.uri().host().map(str::to_string);
        env
    }

    pub fn with_host<H: Into<String>>(mut self, host: H) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_forwarded_host<H: Into<String>>(mut self, host: H) -> Self {
        self.forwarded_host = Some(host.into());
        self
    }

    pub fn with_server_name<H: Into<String>>(mut self, name: H) -> Self {
        self.server_name = Some(name.into());
        self
    }

    pub fn with_server_addr<H: Into<String>>(mut self, addr: H) -> Self {
        self.server_addr = Some(addr.into());
        self
    }

    pub fn with_extension<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// The host this request was addressed to.
    ///
    /// With `trust_forwarded` set, the last entry of `X-Forwarded-Host` wins;
    /// otherwise the first of host, server name and server address that is
    /// present. Computed once per context.
    pub fn resolved_host(&self, trust_forwarded: bool) -> Option<&str> {
        self.resolved_host
            .get_or_init(|| {
                let forwarded = self
                    .forwarded_host
                    .as_deref()
                    .filter(|_| trust_forwarded)
                    .and_then(|value| value.rsplit(',').next())
                    .map(str::trim)
                    .filter(|value| !value.is_empty());

                forwarded
                    .or(self.host.as_deref())
                    .or(self.server_name.as_deref())
                    .or(self.server_addr.as_deref())
                    .map(str::to_string)
            })
            .as_deref()
    }
}
