//! Scoped route registration
//!
//! A [`Scope`] forwards every registration to its parent with its prefixes
//! applied: the path prefix to the path, the namespace to
//! `"controller#action"` references and the name prefix to route names.
//! Scopes nest, prefixes composing from the outermost inwards.

use super::builder::Registrar;
use super::route::{Endpoint, Mount, Route, RouteDef};
use crate::errors::RoutingResult;
use crate::naming;
use std::sync::Arc;

/// Prefixes applied by a scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeOptions {
    pub path: Option<String>,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

impl ScopeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path, namespace and name prefixes all set to `name`
    pub fn namespace<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Self {
            path: Some(name.clone()),
            namespace: Some(name.clone()),
            name: Some(name),
        }
    }

    pub fn path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn in_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Route name prefix
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A registration context with prefixes
pub struct Scope<'a> {
    parent: &'a mut dyn Registrar,
    options: ScopeOptions,
}

impl<'a> Scope<'a> {
    pub fn new(parent: &'a mut dyn Registrar, options: ScopeOptions) -> Self {
        Self { parent, options }
    }

    pub fn options(&self) -> &ScopeOptions {
        &self.options
    }

    fn prefixed_path(&self, path: &str) -> String {
        naming::join(&[self.options.path.as_deref(), Some(path)], "/")
    }
}

impl Registrar for Scope<'_> {
    fn add(&mut self, verb: &str, path: &str, def: RouteDef) -> RoutingResult<&Route> {
        let path = self.prefixed_path(path);
        let def = def
            .within_namespace(self.options.namespace.as_deref())
            .within_name(self.options.name.as_deref());
        self.parent.add(verb, &path, def)
    }

    fn add_mount(
        &mut self,
        at: &str,
        app: Arc<dyn Endpoint>,
        host: Option<&str>,
    ) -> RoutingResult<&Mount> {
        let at = self.prefixed_path(at);
        self.parent.add_mount(&at, app, host)
    }
}
