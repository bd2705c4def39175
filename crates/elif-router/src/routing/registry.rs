//! Process-wide controller registry
//!
//! Routes declared with a `"controller#action"` reference are bound late: the
//! controller is looked up here each time the route is called, so routes may
//! name controllers that are registered after the routes are declared.

use super::route::Endpoint;
use crate::naming;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

static CONTROLLER_REGISTRY: Lazy<ControllerRegistry> = Lazy::new(ControllerRegistry::new);

/// Controllers by classified name (`Admin::Sessions`)
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: RwLock<HashMap<String, Arc<dyn Endpoint>>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry consulted by controller routes
    pub fn global() -> &'static ControllerRegistry {
        &CONTROLLER_REGISTRY
    }

    /// Register a controller; `"admin/sessions"` and `"Admin::Sessions"` are
    /// the same name
    pub fn register<E: Endpoint + 'static>(&self, name: &str, controller: E) {
        let name = naming::classify(name);
        tracing::debug!("Registered controller: {}", name);
        self.controllers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(controller));
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Endpoint>> {
        self.controllers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&naming::classify(name))
            .cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Remove a controller, returning it if it was registered
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Endpoint>> {
        self.controllers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&naming::classify(name))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .controllers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Register a controller with the global registry
pub fn register_controller<E: Endpoint + 'static>(name: &str, controller: E) {
    ControllerRegistry::global().register(name, controller);
}
