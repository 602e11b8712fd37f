//! Scheme-keyed driver registry.
//!
//! The registry is explicitly constructed and handed to whoever opens
//! connections — no global singleton, deterministic registration order, and
//! easy to populate with stand-ins for tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{builtin, DriverDefinition};
use crate::error::{MarshalError, Result};

/// Registry of driver definitions, keyed by scheme.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<DriverDefinition>>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin backends registered
    /// (`mysql`, `postgres`, `sqlite3`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(builtin::mysql());
        registry.register(builtin::postgres());
        registry.register(builtin::sqlite3());
        registry
    }

    /// Register a definition under its scheme. A later registration for the
    /// same scheme replaces the earlier one.
    pub fn register(&mut self, definition: DriverDefinition) {
        self.register_arc(Arc::new(definition));
    }

    /// Register an already-shared definition.
    pub fn register_arc(&mut self, definition: Arc<DriverDefinition>) {
        debug!(scheme = definition.scheme(), "registered driver");
        self.drivers
            .insert(definition.scheme().to_string(), definition);
    }

    /// Get a definition by scheme.
    pub fn get(&self, scheme: &str) -> Option<Arc<DriverDefinition>> {
        self.drivers.get(scheme).cloned()
    }

    /// Get a definition by scheme, failing when none is registered.
    pub fn require(&self, scheme: &str) -> Result<Arc<DriverDefinition>> {
        self.get(scheme)
            .ok_or_else(|| MarshalError::UnknownDriver(scheme.to_string()))
    }

    /// Whether a scheme is registered.
    pub fn has(&self, scheme: &str) -> bool {
        self.drivers.contains_key(scheme)
    }

    /// All registered schemes.
    pub fn schemes(&self) -> Vec<&str> {
        self.drivers.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("schemes", &self.drivers.keys().collect::<Vec<_>>())
            .finish()
    }
}
