//! Per-backend capability descriptors and driver registration.
//!
//! A backend customizes this layer through exactly one point: a
//! [`DriverDefinition`] supplied at registration time, combining
//!
//! - a scheme string and a module/error-namespace name,
//! - an immutable [`DriverCapabilities`] record of optional behaviors,
//! - a [`DriverQuirks`] strategy for the few genuinely per-backend
//!   algorithms (string quoting, connection properties, generated-keys
//!   retrieval).
//!
//! Definitions are created once, shared read-only by every connection using
//! that backend, and safe for concurrent reads.

pub mod builtin;
pub mod registry;

pub use registry::DriverRegistry;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{MarshalError, Result, SqlFailure, UniformError};
use crate::uri::{ConnectionInput, ConnectionUri};

/// Connection properties handed to the underlying client at open time.
pub type ConnectionProperties = HashMap<String, String>;

/// Per-backend record of supported optional behaviors.
///
/// Read-only after driver registration. The defaults follow the layer's
/// contract: connection encodings are unsupported, the
/// prepare-with-generated-keys flag and calendar-aware timestamp binding are
/// supported. Generated-keys and scrollable-cursor support carry no sensible
/// default and must be set per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverCapabilities {
    /// Whether the backend reports keys generated by an insert.
    pub generated_keys: bool,
    /// Whether cursors can scroll rather than only move forward.
    pub scrollable_cursors: bool,
    /// Whether a client-side connection encoding can be requested.
    pub connection_encodings: bool,
    /// Whether statements can be prepared with the generated-keys flag.
    pub prepare_with_generated_keys_flag: bool,
    /// Whether bound timestamps keep the calendar they were bound with.
    /// Backends that reinterpret them in the default time zone set this to
    /// `false` and get the compensating offset subtraction on time binds.
    pub calendar_timestamp_binding: bool,
}

impl Default for DriverCapabilities {
    fn default() -> Self {
        Self {
            generated_keys: false,
            scrollable_cursors: false,
            connection_encodings: false,
            prepare_with_generated_keys_flag: true,
            calendar_timestamp_binding: true,
        }
    }
}

/// Strategy interface for the behaviors that are genuinely per-backend
/// algorithms rather than flags.
///
/// Every method has a default matching the layer's contract, so a backend
/// overrides only what it must.
pub trait DriverQuirks: Send + Sync {
    /// Quote a string literal. The default wraps in single quotes without
    /// escaping; backends needing escaping must override.
    fn quote_string(&self, value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        quoted.push_str(value);
        quoted.push('\'');
        quoted
    }

    /// Connection properties every connection to this backend starts with.
    fn default_connection_properties(&self) -> ConnectionProperties {
        ConnectionProperties::new()
    }

    /// Record the requested client encoding in the connection properties.
    /// No-op by default; meaningful only when
    /// [`DriverCapabilities::connection_encodings`] is set.
    fn set_encoding_property(&self, _properties: &mut ConnectionProperties, _encoding: &str) {}

    /// Query retrieving the keys generated by the last insert, for backends
    /// without native generated-keys reporting. `None` means no retrieval
    /// is available.
    fn generated_keys_sql(&self) -> Option<&str> {
        None
    }
}

/// Quirks implementation with every behavior at its documented default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQuirks;

impl DriverQuirks for DefaultQuirks {}

/// Per-backend registration record.
///
/// Created once at driver-registration time; immutable and shared by all
/// connections using that backend.
pub struct DriverDefinition {
    scheme: String,
    module_name: String,
    capabilities: DriverCapabilities,
    quirks: Arc<dyn DriverQuirks>,
}

impl DriverDefinition {
    /// Create a definition with the default quirks.
    pub fn new(
        scheme: impl Into<String>,
        module_name: impl Into<String>,
        capabilities: DriverCapabilities,
    ) -> Self {
        Self::with_quirks(scheme, module_name, capabilities, Arc::new(DefaultQuirks))
    }

    /// Create a definition with backend-specific quirks.
    pub fn with_quirks(
        scheme: impl Into<String>,
        module_name: impl Into<String>,
        capabilities: DriverCapabilities,
        quirks: Arc<dyn DriverQuirks>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            module_name: module_name.into(),
            capabilities,
            quirks,
        }
    }

    /// The address scheme this backend answers to.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The backend's module/error-namespace name.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// The backend's error type name: the module name with an `Error`
    /// suffix.
    pub fn error_name(&self) -> String {
        format!("{}Error", self.module_name)
    }

    /// The backend's capability record.
    pub fn capabilities(&self) -> &DriverCapabilities {
        &self.capabilities
    }

    /// The backend's strategy overrides.
    pub fn quirks(&self) -> &dyn DriverQuirks {
        self.quirks.as_ref()
    }

    /// Normalize a connection address against this backend's scheme.
    pub fn parse_connection(&self, input: &ConnectionInput) -> Result<ConnectionUri> {
        crate::uri::parse(input, &self.scheme)
    }

    /// Translate a relational failure into the uniform error raised under
    /// this backend's error name.
    pub fn translate_error(&self, failure: &SqlFailure, statement: Option<&str>) -> MarshalError {
        MarshalError::Driver {
            driver: self.error_name(),
            error: UniformError::from_failure(failure, statement),
        }
    }
}

impl fmt::Debug for DriverDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverDefinition")
            .field("scheme", &self.scheme)
            .field("module_name", &self.module_name)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}
