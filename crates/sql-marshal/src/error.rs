//! Error types for the marshalling layer.

use std::fmt;

use thiserror::Error;

/// Raw failure surfaced by the relational client API.
///
/// Cursor and statement implementations report failures in this shape; the
/// layer either propagates them, translates them into a [`UniformError`]
/// under a backend error name, or — in two documented cases — swallows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFailure {
    /// Backend-specific error number. Values `<= 0` mean "no vendor code".
    pub vendor_code: i32,
    /// Standardized state code classifying the failure category.
    pub sql_state: String,
    /// Localized message reported by the backend.
    pub message: String,
}

impl SqlFailure {
    /// State reported when a backend rejects an all-zero timestamp
    /// (MySQL Connector-style). Reads failing with this state are treated
    /// as NULL by the result decoder.
    pub const ZERO_TIMESTAMP_SQL_STATE: &'static str = "S1009";

    /// Create a new failure record.
    pub fn new(vendor_code: i32, sql_state: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            vendor_code,
            sql_state: sql_state.into(),
            message: message.into(),
        }
    }

    /// Whether this is the all-zero-timestamp rejection the decoder swallows.
    pub fn is_zero_timestamp(&self) -> bool {
        self.sql_state == Self::ZERO_TIMESTAMP_SQL_STATE
    }
}

impl fmt::Display for SqlFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.sql_state, self.message)
    }
}

impl std::error::Error for SqlFailure {}

/// Uniform error object built from a relational failure.
///
/// Constructed at the moment a database operation fails and immediately
/// wrapped into [`MarshalError::Driver`]; not retained afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformError {
    /// Vendor code, present only when the backend reported a positive one.
    pub vendor_code: Option<i32>,
    /// Standardized state code.
    pub sql_state: String,
    /// Localized message.
    pub message: String,
    /// Offending statement text, when the caller supplied it.
    pub statement: Option<String>,
}

impl UniformError {
    /// Translate a raw failure. The vendor code is carried only when
    /// positive; the statement text only when supplied.
    pub fn from_failure(failure: &SqlFailure, statement: Option<&str>) -> Self {
        Self {
            vendor_code: (failure.vendor_code > 0).then_some(failure.vendor_code),
            sql_state: failure.sql_state.clone(),
            message: failure.message.clone(),
            statement: statement.map(str::to_owned),
        }
    }
}

impl fmt::Display for UniformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        if let Some(code) = self.vendor_code {
            write!(f, "vendor_errno={}, ", code)?;
        }
        write!(f, "sql_state={}) {}", self.sql_state, self.message)?;
        if let Some(ref statement) = self.statement {
            write!(f, "\nQuery: {}", statement)?;
        }
        Ok(())
    }
}

/// Main error type for marshalling operations.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// Connection address could not be parsed as a URI.
    #[error("malformed connection uri: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// Structured connection input named a scheme other than the driver's.
    #[error("scheme mismatch, expected: {expected} but got: {actual}")]
    SchemeMismatch { expected: String, actual: String },

    /// Connection input could not be percent-encoded.
    ///
    /// Rust strings are UTF-8 by construction, so this variant is reserved
    /// for embedders whose adapter surfaces non-UTF-8 address material.
    #[error("unsupported character encoding: {0}")]
    Encoding(String),

    /// Untranslated relational failure from a cursor or statement.
    #[error("database failure: {0}")]
    Failure(#[from] SqlFailure),

    /// Relational failure translated under the backend's error type name.
    #[error("{driver}: {error}")]
    Driver { driver: String, error: UniformError },

    /// A parameter could not be bound at the requested position.
    #[error("bind error: {0}")]
    Bind(String),

    /// Failure raised by the embedding runtime (constant resolution,
    /// object deserialization).
    #[error("embedding runtime error: {0}")]
    Runtime(String),

    /// No driver registered for the requested scheme.
    #[error("no driver registered for scheme: {0}")]
    UnknownDriver(String),

    /// I/O error while streaming a binary column.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarshalError {
    /// Create a bind error.
    pub fn bind(message: impl Into<String>) -> Self {
        MarshalError::Bind(message.into())
    }

    /// Create an embedding-runtime error.
    pub fn runtime(message: impl Into<String>) -> Self {
        MarshalError::Runtime(message.into())
    }
}

/// Result type alias for marshalling operations.
pub type Result<T> = std::result::Result<T, MarshalError>;
