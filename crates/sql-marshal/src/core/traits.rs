//! The relational client API boundary.
//!
//! This module defines the surface the marshalling layer requires from an
//! already-open connection's machinery:
//!
//! - [`ResultCursor`]: typed reads from one cell of a result row
//! - [`ParamStatement`]: typed binds into a parameterized statement
//! - [`Close`]: guaranteed-release hook shared by both
//!
//! Concrete backends implement these over their client library; the layer
//! itself never opens sockets or builds SQL text. All methods are
//! synchronous and run on the caller's thread; a cursor or statement is
//! exclusively owned by the operation driving it.

use std::io::Read;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::SqlFailure;

/// Result alias for relational-API calls.
pub type SqlResult<T> = std::result::Result<T, SqlFailure>;

/// Declared SQL type of a column or parameter.
///
/// Consulted for the time-decode dispatch, typed NULL binds, and the
/// encoder's declared-type fallback rule. Backends map their native type
/// codes onto this set; anything without a counterpart becomes [`Other`].
///
/// [`Other`]: SqlType::Other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    Integer,
    BigInt,
    Float,
    Decimal,
    Char,
    VarChar,
    Date,
    Time,
    Timestamp,
    Binary,
    Other,
}

/// A resource with guaranteed-release semantics.
///
/// Implementations release the underlying handle. Callers go through
/// [`Scoped`](super::guard::Scoped) to get exactly-once close with tolerated
/// double-close.
pub trait Close {
    /// Release the underlying handle.
    fn close(&mut self) -> SqlResult<()>;
}

/// Sequential, forward-moving handle over a query's returned rows,
/// positioned on the current row.
///
/// Read methods take a column index and return `Ok(None)` for SQL NULL.
/// Column indices are 1-based, matching the client APIs this layer sits on.
pub trait ResultCursor: Close {
    /// Read a 64-bit integer.
    fn get_i64(&mut self, col: usize) -> SqlResult<Option<i64>>;

    /// Read an arbitrary-precision decimal.
    fn get_decimal(&mut self, col: usize) -> SqlResult<Option<Decimal>>;

    /// Read a boolean.
    fn get_bool(&mut self, col: usize) -> SqlResult<Option<bool>>;

    /// Read a calendar date as its components (no epoch round-trip, so no
    /// time-zone skew).
    fn get_date(&mut self, col: usize) -> SqlResult<Option<NaiveDate>>;

    /// Read a timestamp.
    ///
    /// Backends that reject all-zero timestamps fail here with
    /// [`SqlFailure::ZERO_TIMESTAMP_SQL_STATE`]; the decoder treats that
    /// specific failure as a NULL read.
    fn get_timestamp(&mut self, col: usize) -> SqlResult<Option<DateTime<FixedOffset>>>;

    /// Read a time of day. For timestamp columns this is the time-of-day
    /// component.
    fn get_time(&mut self, col: usize) -> SqlResult<Option<NaiveTime>>;

    /// Read character data.
    fn get_string(&mut self, col: usize) -> SqlResult<Option<String>>;

    /// Open a stream over the column's binary content. The returned stream
    /// is closed when dropped; the decoder drains it in fixed-size chunks.
    fn binary_stream(&mut self, col: usize) -> SqlResult<Option<Box<dyn Read + '_>>>;

    /// Declared SQL type of the column, from the result metadata.
    fn column_sql_type(&self, col: usize) -> SqlResult<SqlType>;
}

/// A precompiled statement with positional placeholders.
///
/// Bind positions are 1-based. Binding never executes the statement.
pub trait ParamStatement: Close {
    /// Bind a 32-bit integer.
    fn bind_i32(&mut self, idx: usize, value: i32) -> SqlResult<()>;

    /// Bind a 64-bit integer.
    fn bind_i64(&mut self, idx: usize, value: i64) -> SqlResult<()>;

    /// Bind a double.
    fn bind_f64(&mut self, idx: usize, value: f64) -> SqlResult<()>;

    /// Bind an exact decimal.
    fn bind_decimal(&mut self, idx: usize, value: Decimal) -> SqlResult<()>;

    /// Bind a boolean.
    fn bind_bool(&mut self, idx: usize, value: bool) -> SqlResult<()>;

    /// Bind character data.
    fn bind_string(&mut self, idx: usize, value: &str) -> SqlResult<()>;

    /// Bind raw bytes.
    fn bind_bytes(&mut self, idx: usize, value: &[u8]) -> SqlResult<()>;

    /// Bind a calendar date.
    fn bind_date(&mut self, idx: usize, value: NaiveDate) -> SqlResult<()>;

    /// Bind a time of day.
    fn bind_time(&mut self, idx: usize, value: NaiveTime) -> SqlResult<()>;

    /// Bind a timestamp without calendar information.
    fn bind_timestamp(&mut self, idx: usize, value: NaiveDateTime) -> SqlResult<()>;

    /// Bind a millisecond-epoch instant together with its calendar offset.
    ///
    /// Used for the runtime's time type, whose value is an instant rather
    /// than a civil datetime.
    fn bind_instant(&mut self, idx: usize, epoch_millis: i64, offset: FixedOffset) -> SqlResult<()>;

    /// Bind SQL NULL, typed by the parameter's declared SQL type.
    fn bind_null(&mut self, idx: usize, sql_type: SqlType) -> SqlResult<()>;

    /// Bind a 32-bit integer explicitly typed by a declared SQL type
    /// (the typed-object bind of the underlying client API).
    fn bind_i32_as(&mut self, idx: usize, value: i32, sql_type: SqlType) -> SqlResult<()>;

    /// Declared SQL type of a parameter position, from the statement's
    /// parameter metadata.
    fn parameter_sql_type(&self, idx: usize) -> SqlResult<SqlType>;

    /// Declared SQL type of a result column position, from the statement's
    /// result metadata.
    ///
    /// The encoder's fallback chain consults this — not the parameter
    /// metadata — mirroring the client APIs where the two can disagree.
    fn result_column_sql_type(&self, idx: usize) -> SqlResult<SqlType>;
}
