//! Dynamic-runtime value representation.
//!
//! [`DynValue`] is the runtime side of the boundary: every decoded result
//! cell becomes one, and every bound parameter starts as one. The canonical
//! text forms produced by `Display` are what the parameter encoder parses
//! when a bind goes through a textual path.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use super::kind::ValueKind;

/// A string crossing the boundary, with its trust level visible.
///
/// Strings decoded from a database are never implicitly trusted; the decoder
/// marks them tainted before they reach the embedding runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynStr {
    /// The character data.
    pub value: String,
    /// Whether the string originated outside the runtime's trust boundary.
    pub tainted: bool,
}

impl DynStr {
    /// Create a trusted string (runtime-originated).
    pub fn trusted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tainted: false,
        }
    }

    /// Create a tainted string (database-originated).
    pub fn tainted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tainted: true,
        }
    }
}

impl fmt::Display for DynStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A value in the dynamic runtime's tagged representation.
///
/// The variant set mirrors the runtime's own types, which is why both a
/// fixed-size and an arbitrary-precision integer exist even though decoding
/// only ever produces the fixed-size one (magnitude alone determines the
/// runtime representation at the boundary).
#[derive(Debug, Clone, PartialEq)]
pub enum DynValue {
    /// The runtime's nil.
    Nil,
    /// Fixed-size integer.
    Integer(i64),
    /// Arbitrary-precision integer.
    BigInt(i128),
    /// Floating-point number.
    Float(f64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Boolean.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Civil date-time with a UTC offset.
    DateTime(DateTime<FixedOffset>),
    /// The runtime's time type: an instant carrying its calendar offset.
    Time(DateTime<FixedOffset>),
    /// Raw binary content.
    Bytes(Vec<u8>),
    /// Resolved or to-be-bound type/constant name.
    ClassRef(String),
    /// Character data with taint tracking.
    Text(DynStr),
}

impl DynValue {
    /// The value kind this value maps onto — the runtime's own
    /// type-inference over its tagged representation.
    pub fn kind(&self) -> ValueKind {
        match self {
            DynValue::Nil => ValueKind::Null,
            DynValue::Integer(_) => ValueKind::Integer,
            DynValue::BigInt(_) => ValueKind::BigInteger,
            DynValue::Float(_) => ValueKind::Float,
            DynValue::Decimal(_) => ValueKind::Decimal,
            DynValue::Boolean(_) => ValueKind::Boolean,
            DynValue::Date(_) => ValueKind::Date,
            DynValue::DateTime(_) => ValueKind::DateTime,
            DynValue::Time(_) => ValueKind::Time,
            DynValue::Bytes(_) => ValueKind::ByteArray,
            DynValue::ClassRef(_) => ValueKind::ClassReference,
            DynValue::Text(_) => ValueKind::String,
        }
    }

    /// Whether this is the runtime's nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, DynValue::Nil)
    }

    /// Create a trusted text value.
    pub fn text(value: impl Into<String>) -> Self {
        DynValue::Text(DynStr::trusted(value))
    }

    /// Create a tainted text value.
    pub fn tainted_text(value: impl Into<String>) -> Self {
        DynValue::Text(DynStr::tainted(value))
    }
}

impl fmt::Display for DynValue {
    /// Canonical text form, matching what the runtime itself would render.
    ///
    /// Date-times render ISO-8601 with an explicit offset; the encoder's
    /// textual paths rely on these exact shapes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynValue::Nil => Ok(()),
            DynValue::Integer(v) => write!(f, "{}", v),
            DynValue::BigInt(v) => write!(f, "{}", v),
            DynValue::Float(v) => write!(f, "{}", v),
            DynValue::Decimal(v) => write!(f, "{}", v),
            DynValue::Boolean(v) => write!(f, "{}", v),
            DynValue::Date(v) => write!(f, "{}", v),
            DynValue::DateTime(v) => f.write_str(&v.to_rfc3339()),
            DynValue::Time(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S %z")),
            DynValue::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            DynValue::ClassRef(name) => f.write_str(name),
            DynValue::Text(s) => f.write_str(&s.value),
        }
    }
}

// Convenience conversions for the common payloads
impl From<i64> for DynValue {
    fn from(v: i64) -> Self {
        DynValue::Integer(v)
    }
}

impl From<i128> for DynValue {
    fn from(v: i128) -> Self {
        DynValue::BigInt(v)
    }
}

impl From<f64> for DynValue {
    fn from(v: f64) -> Self {
        DynValue::Float(v)
    }
}

impl From<Decimal> for DynValue {
    fn from(v: Decimal) -> Self {
        DynValue::Decimal(v)
    }
}

impl From<bool> for DynValue {
    fn from(v: bool) -> Self {
        DynValue::Boolean(v)
    }
}

impl From<NaiveDate> for DynValue {
    fn from(v: NaiveDate) -> Self {
        DynValue::Date(v)
    }
}

impl From<Vec<u8>> for DynValue {
    fn from(v: Vec<u8>) -> Self {
        DynValue::Bytes(v)
    }
}

impl From<String> for DynValue {
    fn from(v: String) -> Self {
        DynValue::text(v)
    }
}

impl From<&str> for DynValue {
    fn from(v: &str) -> Self {
        DynValue::text(v)
    }
}
