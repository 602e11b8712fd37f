//! The closed set of semantic types exchanged across the boundary.

/// Semantic type of a value crossing the dynamic/relational boundary.
///
/// Exactly one kind applies to any value. Decoding and encoding are total
/// over this enumeration: the decoder absorbs unrecognized kinds through the
/// [`String`](ValueKind::String) rules, and the encoder routes ambiguous
/// source values through an ordered fallback chain. Any new database column
/// type must be mapped onto one of these kinds before crossing the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Fixed-size integer.
    Integer,
    /// Arbitrary-precision integer.
    BigInteger,
    /// Floating-point number.
    Float,
    /// Exact arbitrary-precision decimal.
    Decimal,
    /// Calendar date without a time component.
    Date,
    /// Civil date-time with a UTC offset.
    DateTime,
    /// Time of day.
    Time,
    /// Boolean.
    Boolean,
    /// Raw binary content.
    ByteArray,
    /// Name of a runtime type/constant, resolved by the embedding runtime.
    ClassReference,
    /// Value serialized in the embedding runtime's native object format.
    SerializedObject,
    /// SQL NULL.
    Null,
    /// Character data; also the decode fallback for anything unrecognized.
    String,
}

impl ValueKind {
    /// All thirteen kinds, in declaration order.
    pub const ALL: [ValueKind; 13] = [
        ValueKind::Integer,
        ValueKind::BigInteger,
        ValueKind::Float,
        ValueKind::Decimal,
        ValueKind::Date,
        ValueKind::DateTime,
        ValueKind::Time,
        ValueKind::Boolean,
        ValueKind::ByteArray,
        ValueKind::ClassReference,
        ValueKind::SerializedObject,
        ValueKind::Null,
        ValueKind::String,
    ];
}
