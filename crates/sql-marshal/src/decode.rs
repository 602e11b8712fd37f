//! Result decoding: one cell of a result row into a dynamic value.
//!
//! [`ResultDecoder::decode`] is total over [`ValueKind`]: every kind has a
//! rule, and the `String` rule absorbs anything a backend reports that the
//! boundary does not otherwise recognize. Two failure cases are deliberately
//! lossy and decode to nil instead of surfacing — an all-zero timestamp
//! rejected by the backend, and a value that cannot be deserialized from the
//! runtime's native object format. Both are logged.

use std::io::Read;

use bytes::BytesMut;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::core::kind::ValueKind;
use crate::core::runtime::RuntimeAdapter;
use crate::core::traits::{ResultCursor, SqlType};
use crate::core::value::{DynStr, DynValue};
use crate::error::{MarshalError, Result};

/// Bytes read per chunk when draining a binary column stream.
const BINARY_CHUNK_SIZE: usize = 2048;

/// Decodes result cells into dynamic-runtime values.
///
/// Holds the embedding-runtime capability object needed for class-reference
/// resolution and object deserialization; everything else is self-contained.
pub struct ResultDecoder<'a, R: RuntimeAdapter> {
    runtime: &'a R,
}

impl<'a, R: RuntimeAdapter> ResultDecoder<'a, R> {
    /// Create a decoder backed by the given runtime adapter.
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Decode the cell at `col` as `kind`.
    ///
    /// A missing cursor yields nil immediately, with no per-kind dispatch.
    /// Decoding a SQL NULL yields nil for every kind.
    pub fn decode<C: ResultCursor>(
        &self,
        cursor: Option<&mut C>,
        col: usize,
        kind: ValueKind,
    ) -> Result<DynValue> {
        match cursor {
            None => Ok(DynValue::Nil),
            Some(cursor) => self.decode_cell(cursor, col, kind),
        }
    }

    fn decode_cell<C: ResultCursor>(
        &self,
        cursor: &mut C,
        col: usize,
        kind: ValueKind,
    ) -> Result<DynValue> {
        let value = match kind {
            // Magnitude alone determines the runtime representation at the
            // boundary; both integer kinds read the same way.
            ValueKind::Integer | ValueKind::BigInteger => match cursor.get_i64(col)? {
                Some(v) => DynValue::Integer(v),
                None => DynValue::Nil,
            },
            ValueKind::Float => match cursor.get_decimal(col)? {
                // to_f64 is total over Decimal's range
                Some(d) => DynValue::Float(d.to_f64().unwrap_or_default()),
                None => DynValue::Nil,
            },
            ValueKind::Decimal => match cursor.get_decimal(col)? {
                Some(d) => DynValue::Decimal(d),
                None => DynValue::Nil,
            },
            ValueKind::Date => match cursor.get_date(col)? {
                Some(d) => DynValue::Date(d),
                None => DynValue::Nil,
            },
            ValueKind::DateTime => match cursor.get_timestamp(col) {
                Ok(Some(ts)) => DynValue::DateTime(ts),
                Ok(None) => DynValue::Nil,
                Err(failure) if failure.is_zero_timestamp() => {
                    debug!(%failure, "all-zero timestamp rejected by backend; decoding as nil");
                    DynValue::Nil
                }
                Err(failure) => return Err(failure.into()),
            },
            // Dispatch on the column's declared type, not the requested kind.
            ValueKind::Time => match cursor.column_sql_type(col)? {
                SqlType::Time | SqlType::Timestamp => match cursor.get_time(col)? {
                    Some(t) => DynValue::Time(time_of_day_instant(t)),
                    None => DynValue::Nil,
                },
                SqlType::Date => match cursor.get_date(col)? {
                    Some(d) => DynValue::Time(midnight_instant(d)),
                    None => DynValue::Nil,
                },
                _ => match cursor.get_string(col)? {
                    Some(s) => DynValue::Text(DynStr::tainted(s)),
                    None => DynValue::Nil,
                },
            },
            ValueKind::Boolean => match cursor.get_bool(col)? {
                Some(b) => DynValue::Boolean(b),
                None => DynValue::Nil,
            },
            ValueKind::ByteArray => match cursor.binary_stream(col)? {
                Some(stream) => DynValue::Bytes(read_fully(stream)?),
                None => DynValue::Nil,
            },
            ValueKind::ClassReference => match cursor.get_string(col)? {
                Some(name) => {
                    // untrusted until the runtime's own resolution vets it
                    let name = DynStr::tainted(name);
                    self.runtime.resolve_constant(&name)?
                }
                None => DynValue::Nil,
            },
            ValueKind::SerializedObject => match cursor.binary_stream(col)? {
                Some(stream) => {
                    let decoded = read_fully(stream)
                        .map_err(MarshalError::from)
                        .and_then(|bytes| self.runtime.deserialize_object(&bytes));
                    match decoded {
                        Ok(value) => value,
                        Err(error) => {
                            debug!(%error, "object deserialization failed; decoding as nil");
                            DynValue::Nil
                        }
                    }
                }
                None => DynValue::Nil,
            },
            ValueKind::Null => DynValue::Nil,
            ValueKind::String => match cursor.get_string(col)? {
                Some(s) => DynValue::Text(DynStr::tainted(s)),
                None => DynValue::Nil,
            },
        };
        Ok(value)
    }
}

/// Drain a binary stream in fixed-size chunks into one buffer.
///
/// Takes the stream by value so it is dropped — and therefore closed — on
/// every exit path, including a mid-stream read error.
fn read_fully<S: Read>(mut stream: S) -> std::io::Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(BINARY_CHUNK_SIZE);
    let mut chunk = [0u8; BINARY_CHUNK_SIZE];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Ok(buf.to_vec())
}

/// Anchor a time of day on the epoch date.
fn time_of_day_instant(time: NaiveTime) -> DateTime<FixedOffset> {
    NaiveDate::default().and_time(time).and_utc().fixed_offset()
}

/// A date column read as a time: midnight of that date.
fn midnight_instant(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}
