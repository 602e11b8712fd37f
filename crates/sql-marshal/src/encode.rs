//! Parameter encoding: one dynamic value into one statement position.
//!
//! Dispatch runs on the source value's own tag — the runtime's type — not on
//! the [`ValueKind`](crate::core::kind::ValueKind) the decoder was asked
//! for. Text values (and only text values) go through an ordered fallback
//! chain for weakly typed call sites; the precedence of those rules is part
//! of the contract, because callers depend on which rule wins.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::traits::{ParamStatement, SqlType};
use crate::core::value::DynValue;
use crate::drivers::DriverCapabilities;
use crate::error::{MarshalError, Result};

/// Fixed pattern for timestamp-looking text, with fractional seconds
/// rejected (the fallback chain is strict; the datetime path is not).
const TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Datetime texts tolerate fractional seconds.
const DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.f";

const TIME_PATTERN: &str = "%H:%M:%S";

/// Trailing explicit UTC-offset suffix on a canonical datetime text.
static OFFSET_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]\d{2}:\d{2}$").expect("valid offset pattern"));

/// The ordered fallback rules applied to text parameters.
///
/// Rules are tried in this order; the first applicable rule handles the
/// bind. [`DeclaredColumnType`](FallbackRule::DeclaredColumnType) always
/// applies, so the chain is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallbackRule {
    /// Text containing both a hyphen and a colon is tried as a timestamp;
    /// if it does not parse, it binds as a plain string.
    TimestampLiteral,
    /// Eight-character text containing a colon binds as a time of day.
    TimeLiteral,
    /// Consult the statement's declared column type (best effort) and bind
    /// accordingly; when in doubt, bind as a string.
    DeclaredColumnType,
}

const FALLBACK_RULES: [FallbackRule; 3] = [
    FallbackRule::TimestampLiteral,
    FallbackRule::TimeLiteral,
    FallbackRule::DeclaredColumnType,
];

/// Encodes dynamic values into statement parameters.
///
/// Holds the active backend's capability record to select the timestamp
/// binding strategy.
pub struct ParamEncoder<'a> {
    caps: &'a DriverCapabilities,
}

impl<'a> ParamEncoder<'a> {
    /// Create an encoder for a backend with the given capabilities.
    pub fn new(caps: &'a DriverCapabilities) -> Self {
        Self { caps }
    }

    /// Bind `value` at the 1-based position `idx`.
    pub fn encode<S: ParamStatement>(
        &self,
        statement: &mut S,
        value: &DynValue,
        idx: usize,
    ) -> Result<()> {
        match value {
            DynValue::Integer(v) => {
                // bound as a 32-bit integer parsed from its decimal text form
                let parsed: i32 = v.to_string().parse().map_err(|_| {
                    MarshalError::bind(format!(
                        "integer parameter {} does not fit 32 bits: {}",
                        idx, v
                    ))
                })?;
                statement.bind_i32(idx, parsed)?;
            }
            DynValue::BigInt(v) => {
                let narrowed = i64::try_from(*v).map_err(|_| {
                    MarshalError::bind(format!(
                        "big integer parameter {} does not fit 64 bits: {}",
                        idx, v
                    ))
                })?;
                statement.bind_i64(idx, narrowed)?;
            }
            DynValue::Float(v) => statement.bind_f64(idx, *v)?,
            DynValue::Decimal(v) => statement.bind_decimal(idx, *v)?,
            DynValue::Nil => {
                // typed by the target parameter's declared SQL type
                let sql_type = statement.parameter_sql_type(idx)?;
                statement.bind_null(idx, sql_type)?;
            }
            DynValue::Boolean(_) => {
                // truth decided by textual equality with the literal "true",
                // exactly as the runtime renders it
                statement.bind_bool(idx, value.to_string() == "true")?;
            }
            DynValue::ClassRef(name) => statement.bind_string(idx, name)?,
            DynValue::Bytes(bytes) => statement.bind_bytes(idx, bytes)?,
            DynValue::Date(_) => {
                let text = value.to_string();
                let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|err| {
                    MarshalError::bind(format!("invalid date parameter {:?}: {}", text, err))
                })?;
                statement.bind_date(idx, date)?;
            }
            DynValue::Time(instant) => self.encode_time(statement, instant, idx)?,
            DynValue::DateTime(_) => {
                // canonical text, separator normalized, explicit offset
                // suffix stripped, remainder bound as a timestamp
                let text = value.to_string().replace('T', " ");
                let text = OFFSET_SUFFIX.replace(&text, "");
                let ts = NaiveDateTime::parse_from_str(&text, DATETIME_PATTERN).map_err(|err| {
                    MarshalError::bind(format!("invalid datetime parameter {:?}: {}", text, err))
                })?;
                statement.bind_timestamp(idx, ts)?;
            }
            DynValue::Text(s) => self.encode_fallback(statement, &s.value, idx)?,
        }
        Ok(())
    }

    /// Bind the runtime's time type: an instant with an embedded calendar.
    fn encode_time<S: ParamStatement>(
        &self,
        statement: &mut S,
        instant: &DateTime<FixedOffset>,
        idx: usize,
    ) -> Result<()> {
        let millis = instant.timestamp_millis();
        if self.caps.calendar_timestamp_binding {
            statement.bind_instant(idx, millis, *instant.offset())?;
        } else {
            // Backends that silently reinterpret bound timestamps in the
            // default time zone get the offset subtracted up front, so the
            // two adjustments cancel out.
            let default_offset = Local
                .offset_from_utc_datetime(&instant.naive_utc())
                .fix()
                .local_minus_utc();
            let adjusted = millis - i64::from(default_offset) * 1000;
            statement.bind_instant(idx, adjusted, *instant.offset())?;
        }
        Ok(())
    }

    /// The ordered fallback chain for text parameters.
    fn encode_fallback<S: ParamStatement>(
        &self,
        statement: &mut S,
        text: &str,
        idx: usize,
    ) -> Result<()> {
        for rule in FALLBACK_RULES {
            match rule {
                FallbackRule::TimestampLiteral if text.contains('-') && text.contains(':') => {
                    let normalized = text.replace('T', " ");
                    return match NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_PATTERN) {
                        Ok(ts) => Ok(statement.bind_timestamp(idx, ts)?),
                        Err(_) => Ok(statement.bind_string(idx, text)?),
                    };
                }
                FallbackRule::TimeLiteral if text.contains(':') && text.len() == 8 => {
                    let time = NaiveTime::parse_from_str(text, TIME_PATTERN).map_err(|err| {
                        MarshalError::bind(format!("invalid time parameter {:?}: {}", text, err))
                    })?;
                    return Ok(statement.bind_time(idx, time)?);
                }
                FallbackRule::DeclaredColumnType => {
                    // metadata probe is best effort; a failing probe binds
                    // as a string
                    return match statement.result_column_sql_type(idx).ok() {
                        None => Ok(statement.bind_string(idx, text)?),
                        Some(SqlType::VarChar | SqlType::Char) => {
                            Ok(statement.bind_string(idx, text)?)
                        }
                        Some(SqlType::Integer) => match text.parse::<i32>() {
                            Ok(v) => Ok(statement.bind_i32_as(idx, v, SqlType::Integer)?),
                            Err(err) => {
                                debug!(
                                    %err,
                                    text,
                                    "numeric parse failed for integer column; binding as string"
                                );
                                Ok(statement.bind_string(idx, text)?)
                            }
                        },
                        Some(_) => Ok(statement.bind_string(idx, text)?),
                    };
                }
                _ => continue,
            }
        }
        Ok(statement.bind_string(idx, text)?)
    }
}
