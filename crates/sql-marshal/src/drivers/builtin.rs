//! Builtin backend definitions.
//!
//! Each function builds the [`DriverDefinition`] for one well-known backend:
//! its scheme, module name, capability flags, and quirk overrides. Embedders
//! with other backends construct their own definitions the same way and
//! register them alongside these.

use std::sync::Arc;

use super::{ConnectionProperties, DriverCapabilities, DriverDefinition, DriverQuirks};

struct MysqlQuirks;

impl DriverQuirks for MysqlQuirks {
    // MySQL string literals escape backslashes as well as quotes
    fn quote_string(&self, value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => quoted.push_str("''"),
                '\\' => quoted.push_str("\\\\"),
                _ => quoted.push(ch),
            }
        }
        quoted.push('\'');
        quoted
    }

    fn default_connection_properties(&self) -> ConnectionProperties {
        let mut properties = ConnectionProperties::new();
        // all-zero dates come back as NULL instead of failing the read
        properties.insert(
            "zeroDateTimeBehavior".to_string(),
            "convertToNull".to_string(),
        );
        properties.insert("useUnicode".to_string(), "yes".to_string());
        properties
    }

    fn set_encoding_property(&self, properties: &mut ConnectionProperties, encoding: &str) {
        properties.insert("characterEncoding".to_string(), encoding.to_string());
    }
}

/// MySQL backend definition.
///
/// Timestamps bound with a calendar are reinterpreted in the server's
/// default time zone, so calendar-aware binding is off and the encoder
/// compensates.
pub fn mysql() -> DriverDefinition {
    DriverDefinition::with_quirks(
        "mysql",
        "Mysql",
        DriverCapabilities {
            generated_keys: true,
            scrollable_cursors: true,
            connection_encodings: true,
            prepare_with_generated_keys_flag: true,
            calendar_timestamp_binding: false,
        },
        Arc::new(MysqlQuirks),
    )
}

struct PostgresQuirks;

impl DriverQuirks for PostgresQuirks {
    // standard-conforming strings: double the quote character
    fn quote_string(&self, value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for ch in value.chars() {
            if ch == '\'' {
                quoted.push_str("''");
            } else {
                quoted.push(ch);
            }
        }
        quoted.push('\'');
        quoted
    }
}

/// PostgreSQL backend definition.
pub fn postgres() -> DriverDefinition {
    DriverDefinition::with_quirks(
        "postgres",
        "Postgres",
        DriverCapabilities {
            generated_keys: true,
            scrollable_cursors: true,
            ..Default::default()
        },
        Arc::new(PostgresQuirks),
    )
}

struct SqliteQuirks;

impl DriverQuirks for SqliteQuirks {
    fn quote_string(&self, value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for ch in value.chars() {
            if ch == '\'' {
                quoted.push_str("''");
            } else {
                quoted.push(ch);
            }
        }
        quoted.push('\'');
        quoted
    }

    fn generated_keys_sql(&self) -> Option<&str> {
        Some("SELECT last_insert_rowid()")
    }
}

/// SQLite backend definition (embedded/file-based addresses).
///
/// No native generated-keys reporting; retrieval goes through the
/// last-insert-rowid query instead.
pub fn sqlite3() -> DriverDefinition {
    DriverDefinition::with_quirks(
        "sqlite3",
        "Sqlite3",
        DriverCapabilities {
            generated_keys: false,
            scrollable_cursors: false,
            ..Default::default()
        },
        Arc::new(SqliteQuirks),
    )
}
