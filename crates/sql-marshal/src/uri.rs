//! Connection descriptor parsing and normalization.
//!
//! A connection address arrives either as a structured descriptor
//! ([`ConnectionParams`]) or as a raw string, and leaves as a canonical
//! [`ConnectionUri`]. Structured input is verified against the active
//! driver's scheme before anything else; raw strings pass through with no
//! scheme check. Two lifecycle shapes exist: *networked* (host present,
//! authority form) and *embedded/file-based* (host absent, opaque form with
//! no authority and no query).

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

use crate::error::{MarshalError, Result};

/// Query component of a structured descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryInput {
    /// Pre-rendered, already percent-encoded query string, used as-is.
    Raw(String),
    /// Key/value pairs, flattened in insertion order.
    Pairs(Vec<(String, String)>),
}

/// Structured connection descriptor input.
///
/// Built once per connection attempt; the parser never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Address scheme; must match the active driver's declared scheme.
    pub scheme: String,
    /// User name for the authority component.
    #[serde(default)]
    pub user: Option<String>,
    /// Password for the authority component. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Host; absent or empty selects the embedded/file-based shape.
    #[serde(default)]
    pub host: Option<String>,
    /// Port; `None` means unset.
    #[serde(default)]
    pub port: Option<u16>,
    /// Path (networked: must carry its leading slash) or opaque body.
    #[serde(default)]
    pub path: Option<String>,
    /// Query component.
    #[serde(default)]
    pub query: Option<QueryInput>,
    /// Fragment component.
    #[serde(default)]
    pub fragment: Option<String>,
}

/// Connection address input: structured or raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionInput {
    /// Structured descriptor, scheme-checked against the driver.
    Params(ConnectionParams),
    /// Raw address string, parsed directly with no scheme check.
    Raw(String),
}

/// Canonical, immutable connection descriptor.
///
/// Networked form: `scheme://[user[:password]@]host[:port][/path][?query][#fragment]`.
/// Embedded form: `scheme:path[#fragment]` — opaque, no authority, no query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUri {
    url: Url,
}

impl ConnectionUri {
    /// Address scheme.
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// User name, when the authority carries one.
    pub fn user(&self) -> Option<&str> {
        match self.url.username() {
            "" => None,
            user => Some(user),
        }
    }

    /// Password, when the authority carries one.
    pub fn password(&self) -> Option<&str> {
        self.url.password()
    }

    /// Host, for the networked shape.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Port, when set.
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    /// Path component (networked) or opaque body (embedded).
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Query component, already percent-encoded.
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Fragment component.
    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    /// Whether this is the embedded/file-based shape (no authority).
    pub fn is_opaque(&self) -> bool {
        !self.url.has_host()
    }

    /// The validated URL backing this descriptor.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// The rendered address.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Normalize a connection address against the active driver's scheme.
///
/// Structured input is scheme-verified and assembled into the networked or
/// embedded shape; raw strings are parsed as-is with no scheme check.
pub fn parse(input: &ConnectionInput, expected_scheme: &str) -> Result<ConnectionUri> {
    match input {
        ConnectionInput::Raw(address) => Ok(ConnectionUri {
            url: Url::parse(address)?,
        }),
        ConnectionInput::Params(params) => parse_params(params, expected_scheme),
    }
}

fn parse_params(params: &ConnectionParams, expected_scheme: &str) -> Result<ConnectionUri> {
    // Scheme is verified before any assembly; a mismatch produces no
    // partially parsed descriptor.
    if params.scheme != expected_scheme {
        return Err(MarshalError::SchemeMismatch {
            expected: expected_scheme.to_string(),
            actual: params.scheme.clone(),
        });
    }

    let userinfo = render_userinfo(params);
    let query = params.query.as_ref().map(render_query);
    let path = params.path.as_deref().unwrap_or("");

    let rendered = match params.host.as_deref() {
        // a client/server database (networked, authority form)
        Some(host) if !host.is_empty() => {
            let mut out = format!("{}://", params.scheme);
            if !userinfo.is_empty() {
                out.push_str(&userinfo);
                out.push('@');
            }
            out.push_str(host);
            if let Some(port) = params.port {
                out.push(':');
                out.push_str(&port.to_string());
            }
            out.push_str(path);
            if let Some(ref query) = query {
                out.push('?');
                out.push_str(query);
            }
            if let Some(ref fragment) = params.fragment {
                out.push('#');
                out.push_str(fragment);
            }
            out
        }
        // an embedded / file-based database: opaque form, authority and
        // query are dropped even when supplied
        _ => {
            let mut out = format!("{}:{}", params.scheme, path);
            if let Some(ref fragment) = params.fragment {
                out.push('#');
                out.push_str(fragment);
            }
            out
        }
    };

    Ok(ConnectionUri {
        url: Url::parse(&rendered)?,
    })
}

/// `user` or `user:password`, each part only when present and non-empty.
fn render_userinfo(params: &ConnectionParams) -> String {
    let mut out = String::new();
    if let Some(user) = params.user.as_deref() {
        if !user.is_empty() {
            out.push_str(user);
            if let Some(password) = params.password.as_deref() {
                if !password.is_empty() {
                    out.push(':');
                    out.push_str(password);
                }
            }
        }
    }
    out
}

/// Flatten a query into its percent-encoded rendering.
///
/// Key/value pairs are emitted in insertion order as `key=value` with **no
/// separator between pairs** (`a=1b=2`). This is a known anomaly preserved
/// for compatibility with addresses already in the wild; do not "fix" it
/// without a migration story for existing descriptors.
fn render_query(query: &QueryInput) -> String {
    match query {
        QueryInput::Raw(raw) => raw.clone(),
        QueryInput::Pairs(pairs) => {
            let mut out = String::new();
            for (key, value) in pairs {
                out.extend(form_urlencoded::byte_serialize(key.as_bytes()));
                out.push('=');
                out.extend(form_urlencoded::byte_serialize(value.as_bytes()));
            }
            out
        }
    }
}
