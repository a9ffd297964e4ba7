//! Scalar types that can live at a key.
//!
//! Every scalar stored by pathbind goes through `TypedValue`: one string
//! encoding out, one parser in. The encodings are plain text so keys can be
//! inspected with ordinary store tooling.

use std::fmt;
use std::ops::Deref;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ParseError;

/// A scalar with a text encoding in the store.
///
/// `from_store_string(&v.to_store_string())` must give back `v` for every
/// value the type can hold, except where an impl documents otherwise.
pub trait TypedValue: Sized + Send + 'static {
    /// Short type name used in parse errors.
    const KIND: &'static str;

    /// Encode for storage. Never fails.
    fn to_store_string(&self) -> String;

    /// Decode a stored string.
    fn from_store_string(raw: &str) -> Result<Self, ParseError>;
}

/// Generate a fresh random identifier (UUID v4, hyphenated).
///
/// Used for collection element keys, where no uniqueness check against
/// existing keys is made.
pub fn generate_unique_id() -> String {
    Uuid::new_v4().to_string()
}

/// Timestamps are stored as RFC 3339 at whole-second precision.
///
/// Sub-second precision is dropped on write. Any RFC 3339 offset is
/// accepted on read and normalized to UTC.
impl TypedValue for DateTime<Utc> {
    const KIND: &'static str = "time";

    fn to_store_string(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn from_store_string(raw: &str) -> Result<Self, ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| ParseError::new(Self::KIND, raw, e))
    }
}

impl TypedValue for String {
    const KIND: &'static str = "text";

    fn to_store_string(&self) -> String {
        self.clone()
    }

    fn from_store_string(raw: &str) -> Result<Self, ParseError> {
        Ok(raw.to_string())
    }
}

impl TypedValue for i64 {
    const KIND: &'static str = "int";

    fn to_store_string(&self) -> String {
        self.to_string()
    }

    fn from_store_string(raw: &str) -> Result<Self, ParseError> {
        raw.parse().map_err(|e| ParseError::new(Self::KIND, raw, e))
    }
}

impl TypedValue for u64 {
    const KIND: &'static str = "uint";

    fn to_store_string(&self) -> String {
        self.to_string()
    }

    fn from_store_string(raw: &str) -> Result<Self, ParseError> {
        raw.parse().map_err(|e| ParseError::new(Self::KIND, raw, e))
    }
}

/// Booleans are written as `true`/`false`. Reads also accept `1`, `t`,
/// `T`, `TRUE`, `True` and `0`, `f`, `F`, `FALSE`, `False`.
impl TypedValue for bool {
    const KIND: &'static str = "bool";

    fn to_store_string(&self) -> String {
        self.to_string()
    }

    fn from_store_string(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ParseError::new(Self::KIND, raw, "invalid syntax")),
        }
    }
}

/// An opaque identifier stored verbatim.
///
/// Usually a UUID, but the content is not validated: existing data holds
/// free-form ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(id: impl Into<String>) -> Self {
        Identifier(id.into())
    }

    /// A fresh random UUID v4 identifier.
    pub fn generate() -> Self {
        Identifier(generate_unique_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier(s)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier(s.to_string())
    }
}

impl From<Uuid> for Identifier {
    fn from(u: Uuid) -> Self {
        Identifier(u.to_string())
    }
}

impl TypedValue for Identifier {
    const KIND: &'static str = "identifier";

    fn to_store_string(&self) -> String {
        self.0.clone()
    }

    fn from_store_string(raw: &str) -> Result<Self, ParseError> {
        Ok(Identifier(raw.to_string()))
    }
}

/// Raw bytes, stored as unpadded base64.
///
/// Writes use the URL-safe alphabet. Reads accept the standard alphabet
/// first and fall back to URL-safe, so both data written by older clients
/// (which decoded with the standard alphabet) and data written here decode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Blob(bytes.into())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(v: Vec<u8>) -> Self {
        Blob(v)
    }
}

impl From<&[u8]> for Blob {
    fn from(v: &[u8]) -> Self {
        Blob(v.to_vec())
    }
}

impl TypedValue for Blob {
    const KIND: &'static str = "bytes";

    fn to_store_string(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    fn from_store_string(raw: &str) -> Result<Self, ParseError> {
        STANDARD_NO_PAD
            .decode(raw)
            .or_else(|_| URL_SAFE_NO_PAD.decode(raw))
            .map(Blob)
            .map_err(|e| ParseError::new(Self::KIND, raw, e))
    }
}
