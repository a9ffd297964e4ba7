//! Operations and their responses.

use std::fmt;

use bytes::Bytes;

/// A single operation in a transaction batch.
///
/// Prefix variants address every key that starts with the given string.
/// No separator handling happens here: the caller decides whether the
/// prefix ends with `/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    /// Read one key.
    Get(String),
    /// Read every key under a prefix.
    GetPrefix(String),
    /// Write a value at a key.
    Put { key: String, value: String },
    /// Remove one key.
    Delete(String),
    /// Remove every key under a prefix.
    DeletePrefix(String),
}

impl Op {
    pub fn get(key: impl Into<String>) -> Self {
        Op::Get(key.into())
    }

    pub fn get_prefix(prefix: impl Into<String>) -> Self {
        Op::GetPrefix(prefix.into())
    }

    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        Op::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Op::Delete(key.into())
    }

    pub fn delete_prefix(prefix: impl Into<String>) -> Self {
        Op::DeletePrefix(prefix.into())
    }

    /// The key or prefix this operation targets.
    pub fn key(&self) -> &str {
        match self {
            Op::Get(key)
            | Op::GetPrefix(key)
            | Op::Delete(key)
            | Op::DeletePrefix(key)
            | Op::Put { key, .. } => key,
        }
    }

    /// Check if this operation addresses a key prefix.
    pub fn is_prefix(&self) -> bool {
        matches!(self, Op::GetPrefix(_) | Op::DeletePrefix(_))
    }

    /// Check if this operation is a read.
    pub fn is_read(&self) -> bool {
        matches!(self, Op::Get(_) | Op::GetPrefix(_))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Get(key) => write!(f, "GET {}", key),
            Op::GetPrefix(prefix) => write!(f, "GET {}*", prefix),
            Op::Put { key, .. } => write!(f, "PUT {}", key),
            Op::Delete(key) => write!(f, "DELETE {}", key),
            Op::DeletePrefix(prefix) => write!(f, "DELETE {}*", prefix),
        }
    }
}

/// A key and the raw bytes stored under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Bytes,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The value as UTF-8, if it is valid UTF-8.
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }
}

/// The result of one `Op`.
///
/// A transaction returns exactly one response per operation, in the same
/// order the operations were submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpResponse {
    /// Result of `Get` or `GetPrefix`: zero or more entries in key order.
    Range { kvs: Vec<KeyValue> },
    /// Result of `Put`.
    Put,
    /// Result of `Delete` or `DeletePrefix`.
    Delete { deleted: u64 },
}

impl OpResponse {
    /// Entries of a range response. Empty for any other response.
    pub fn kvs(&self) -> &[KeyValue] {
        match self {
            OpResponse::Range { kvs } => kvs,
            _ => &[],
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, OpResponse::Range { .. })
    }
}
