//! Error types for the key-value layer.
//!
//! Errors here are store-level only. Anything about paths, records or value
//! encodings belongs to the mapping layer above.

use bytes::Bytes;
use thiserror::Error;

/// Errors raised while submitting a transaction.
#[derive(Debug, Error)]
pub enum KvError {
    /// Generic I/O or transport failure.
    ///
    /// Use this for network errors, lost connections, IPC failures, etc.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The batch holds more operations than the store accepts in one
    /// transaction.
    #[error("too many operations in transaction: {actual} (limit {limit})")]
    TooManyOperations { limit: usize, actual: usize },

    /// The store could not agree on the batch and applied none of it.
    #[error("transaction aborted: {message}")]
    Aborted { message: String },

    /// Store state was poisoned by a panic in another caller.
    #[error("store lock poisoned")]
    Poisoned,

    /// Protocol-specific error with a numeric code.
    ///
    /// The code and detail are opaque here; the remote protocol defines
    /// their meaning.
    #[error("protocol error: code {code}{}", format_detail(.detail))]
    Protocol {
        /// Protocol-specific error code.
        code: u32,
        /// Optional detail bytes (error message, structured error, etc.)
        detail: Bytes,
    },
}

fn format_detail(detail: &Bytes) -> String {
    if detail.is_empty() {
        return String::new();
    }
    match std::str::from_utf8(detail) {
        Ok(s) => format!(" - {}", s),
        Err(_) => format!(" - {:?}", detail),
    }
}

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::Transport(Box::new(e))
    }
}
