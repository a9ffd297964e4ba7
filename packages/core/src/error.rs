//! Error types for the mapping layer.

use pathbind_kv_store::KvError;
use thiserror::Error;

/// A string could not be decoded as the expected scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {input:?} as {kind}: {message}")]
pub struct ParseError {
    /// Name of the target scalar type.
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub message: String,
}

impl ParseError {
    pub fn new(kind: &'static str, input: &str, message: impl ToString) -> Self {
        Self {
            kind,
            input: input.to_string(),
            message: message.to_string(),
        }
    }
}

/// Errors returned by `Mapper::get` and `Mapper::set`.
///
/// Every error is terminal for the call; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The record declaration is malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A template references a variable that was not supplied.
    #[error("pathvar :{name} not populated in template {template:?}")]
    MissingVariable { name: String, template: String },

    /// A template references a variable that is not allowed where it appears.
    #[error("invalid context for template {template:?}: {message}")]
    InvalidContext { template: String, message: String },

    /// A scalar failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A response could not be applied to the field it belongs to.
    #[error("invalid data for field at {key:?}: {message}")]
    FieldDecode { key: String, message: String },

    /// Collections of records cannot be written in one call.
    #[error("cannot set a collection of records at {key:?}; records must be set individually")]
    UnsupportedElementKind { key: String },

    /// A collection's elements are not typed scalars.
    #[error("collection at {key:?} must hold typed values")]
    InvalidCollectionElement { key: String },

    /// The store rejected or failed the transaction.
    #[error("transaction failed: {0}")]
    Transaction(#[from] KvError),

    /// The store returned a different number of responses than operations.
    #[error("unexpected number of responses: expected {expected}, got {actual}")]
    ResponseCountMismatch { expected: usize, actual: usize },
}

impl Error {
    pub(crate) fn field_decode(key: &str, message: impl ToString) -> Self {
        Error::FieldDecode {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, Error>;
