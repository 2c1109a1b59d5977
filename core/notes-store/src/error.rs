//! Error types for the store layer.

use crate::expression::InvalidUpdate;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Callers above the adapter only distinguish success from failure; the
/// variants exist for logging.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the call (network, throttling, auth).
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// A conditional write found the item in an unexpected state.
    #[error("conditional check failed for key `{0}`")]
    ConditionFailed(String),

    /// An item was written without its key attribute.
    #[error("item is missing key attribute `{0}`")]
    MissingKey(String),

    /// Query against an index the store doesn't have.
    #[error("unknown index: {0}")]
    UnknownIndex(String),

    /// A value of a type that can't key a secondary index (only strings and
    /// numbers can) was written to or queried on an indexed attribute.
    #[error("index `{index}` is keyed on `{attribute}`, which can't hold a {actual}")]
    IndexKeyType {
        index: String,
        attribute: String,
        actual: &'static str,
    },

    /// The update instruction didn't resolve cleanly.
    #[error("invalid update instruction: {0}")]
    InvalidInstruction(#[from] InvalidUpdate),

    /// A stored value couldn't be converted to JSON.
    #[error("decode error: {0}")]
    Decode(String),

    /// The store is not reachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
