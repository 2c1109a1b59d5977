//! Handler error types.

use notes_model::PatchError;
use notes_store::{InvalidUpdate, StoreError};
use thiserror::Error;

/// Result type for handler operations.
pub type OperationResult<T> = Result<T, OperationError>;

/// Why a handler could not produce a payload.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The store call failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The update payload failed allow-list validation.
    #[error("invalid update payload: {0}")]
    InvalidPatch(#[from] PatchError),

    /// The update instruction could not be built.
    #[error("invalid update instruction: {0}")]
    InvalidUpdate(#[from] InvalidUpdate),

    /// A required argument was absent.
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),

    /// An argument was present but unusable.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A note could not be converted to or from its stored form.
    #[error("model error: {0}")]
    Model(#[from] notes_model::Error),

    /// The payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OperationError {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the store.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPatch(_)
                | Self::InvalidUpdate(_)
                | Self::MissingArgument(_)
                | Self::InvalidArgument { .. }
        )
    }
}
