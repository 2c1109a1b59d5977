//! Entity model for the notes resolver.
//!
//! Defines the types every other crate in the workspace agrees on:
//! - [`Note`]: the stored record (identifier, name, completion flag)
//! - [`NoteInput`]: a note as submitted to `createNote`, identifier optional
//! - [`NoteId`]: the record identifier and its random generator
//! - [`NoteField`]: the allow-list of known attributes and their types
//! - [`NotePatch`]: a validated partial update payload
//!
//! Records travel to and from the store as plain JSON documents
//! ([`Document`]); this crate owns the conversion in both directions.

mod ids;
mod note;
mod patch;
mod schema;

pub use ids::NoteId;
pub use note::{Document, Note, NoteInput};
pub use patch::{NotePatch, PatchError};
pub use schema::{FieldType, NoteField, COMPLETION_INDEX, KEY_ATTRIBUTE};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while converting notes to and from store documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotADocument(&'static str),
}
