//! Operation routing for the notes GraphQL API.
//!
//! An AppSync direct Lambda resolver hands us one [`OperationDescriptor`]
//! per field resolution. [`NoteRouter`] picks the handler by field name and
//! returns either the handler's payload or `null`:
//!
//! | Field               | Handler                                  | Payload          |
//! |---------------------|------------------------------------------|------------------|
//! | `createNote`        | [`NoteHandlers::create`]                 | stored note      |
//! | `listNotes`         | [`NoteHandlers::list`]                   | all notes        |
//! | `getNoteById`       | [`NoteHandlers::get_by_id`]              | note or `null`   |
//! | `notesByCompletion` | [`NoteHandlers::list_by_completion`]     | matching notes   |
//! | `updateNote`        | [`NoteHandlers::update`]                 | echoed payload   |
//! | `deleteNote`        | [`NoteHandlers::delete`]                 | the identifier   |
//!
//! Handlers return typed results; the router is the only place a failure
//! is logged and flattened into `null`, so the caller never sees store
//! internals. Unknown field names resolve to `null` as well, without being
//! treated as failures.

mod error;
mod handlers;
mod operation;
mod router;

pub use error::{OperationError, OperationResult};
pub use handlers::NoteHandlers;
pub use operation::{Arguments, Operation, OperationDescriptor, OperationInfo};
pub use router::{NoteRouter, Outcome};
