//! Inbound operation descriptors.
//!
//! Mirrors the event AppSync sends to a direct Lambda resolver. Only the
//! fields the router needs are typed; everything else in the event is
//! ignored on deserialization.

use crate::error::{OperationError, OperationResult};
use notes_model::{NoteId, NoteInput, NotePatch};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The fixed set of operations the router serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateNote,
    ListNotes,
    GetNoteById,
    NotesByCompletion,
    UpdateNote,
    DeleteNote,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::CreateNote,
        Operation::ListNotes,
        Operation::GetNoteById,
        Operation::NotesByCompletion,
        Operation::UpdateNote,
        Operation::DeleteNote,
    ];

    /// GraphQL field name.
    pub const fn field_name(self) -> &'static str {
        match self {
            Operation::CreateNote => "createNote",
            Operation::ListNotes => "listNotes",
            Operation::GetNoteById => "getNoteById",
            Operation::NotesByCompletion => "notesByCompletion",
            Operation::UpdateNote => "updateNote",
            Operation::DeleteNote => "deleteNote",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.field_name() == name)
    }

    /// Whether the operation writes to the store.
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Operation::CreateNote | Operation::UpdateNote | Operation::DeleteNote
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// One field resolution request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub info: OperationInfo,
    #[serde(default)]
    pub arguments: Arguments,
    /// Caller identity as resolved by AppSync. Opaque to the router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Value>,
}

impl OperationDescriptor {
    /// Descriptor for `field_name` with the given arguments.
    pub fn new(field_name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            info: OperationInfo {
                field_name: field_name.into(),
                parent_type_name: None,
            },
            arguments,
            identity: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type_name: Option<String>,
}

/// Field arguments. Which ones are required depends on the operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arguments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
    /// Completion filter. The schema declares it as a string, so both
    /// `true` and `"true"` are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<Value>,
    /// Full note for `createNote`, partial note for `updateNote`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<Value>,
}

impl Arguments {
    pub fn with_note_id(mut self, id: impl Into<String>) -> Self {
        self.note_id = Some(id.into());
        self
    }

    pub fn with_note(mut self, note: Value) -> Self {
        self.note = Some(note);
        self
    }

    pub fn with_complete(mut self, complete: Value) -> Self {
        self.complete = Some(complete);
        self
    }

    pub(crate) fn note_id(&self) -> OperationResult<NoteId> {
        match self.note_id.as_deref() {
            None => Err(OperationError::MissingArgument("noteId")),
            Some("") => Err(OperationError::invalid_argument("noteId", "must not be empty")),
            Some(id) => Ok(NoteId::new(id)),
        }
    }

    pub(crate) fn note_input(&self) -> OperationResult<NoteInput> {
        let note = self
            .note
            .clone()
            .ok_or(OperationError::MissingArgument("note"))?;
        serde_json::from_value(note)
            .map_err(|e| OperationError::invalid_argument("note", e.to_string()))
    }

    pub(crate) fn note_patch(&self) -> OperationResult<NotePatch> {
        let note = self
            .note
            .clone()
            .ok_or(OperationError::MissingArgument("note"))?;
        Ok(NotePatch::from_value(note)?)
    }

    pub(crate) fn completion(&self) -> OperationResult<bool> {
        match &self.complete {
            None => Err(OperationError::MissingArgument("complete")),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(OperationError::invalid_argument(
                    "complete",
                    format!("expected true or false, got `{other}`"),
                )),
            },
            Some(other) => Err(OperationError::invalid_argument(
                "complete",
                format!("expected a boolean, got {other}"),
            )),
        }
    }
}
