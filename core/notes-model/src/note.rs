use crate::{Error, NoteField, NoteId, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored record as the store sees it: attribute name → JSON value.
pub type Document = Map<String, Value>;

/// A note as persisted in the notes table.
///
/// `name` is `None` once an update has set it to null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub name: Option<String>,
    pub complete: bool,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, name: impl Into<String>, complete: bool) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            complete,
        }
    }

    /// Converts the note into a store document, each field in its stored
    /// form (see [`NoteField::to_stored`]).
    pub fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            Value::Object(mut map) => {
                for field in NoteField::ALL {
                    if let Some(value) = map.get_mut(field.attribute()) {
                        *value = field.to_stored(value);
                    }
                }
                Ok(map)
            }
            other => Err(Error::NotADocument(json_kind(&other))),
        }
    }

    /// Reads a note back from a store document.
    pub fn from_document(mut document: Document) -> Result<Self> {
        for field in NoteField::ALL {
            if let Some(value) = document.remove(field.attribute()) {
                document.insert(field.attribute().to_string(), field.from_stored(value));
            }
        }
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}

/// The `note` argument of `createNote`.
///
/// Same shape as [`Note`] except the identifier may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    pub name: String,
    pub complete: bool,
}

impl NoteInput {
    /// Fills in a generated identifier when the caller left it unset or empty.
    #[must_use]
    pub fn assign_identifier_if_missing(self) -> Note {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => NoteId::generate(),
        };
        Note {
            id,
            name: Some(self.name),
            complete: self.complete,
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
