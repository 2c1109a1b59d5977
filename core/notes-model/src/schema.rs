use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Partition key attribute of the notes table.
pub const KEY_ATTRIBUTE: &str = "id";

/// Default name of the global secondary index keyed on `complete`.
pub const COMPLETION_INDEX: &str = "notesByCompletion";

/// The attributes a note is allowed to carry.
///
/// Anything outside this set is rejected by [`crate::NotePatch`], so caller
/// input never reaches the store under an attribute name we don't know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteField {
    Id,
    Name,
    Complete,
}

impl NoteField {
    /// Every known field, key first.
    pub const ALL: [NoteField; 3] = [NoteField::Id, NoteField::Name, NoteField::Complete];

    /// Attribute name as stored and as seen in GraphQL.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            NoteField::Id => KEY_ATTRIBUTE,
            NoteField::Name => "name",
            NoteField::Complete => "complete",
        }
    }

    /// Looks up a field by attribute name.
    #[must_use]
    pub fn from_attribute(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.attribute() == name)
    }

    #[must_use]
    pub const fn field_type(self) -> FieldType {
        match self {
            NoteField::Id => FieldType::Id,
            NoteField::Name => FieldType::Text,
            NoteField::Complete => FieldType::Bool,
        }
    }

    /// Whether this field is the table key (and therefore immutable).
    #[must_use]
    pub const fn is_key(self) -> bool {
        matches!(self, NoteField::Id)
    }

    /// Whether a patch may set this field to `null`.
    ///
    /// The key can't change at all, and an indexed attribute can only hold
    /// a string or number, so neither accepts null.
    #[must_use]
    pub const fn is_nullable(self) -> bool {
        !self.is_key() && !self.is_indexed()
    }

    /// Whether a secondary index is keyed on this field.
    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, NoteField::Complete)
    }

    /// Converts a value to the form written to the store.
    ///
    /// Index key attributes can only be strings, numbers or binary, so an
    /// indexed boolean is stored as `"true"` / `"false"`.
    #[must_use]
    pub fn to_stored(self, value: &Value) -> Value {
        match value {
            Value::Bool(b) if self.is_indexed() => Value::String(b.to_string()),
            other => other.clone(),
        }
    }

    /// Inverse of [`NoteField::to_stored`]. Plain booleans are accepted too.
    #[must_use]
    pub fn from_stored(self, value: Value) -> Value {
        match value {
            Value::String(s) if self.is_indexed() && self.field_type() == FieldType::Bool => {
                match s.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => Value::String(s),
                }
            }
            other => other,
        }
    }
}

/// Value type of a note field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Id,
    Text,
    Bool,
}

impl FieldType {
    /// Whether a non-null JSON value is acceptable for this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::Id | FieldType::Text => value.is_string(),
            FieldType::Bool => value.is_boolean(),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Id => "ID",
            FieldType::Text => "String",
            FieldType::Bool => "Boolean",
        }
    }
}
