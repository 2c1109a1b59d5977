//! Partial update payloads.

use crate::note::json_kind;
use crate::NoteField;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Reasons a partial update payload is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("update payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("update payload is empty")]
    Empty,

    #[error("the identifier field `{0}` is immutable")]
    IdentifierImmutable(&'static str),

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{field}` expects {expected}, got {actual}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field `{0}` cannot be set to null")]
    NullNotAllowed(&'static str),
}

/// A validated subset of a note's fields with their new values.
///
/// Guarantees: non-empty, never contains the key, only allow-listed fields,
/// each value matching its field's declared type or `null` where the field
/// is nullable. A `null` means "set to null", not "remove". Fields are kept in a
/// stable order so the expression built from a patch is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePatch {
    fields: BTreeMap<NoteField, Value>,
}

impl NotePatch {
    /// Validates a caller-supplied field map against the note allow-list.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, PatchError> {
        if map.is_empty() {
            return Err(PatchError::Empty);
        }

        let mut fields = BTreeMap::new();
        for (name, value) in map {
            let field =
                NoteField::from_attribute(&name).ok_or(PatchError::UnknownField(name))?;
            if field.is_key() {
                return Err(PatchError::IdentifierImmutable(field.attribute()));
            }
            if value.is_null() {
                if !field.is_nullable() {
                    return Err(PatchError::NullNotAllowed(field.attribute()));
                }
            } else if !field.field_type().accepts(&value) {
                return Err(PatchError::TypeMismatch {
                    field: field.attribute(),
                    expected: field.field_type().name(),
                    actual: json_kind(&value),
                });
            }
            fields.insert(field, value);
        }

        Ok(Self { fields })
    }

    /// Validates an arbitrary JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self, PatchError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(PatchError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed patch; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: NoteField) -> Option<&Value> {
        self.fields.get(&field)
    }

    /// Attribute name / new value pairs in field order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.fields.iter().map(|(f, v)| (f.attribute(), v))
    }

    /// Attribute name / value pairs in the form written to the store.
    pub fn stored_attributes(&self) -> impl Iterator<Item = (&'static str, Value)> + '_ {
        self.fields
            .iter()
            .map(|(f, v)| (f.attribute(), f.to_stored(v)))
    }

    /// The payload as the caller sent it, used as the update confirmation.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.attributes()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }
}

impl TryFrom<Value> for NotePatch {
    type Error = PatchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
