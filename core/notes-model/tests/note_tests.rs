use notes_model::{Note, NoteField, NoteInput, COMPLETION_INDEX, KEY_ATTRIBUTE};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

// ── NoteInput::assign_identifier_if_missing ──────────────────────

#[test]
fn missing_id_is_generated() {
    let input: NoteInput = serde_json::from_value(json!({"name": "n", "complete": false})).unwrap();
    assert!(input.id.is_none());

    let note = input.assign_identifier_if_missing();
    assert!(!note.id.is_empty());
    assert_eq!(note.name.as_deref(), Some("n"));
    assert!(!note.complete);
}

#[test]
fn empty_id_is_treated_as_missing() {
    let input: NoteInput =
        serde_json::from_value(json!({"id": "", "name": "n", "complete": true})).unwrap();
    let note = input.assign_identifier_if_missing();
    assert!(!note.id.is_empty());
    assert_eq!(note.id.as_str().len(), 32);
}

#[test]
fn supplied_id_passes_through() {
    let input: NoteInput =
        serde_json::from_value(json!({"id": "a", "name": "x", "complete": false})).unwrap();
    let note = input.assign_identifier_if_missing();
    assert_eq!(note, Note::new("a", "x", false));
}

#[test]
fn input_without_name_is_rejected() {
    let result: Result<NoteInput, _> = serde_json::from_value(json!({"complete": false}));
    assert!(result.is_err());
}

// ── Document conversion ──────────────────────────────────────────

#[test]
fn to_document_has_one_attribute_per_field() {
    let doc = Note::new("a", "x", false).to_document().unwrap();
    assert_eq!(doc.len(), 3);
    assert_eq!(doc["id"], json!("a"));
    assert_eq!(doc["name"], json!("x"));
    assert_eq!(doc["complete"], json!("false"));
}

#[test]
fn document_roundtrip() {
    let note = Note::new("a", "x", true);
    let back = Note::from_document(note.to_document().unwrap()).unwrap();
    assert_eq!(back, note);
}

#[test]
fn null_name_survives_roundtrip() {
    let doc = json!({"id": "a", "name": null, "complete": "false"});
    let Value::Object(map) = doc else {
        unreachable!()
    };
    let note = Note::from_document(map).unwrap();
    assert_eq!(note.name, None);

    let back = note.to_document().unwrap();
    assert_eq!(back["name"], Value::Null);
}

#[test]
fn from_document_accepts_plain_boolean_flag() {
    let doc = json!({"id": "a", "name": "x", "complete": true});
    let Value::Object(map) = doc else {
        unreachable!()
    };
    assert_eq!(Note::from_document(map).unwrap(), Note::new("a", "x", true));
}

#[test]
fn from_document_rejects_unknown_flag_text() {
    let doc = json!({"id": "a", "name": "x", "complete": "yes"});
    let Value::Object(map) = doc else {
        unreachable!()
    };
    assert!(Note::from_document(map).is_err());
}

#[test]
fn from_document_ignores_extra_attributes() {
    let doc = json!({"id": "a", "name": "x", "complete": "false", "owner": "u1"});
    let Value::Object(map) = doc else {
        unreachable!()
    };
    assert_eq!(Note::from_document(map).unwrap(), Note::new("a", "x", false));
}

// ── NoteField ────────────────────────────────────────────────────

#[test]
fn key_field_is_id() {
    assert_eq!(NoteField::Id.attribute(), KEY_ATTRIBUTE);
    assert!(NoteField::Id.is_key());
    assert!(!NoteField::Name.is_key());
    assert!(!NoteField::Complete.is_key());
}

#[test]
fn from_attribute_finds_every_field() {
    for field in NoteField::ALL {
        assert_eq!(NoteField::from_attribute(field.attribute()), Some(field));
    }
    assert_eq!(NoteField::from_attribute("owner"), None);
    assert_eq!(NoteField::from_attribute("Name"), None);
}

#[test]
fn only_name_is_nullable() {
    assert!(!NoteField::Id.is_nullable());
    assert!(NoteField::Name.is_nullable());
    assert!(!NoteField::Complete.is_nullable());
}

#[test]
fn indexed_flag_is_stored_as_text() {
    assert!(NoteField::Complete.is_indexed());
    assert_eq!(NoteField::Complete.to_stored(&json!(true)), json!("true"));
    assert_eq!(NoteField::Complete.from_stored(json!("false")), json!(false));
    assert_eq!(NoteField::Name.to_stored(&json!("true")), json!("true"));
    assert_eq!(NoteField::Name.from_stored(json!("true")), json!("true"));
}

#[test]
fn completion_index_name() {
    assert_eq!(COMPLETION_INDEX, "notesByCompletion");
}
