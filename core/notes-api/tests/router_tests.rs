use notes_api::{Arguments, NoteRouter, Operation, OperationDescriptor, OperationError, Outcome};
use notes_model::{COMPLETION_INDEX, KEY_ATTRIBUTE};
use notes_store::{Key, MemoryStore, StoreAdapter};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn setup() -> (Arc<MemoryStore>, NoteRouter) {
    let store = Arc::new(MemoryStore::new(KEY_ATTRIBUTE).with_index(COMPLETION_INDEX, "complete"));
    let router = NoteRouter::from_store(store.clone());
    (store, router)
}

fn op(field: &str, args: Arguments) -> OperationDescriptor {
    OperationDescriptor::new(field, args)
}

async fn create(router: &NoteRouter, note: Value) -> Value {
    router
        .handle(op("createNote", Arguments::default().with_note(note)))
        .await
}

/// The raw stored item; the completion flag is kept as text for the index.
async fn stored(store: &MemoryStore, id: &str) -> Option<Value> {
    store
        .get(&Key::new(KEY_ATTRIBUTE, id))
        .await
        .unwrap()
        .map(Value::Object)
}

// ── Dispatch table ──────────────────────────────────────────────

#[test]
fn every_operation_has_a_distinct_field_name() {
    for op in Operation::ALL {
        assert_eq!(Operation::from_field_name(op.field_name()), Some(op));
    }
    assert_eq!(Operation::from_field_name("createnote"), None);
}

#[test]
fn mutations_are_flagged() {
    assert!(Operation::CreateNote.is_mutation());
    assert!(Operation::UpdateNote.is_mutation());
    assert!(Operation::DeleteNote.is_mutation());
    assert!(!Operation::ListNotes.is_mutation());
    assert!(!Operation::GetNoteById.is_mutation());
    assert!(!Operation::NotesByCompletion.is_mutation());
}

#[tokio::test]
async fn unknown_operation_returns_null() {
    let (store, router) = setup();
    let value = router.handle(op("dropTable", Arguments::default())).await;
    assert_eq!(value, Value::Null);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn unknown_operation_is_unsupported_not_failed() {
    let (_, router) = setup();
    let outcome = router.route(op("onCreateNote", Arguments::default())).await;
    assert!(matches!(outcome, Outcome::Unsupported(name) if name == "onCreateNote"));
}

// ── Round trip ──────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_roundtrip() {
    let (_, router) = setup();
    let created = create(&router, json!({"name": "n", "complete": false})).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let fetched = router
        .handle(op("getNoteById", Arguments::default().with_note_id(&id)))
        .await;
    assert_eq!(fetched, created);
    assert_eq!(fetched, json!({"id": id, "name": "n", "complete": false}));
}

#[tokio::test]
async fn create_keeps_supplied_id() {
    let (store, router) = setup();
    let created = create(&router, json!({"id": "a", "name": "x", "complete": true})).await;
    assert_eq!(created, json!({"id": "a", "name": "x", "complete": true}));
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": "x", "complete": "true"}))
    );
}

#[tokio::test]
async fn get_absent_note_resolves_to_null() {
    let (_, router) = setup();
    let outcome = router
        .route(op("getNoteById", Arguments::default().with_note_id("missing")))
        .await;
    assert!(outcome.is_resolved());
    assert_eq!(outcome.into_response(), Value::Null);
}

// ── Listing ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_all_notes() {
    let (_, router) = setup();
    for (id, complete) in [("a", true), ("b", false)] {
        create(&router, json!({"id": id, "name": id, "complete": complete})).await;
    }
    let listed = router.handle(op("listNotes", Arguments::default())).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let (_, router) = setup();
    let listed = router.handle(op("listNotes", Arguments::default())).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn filter_returns_exactly_matching_notes() {
    let (_, router) = setup();
    for (id, complete) in [("a", true), ("b", false), ("c", true)] {
        create(&router, json!({"id": id, "name": id, "complete": complete})).await;
    }

    let done = router
        .handle(op("notesByCompletion", Arguments::default().with_complete(json!(true))))
        .await;
    let mut ids: Vec<&str> = done
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn filter_accepts_string_flag() {
    let (_, router) = setup();
    create(&router, json!({"id": "b", "name": "b", "complete": false})).await;

    let open = router
        .handle(op("notesByCompletion", Arguments::default().with_complete(json!("false"))))
        .await;
    assert_eq!(open, json!([{"id": "b", "name": "b", "complete": false}]));
}

#[tokio::test]
async fn filter_rejects_garbage_flag() {
    let (_, router) = setup();
    let outcome = router
        .route(op("notesByCompletion", Arguments::default().with_complete(json!("maybe"))))
        .await;
    assert!(matches!(
        outcome,
        Outcome::Failed {
            operation: Operation::NotesByCompletion,
            error: OperationError::InvalidArgument { name: "complete", .. },
        }
    ));
}

// ── Update ──────────────────────────────────────────────────────

#[tokio::test]
async fn partial_update_is_field_local() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;

    let echoed = router
        .handle(op(
            "updateNote",
            Arguments::default()
                .with_note_id("a")
                .with_note(json!({"complete": true})),
        ))
        .await;

    assert_eq!(echoed, json!({"complete": true}));
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": "x", "complete": "true"}))
    );
}

#[tokio::test]
async fn update_can_set_name_to_null() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;

    let echoed = router
        .handle(op(
            "updateNote",
            Arguments::default()
                .with_note_id("a")
                .with_note(json!({"name": null})),
        ))
        .await;
    assert_eq!(echoed, json!({"name": null}));
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": null, "complete": "false"}))
    );

    let fetched = router
        .handle(op("getNoteById", Arguments::default().with_note_id("a")))
        .await;
    assert_eq!(fetched, json!({"id": "a", "name": null, "complete": false}));
}

#[tokio::test]
async fn update_setting_flag_to_null_is_rejected() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;

    let outcome = router
        .route(op(
            "updateNote",
            Arguments::default()
                .with_note_id("a")
                .with_note(json!({"complete": null})),
        ))
        .await;
    assert!(matches!(outcome, Outcome::Failed { error: OperationError::InvalidPatch(_), .. }));
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": "x", "complete": "false"}))
    );
}

#[tokio::test]
async fn update_moves_note_between_filter_results() {
    let (_, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;
    router
        .handle(op(
            "updateNote",
            Arguments::default()
                .with_note_id("a")
                .with_note(json!({"complete": true})),
        ))
        .await;

    let open = router
        .handle(op("notesByCompletion", Arguments::default().with_complete(json!(false))))
        .await;
    assert_eq!(open, json!([]));
}

#[tokio::test]
async fn update_with_identifier_is_rejected() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;

    let value = router
        .handle(op(
            "updateNote",
            Arguments::default()
                .with_note_id("a")
                .with_note(json!({"id": "b", "name": "y"})),
        ))
        .await;

    assert_eq!(value, Value::Null);
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": "x", "complete": "false"}))
    );
    assert_eq!(stored(&store, "b").await, None);
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;

    let value = router
        .handle(op(
            "updateNote",
            Arguments::default().with_note_id("a").with_note(json!({})),
        ))
        .await;

    assert_eq!(value, Value::Null);
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": "x", "complete": "false"}))
    );
}

#[tokio::test]
async fn update_with_unknown_field_is_rejected() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;

    let outcome = router
        .route(op(
            "updateNote",
            Arguments::default()
                .with_note_id("a")
                .with_note(json!({"owner": "mallory"})),
        ))
        .await;

    assert!(matches!(outcome, Outcome::Failed { error: OperationError::InvalidPatch(_), .. }));
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": "x", "complete": "false"}))
    );
}

#[tokio::test]
async fn update_of_missing_note_returns_null() {
    let (store, router) = setup();
    let outcome = router
        .route(op(
            "updateNote",
            Arguments::default()
                .with_note_id("ghost")
                .with_note(json!({"name": "x"})),
        ))
        .await;
    assert!(matches!(outcome, Outcome::Failed { error: OperationError::Store(_), .. }));
    assert!(store.is_empty().await);
}

// ── Delete ──────────────────────────────────────────────────────

#[tokio::test]
async fn delete_is_idempotent() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;

    for _ in 0..2 {
        let value = router
            .handle(op("deleteNote", Arguments::default().with_note_id("a")))
            .await;
        assert_eq!(value, json!("a"));
    }
    assert!(store.is_empty().await);
}

// ── Arguments ───────────────────────────────────────────────────

#[tokio::test]
async fn missing_note_id_fails() {
    let (_, router) = setup();
    for field in ["getNoteById", "updateNote", "deleteNote"] {
        let outcome = router.route(op(field, Arguments::default())).await;
        assert!(
            matches!(outcome, Outcome::Failed { error: OperationError::MissingArgument("noteId"), .. }),
            "{field}"
        );
    }
}

#[tokio::test]
async fn empty_note_id_fails() {
    let (_, router) = setup();
    let outcome = router
        .route(op("deleteNote", Arguments::default().with_note_id("")))
        .await;
    assert!(matches!(
        outcome,
        Outcome::Failed { error: OperationError::InvalidArgument { name: "noteId", .. }, .. }
    ));
}

#[tokio::test]
async fn create_with_malformed_note_returns_null() {
    let (store, router) = setup();
    let value = create(&router, json!({"name": 5})).await;
    assert_eq!(value, Value::Null);
    assert!(store.is_empty().await);
}

// ── Store failures ──────────────────────────────────────────────

#[tokio::test]
async fn store_failure_yields_null_for_every_operation() {
    let (store, router) = setup();
    create(&router, json!({"id": "a", "name": "x", "complete": false})).await;
    store.set_unavailable(true);

    let requests = [
        op("createNote", Arguments::default().with_note(json!({"name": "n", "complete": true}))),
        op("listNotes", Arguments::default()),
        op("getNoteById", Arguments::default().with_note_id("a")),
        op("notesByCompletion", Arguments::default().with_complete(json!(true))),
        op(
            "updateNote",
            Arguments::default().with_note_id("a").with_note(json!({"name": "y"})),
        ),
        op("deleteNote", Arguments::default().with_note_id("a")),
    ];

    for request in requests {
        let field = request.info.field_name.clone();
        let outcome = router.route(request).await;
        assert!(
            matches!(outcome, Outcome::Failed { error: OperationError::Store(_), .. }),
            "{field}"
        );
        assert_eq!(outcome.into_response(), Value::Null);
    }

    store.set_unavailable(false);
    assert_eq!(
        stored(&store, "a").await,
        Some(json!({"id": "a", "name": "x", "complete": "false"}))
    );
}
