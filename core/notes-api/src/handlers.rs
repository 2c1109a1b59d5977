use crate::error::OperationResult;
use notes_model::{Note, NoteField, NoteId, NoteInput, NotePatch, COMPLETION_INDEX, KEY_ATTRIBUTE};
use notes_store::{IndexQuery, Item, Key, StoreAdapter, UpdateInstruction};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// The six note operations, each a thin layer over a [`StoreAdapter`].
///
/// Handlers are stateless apart from the shared store handle and can be
/// called concurrently.
#[derive(Clone)]
pub struct NoteHandlers {
    store: Arc<dyn StoreAdapter>,
    completion_index: String,
}

impl std::fmt::Debug for NoteHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteHandlers")
            .field("store", &self.store.backend_name())
            .field("completion_index", &self.completion_index)
            .finish()
    }
}

impl NoteHandlers {
    pub fn new(store: Arc<dyn StoreAdapter>) -> Self {
        Self {
            store,
            completion_index: COMPLETION_INDEX.to_string(),
        }
    }

    /// Overrides the name of the index keyed on `complete`.
    pub fn with_completion_index(mut self, index_name: impl Into<String>) -> Self {
        self.completion_index = index_name.into();
        self
    }

    pub fn completion_index(&self) -> &str {
        &self.completion_index
    }

    fn key(id: &NoteId) -> Key {
        Key::new(KEY_ATTRIBUTE, id.as_str())
    }

    /// Stores a new note, generating its identifier when the caller left it
    /// out, and returns the stored note.
    pub async fn create(&self, input: NoteInput) -> OperationResult<Note> {
        let note = input.assign_identifier_if_missing();
        self.store.put(note.to_document()?).await?;
        debug!("Created note {}", note.id);
        Ok(note)
    }

    /// `Ok(None)` when no note has this identifier.
    pub async fn get_by_id(&self, id: &NoteId) -> OperationResult<Option<Note>> {
        let item = self.store.get(&Self::key(id)).await?;
        Ok(item.map(Note::from_document).transpose()?)
    }

    /// Every note, in the store's order.
    pub async fn list(&self) -> OperationResult<Vec<Note>> {
        let items = self.store.scan().await?;
        Ok(decode_all(items))
    }

    /// Notes whose `complete` flag equals `complete`, via the completion index.
    /// The index is keyed on the flag's stored text form.
    pub async fn list_by_completion(&self, complete: bool) -> OperationResult<Vec<Note>> {
        let field = NoteField::Complete;
        let query = IndexQuery::new(
            &self.completion_index,
            field.attribute(),
            field.to_stored(&Value::Bool(complete)),
        );
        let items = self.store.query_index(&query).await?;
        Ok(decode_all(items))
    }

    /// Applies `patch` to the note and returns the patch itself as the
    /// confirmation. Attributes not in the patch are left untouched.
    pub async fn update(&self, id: &NoteId, patch: NotePatch) -> OperationResult<NotePatch> {
        let instruction = UpdateInstruction::for_fields(Self::key(id), patch.stored_attributes())?;
        debug!(
            "Updating note {} with {}",
            id,
            instruction.update_expression()
        );
        self.store.update_fields(&instruction).await?;
        Ok(patch)
    }

    /// Removes the note. Deleting an absent identifier succeeds.
    pub async fn delete(&self, id: &NoteId) -> OperationResult<NoteId> {
        self.store.delete(&Self::key(id)).await?;
        debug!("Deleted note {}", id);
        Ok(id.clone())
    }
}

/// Decodes stored items, skipping (and logging) any that aren't notes.
fn decode_all(items: Vec<Item>) -> Vec<Note> {
    items
        .into_iter()
        .filter_map(|item| match Note::from_document(item) {
            Ok(note) => Some(note),
            Err(e) => {
                warn!("Skipping malformed note item: {}", e);
                None
            }
        })
        .collect()
}
