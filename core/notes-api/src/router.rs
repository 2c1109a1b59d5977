use crate::error::{OperationError, OperationResult};
use crate::handlers::NoteHandlers;
use crate::operation::{Arguments, Operation, OperationDescriptor};
use notes_store::StoreAdapter;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What routing one descriptor produced.
#[derive(Debug)]
pub enum Outcome {
    /// The handler succeeded; the value is the GraphQL payload (which may
    /// itself be `null`, e.g. `getNoteById` on an absent note).
    Resolved(Value),
    /// The handler failed.
    Failed {
        operation: Operation,
        error: OperationError,
    },
    /// The field name is not one the router serves.
    Unsupported(String),
}

impl Outcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved(_))
    }

    /// The value returned to AppSync: the payload, or `null` otherwise.
    pub fn into_response(self) -> Value {
        match self {
            Outcome::Resolved(value) => value,
            Outcome::Failed { .. } | Outcome::Unsupported(_) => Value::Null,
        }
    }
}

/// Dispatches operation descriptors to [`NoteHandlers`].
#[derive(Debug, Clone)]
pub struct NoteRouter {
    handlers: NoteHandlers,
}

impl NoteRouter {
    pub fn new(handlers: NoteHandlers) -> Self {
        Self { handlers }
    }

    /// Router over `store` with default handler settings.
    pub fn from_store(store: Arc<dyn StoreAdapter>) -> Self {
        Self::new(NoteHandlers::new(store))
    }

    pub fn handlers(&self) -> &NoteHandlers {
        &self.handlers
    }

    /// Resolves one descriptor to a typed outcome. Never panics and never
    /// returns an error; failures are carried in [`Outcome::Failed`].
    pub async fn route(&self, descriptor: OperationDescriptor) -> Outcome {
        let field_name = descriptor.info.field_name;
        let Some(operation) = Operation::from_field_name(&field_name) else {
            return Outcome::Unsupported(field_name);
        };

        match self.dispatch(operation, &descriptor.arguments).await {
            Ok(value) => Outcome::Resolved(value),
            Err(error) => Outcome::Failed { operation, error },
        }
    }

    /// Resolves one descriptor to the value AppSync receives, logging
    /// failures and unknown operations on the way.
    pub async fn handle(&self, descriptor: OperationDescriptor) -> Value {
        let outcome = self.route(descriptor).await;
        match &outcome {
            Outcome::Resolved(_) => {}
            Outcome::Failed { operation, error } if error.is_invalid_input() => {
                info!("{} rejected: {}", operation, error);
            }
            Outcome::Failed { operation, error } => {
                warn!("{} failed: {}", operation, error);
            }
            Outcome::Unsupported(name) => {
                debug!("No handler for field `{}`, returning null", name);
            }
        }
        outcome.into_response()
    }

    async fn dispatch(&self, operation: Operation, args: &Arguments) -> OperationResult<Value> {
        let h = &self.handlers;
        let value = match operation {
            Operation::CreateNote => serde_json::to_value(h.create(args.note_input()?).await?)?,
            Operation::ListNotes => serde_json::to_value(h.list().await?)?,
            Operation::GetNoteById => serde_json::to_value(h.get_by_id(&args.note_id()?).await?)?,
            Operation::NotesByCompletion => {
                serde_json::to_value(h.list_by_completion(args.completion()?).await?)?
            }
            Operation::UpdateNote => {
                let id = args.note_id()?;
                let patch = args.note_patch()?;
                h.update(&id, patch).await?.to_value()
            }
            Operation::DeleteNote => serde_json::to_value(h.delete(&args.note_id()?).await?)?,
        };
        Ok(value)
    }
}
