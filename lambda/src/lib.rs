//! Lambda glue for the notes resolver: configuration, the process-wide
//! store client, and the event entry point.

mod config;

pub use config::{Args, ConfigError, NotesConfig};

use notes_api::{NoteHandlers, NoteRouter, OperationDescriptor};
use notes_store::{DynamoDbStore, StoreAdapter};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// A store client created on first use and kept for the life of the
/// process. Concurrent first callers wait on the same initialization.
#[derive(Debug)]
pub struct SharedStore<S> {
    cell: OnceCell<S>,
}

impl<S> SharedStore<S> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the client, running `connect` if none exists yet.
    pub async fn get_or_connect<F, Fut>(&self, connect: F) -> &S
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = S>,
    {
        self.cell.get_or_init(connect).await
    }

    pub fn is_connected(&self) -> bool {
        self.cell.initialized()
    }
}

impl<S> Default for SharedStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the DynamoDB adapter from the default AWS credential chain.
pub async fn connect(config: &NotesConfig) -> Arc<dyn StoreAdapter> {
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoDbStore::new(&sdk_config, config.dynamodb());
    info!(
        "Connected to DynamoDB table {} (index {})",
        store.table_name(),
        config.completion_index
    );
    Arc::new(store)
}

/// Router over `store` using the configured completion index.
pub fn router_for(store: Arc<dyn StoreAdapter>, config: &NotesConfig) -> NoteRouter {
    NoteRouter::new(NoteHandlers::new(store).with_completion_index(&config.completion_index))
}

/// Resolves one raw AppSync event. Events that don't deserialize into an
/// operation descriptor resolve to `null` like any other failure.
pub async fn resolve_event(router: &NoteRouter, event: Value) -> Value {
    match serde_json::from_value::<OperationDescriptor>(event) {
        Ok(descriptor) => router.handle(descriptor).await,
        Err(e) => {
            warn!("Unrecognized resolver event: {}", e);
            Value::Null
        }
    }
}
