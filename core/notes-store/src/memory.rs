//! In-process store adapter.
//!
//! Behaves like a single DynamoDB table with optional global secondary
//! indexes: items are keyed by one string attribute, indexes are sparse
//! (items lacking the indexed attribute are not in the index) and updates
//! are applied by resolving the instruction's placeholders, so a malformed
//! instruction fails here exactly where it would corrupt a real table.
//!
//! Index key values must be strings or numbers. Writes carrying any other
//! type in an indexed attribute, and queries for such a value, fail with
//! [`StoreError::IndexKeyType`], which is what DynamoDB does for a GSI key.

use crate::adapter::{IndexQuery, Item, Key, StoreAdapter};
use crate::error::{StoreError, StoreResult};
use crate::expression::UpdateInstruction;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// A secondary index: name and the attribute it is keyed on.
#[derive(Debug, Clone)]
struct IndexDef {
    name: String,
    attribute: String,
}

#[derive(Debug, Default)]
struct Table {
    items: BTreeMap<String, Item>,
    /// index name → encoded attribute value → primary keys.
    indexes: HashMap<String, HashMap<String, BTreeSet<String>>>,
}

/// Thread-safe in-memory table.
#[derive(Debug)]
pub struct MemoryStore {
    key_attribute: String,
    index_defs: Vec<IndexDef>,
    table: RwLock<Table>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty table keyed on `key_attribute`.
    pub fn new(key_attribute: impl Into<String>) -> Self {
        Self {
            key_attribute: key_attribute.into(),
            index_defs: Vec::new(),
            table: RwLock::new(Table::default()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Registers a secondary index. Call before inserting items.
    pub fn with_index(mut self, name: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.index_defs.push(IndexDef {
            name: name.into(),
            attribute: attribute.into(),
        });
        self
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`]
    /// (or succeed again when `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.table.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.items.is_empty()
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }

    fn primary_key(&self, item: &Item) -> StoreResult<String> {
        match item.get(&self.key_attribute) {
            Some(Value::String(pk)) => Ok(pk.clone()),
            _ => Err(StoreError::MissingKey(self.key_attribute.clone())),
        }
    }

    /// Rejects items whose indexed attributes can't be index keys.
    fn check_index_keys(&self, item: &Item) -> StoreResult<()> {
        for def in &self.index_defs {
            if let Some(value) = item.get(&def.attribute) {
                check_index_key(&def.name, &def.attribute, value)?;
            }
        }
        Ok(())
    }

    fn unindex(&self, table: &mut Table, pk: &str, item: &Item) {
        for def in &self.index_defs {
            let Some(value) = item.get(&def.attribute) else {
                continue;
            };
            if let Some(entries) = table.indexes.get_mut(&def.name) {
                let encoded = encode_index_value(value);
                if let Some(keys) = entries.get_mut(&encoded) {
                    keys.remove(pk);
                    if keys.is_empty() {
                        entries.remove(&encoded);
                    }
                }
            }
        }
    }

    fn index(&self, table: &mut Table, pk: &str, item: &Item) {
        for def in &self.index_defs {
            let Some(value) = item.get(&def.attribute) else {
                continue;
            };
            table
                .indexes
                .entry(def.name.clone())
                .or_default()
                .entry(encode_index_value(value))
                .or_default()
                .insert(pk.to_string());
        }
    }

    /// Replaces (or inserts) the item at `pk`, keeping indexes in step.
    fn store_item(&self, table: &mut Table, pk: String, item: Item) {
        if let Some(old) = table.items.remove(&pk) {
            self.unindex(table, &pk, &old);
        }
        self.index(table, &pk, &item);
        table.items.insert(pk, item);
    }
}

fn check_index_key(index: &str, attribute: &str, value: &Value) -> StoreResult<()> {
    match value {
        Value::String(_) | Value::Number(_) => Ok(()),
        other => Err(StoreError::IndexKeyType {
            index: index.to_string(),
            attribute: attribute.to_string(),
            actual: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Index entries are keyed by the value's JSON text, so `1` and `"1"` stay
/// distinct as they would in a typed index.
fn encode_index_value(value: &Value) -> String {
    value.to_string()
}

#[async_trait]
impl StoreAdapter for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &Key) -> StoreResult<Option<Item>> {
        self.ensure_available()?;
        Ok(self.table.read().await.items.get(key.value()).cloned())
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        self.ensure_available()?;
        let pk = self.primary_key(&item)?;
        self.check_index_keys(&item)?;
        let mut table = self.table.write().await;
        self.store_item(&mut table, pk, item);
        Ok(())
    }

    async fn delete(&self, key: &Key) -> StoreResult<()> {
        self.ensure_available()?;
        let mut table = self.table.write().await;
        if let Some(old) = table.items.remove(key.value()) {
            self.unindex(&mut table, key.value(), &old);
        } else {
            debug!("delete of absent key {}", key);
        }
        Ok(())
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        self.ensure_available()?;
        Ok(self.table.read().await.items.values().cloned().collect())
    }

    async fn query_index(&self, query: &IndexQuery) -> StoreResult<Vec<Item>> {
        self.ensure_available()?;
        let def = self
            .index_defs
            .iter()
            .find(|d| d.name == query.index_name)
            .ok_or_else(|| StoreError::UnknownIndex(query.index_name.clone()))?;
        if def.attribute != query.attribute {
            return Err(StoreError::UnknownIndex(format!(
                "{} is keyed on `{}`, not `{}`",
                def.name, def.attribute, query.attribute
            )));
        }
        check_index_key(&def.name, &def.attribute, &query.value)?;

        let table = self.table.read().await;
        let keys = table
            .indexes
            .get(&def.name)
            .and_then(|entries| entries.get(&encode_index_value(&query.value)));
        Ok(keys
            .into_iter()
            .flatten()
            .filter_map(|pk| table.items.get(pk).cloned())
            .collect())
    }

    async fn update_fields(&self, instruction: &UpdateInstruction) -> StoreResult<()> {
        self.ensure_available()?;
        let resolved = instruction.resolve()?;
        let key = instruction.key();

        let mut table = self.table.write().await;
        let existing = table.items.get(key.value()).cloned();

        if let Some(attribute) = resolved.requires_existing {
            let present = existing
                .as_ref()
                .is_some_and(|item| item.contains_key(attribute));
            if !present {
                return Err(StoreError::ConditionFailed(key.to_string()));
            }
        }

        let mut item = existing.unwrap_or_else(|| {
            let mut fresh = Item::new();
            fresh.insert(
                key.attribute().to_string(),
                Value::String(key.value().to_string()),
            );
            fresh
        });
        for (attribute, value) in resolved.assignments {
            item.insert(attribute.to_string(), value.clone());
        }
        self.check_index_keys(&item)?;

        self.store_item(&mut table, key.value().to_string(), item);
        Ok(())
    }
}
