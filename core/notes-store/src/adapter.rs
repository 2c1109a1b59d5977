//! Store adapter abstraction trait.
//!
//! Defines the common interface every document store backend implements.

use crate::error::StoreResult;
use crate::expression::UpdateInstruction;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// A stored item: attribute name → JSON value.
pub type Item = Map<String, Value>;

/// Primary key of an item: the partition key attribute and its string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    attribute: String,
    value: String,
}

impl Key {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attribute, self.value)
    }
}

/// Equality lookup against a secondary index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    /// Name of the index (e.g. the GSI name).
    pub index_name: String,
    /// Attribute the index is keyed on.
    pub attribute: String,
    /// Value the attribute must equal.
    pub value: Value,
}

impl IndexQuery {
    pub fn new(index_name: impl Into<String>, attribute: impl Into<String>, value: Value) -> Self {
        Self {
            index_name: index_name.into(),
            attribute: attribute.into(),
            value,
        }
    }
}

/// Abstract document store interface.
///
/// Every call is a single request against the backend; there is no
/// cross-call state and no transaction spanning calls.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Returns the name of the backend, for logs.
    fn backend_name(&self) -> &'static str;

    /// Fetches one item. `Ok(None)` when the key is absent.
    async fn get(&self, key: &Key) -> StoreResult<Option<Item>>;

    /// Writes a whole item, replacing any existing item with the same key.
    async fn put(&self, item: Item) -> StoreResult<()>;

    /// Removes an item. Removing an absent key succeeds.
    async fn delete(&self, key: &Key) -> StoreResult<()>;

    /// Returns every item, in the store's natural order.
    async fn scan(&self) -> StoreResult<Vec<Item>>;

    /// Returns every item whose indexed attribute equals the query value.
    async fn query_index(&self, query: &IndexQuery) -> StoreResult<Vec<Item>>;

    /// Applies a partial update atomically to the instruction's key.
    async fn update_fields(&self, instruction: &UpdateInstruction) -> StoreResult<()>;
}
