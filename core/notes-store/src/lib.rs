//! Document store layer for the notes resolver.
//!
//! The handlers above this crate only ever talk to [`StoreAdapter`], a small
//! asynchronous capability interface over a single-table key-value store:
//! get / put / delete by key, full scan, secondary-index equality query and
//! atomic partial update.
//!
//! # Architecture
//!
//! - [`expression`] turns a key plus a field→value mapping into an
//!   [`UpdateInstruction`]: a `SET` expression whose attribute names and
//!   values are referenced only through placeholder tokens, so reserved
//!   words never collide and untouched attributes are never rewritten
//! - [`DynamoDbStore`] is the production adapter, backed by the AWS SDK
//! - [`MemoryStore`] is an in-process adapter with real secondary indexes,
//!   used by tests and local runs

mod adapter;
pub mod dynamodb;
mod error;
pub mod expression;
mod memory;

pub use adapter::{IndexQuery, Item, Key, StoreAdapter};
pub use dynamodb::{DynamoDbConfig, DynamoDbStore};
pub use error::{StoreError, StoreResult};
pub use expression::{InvalidUpdate, ResolvedUpdate, UpdateBuilder, UpdateInstruction};
pub use memory::MemoryStore;
