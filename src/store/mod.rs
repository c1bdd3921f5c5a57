//! Item persistence.
//!
//! [`ItemStore`] is the only seam between the handlers and the backing
//! table. Every operation is a single round trip; failures of any kind come
//! back as a [`StoreError`] and are never retried.

mod dynamodb;
mod memory;

use async_trait::async_trait;

use crate::item::Item;

pub use dynamodb::DynamoStore;
pub use memory::MemoryStore;

/// Boxed source error carried by [`StoreError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Where the items live: a table name and the name of its primary-key field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StoreConfig {
    pub table_name: String,
    pub primary_key: String,
}

/// A store operation, used to label failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Put,
    Scan,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Put    => "put",
            Self::Scan   => "scan",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure of a store operation.
///
/// Throttling, connectivity and malformed data are deliberately not told
/// apart: every one of them ends the request with a server error.
#[derive(Debug, thiserror::Error)]
#[error("store operation `{operation}` failed: {source}")]
pub struct StoreError {
    pub operation: Operation,
    #[source]
    pub source: BoxError,
}

impl StoreError {
    pub fn new(operation: Operation, source: impl Into<BoxError>) -> Self {
        Self { operation, source: source.into() }
    }

    /// A scanned record that does not decode into an [`Item`].
    pub(crate) fn malformed(key_field: &str) -> Self {
        Self::new(
            Operation::Scan,
            format!("malformed record: expected string `{key_field}`, string `text` and number `createdAt`"),
        )
    }
}

/// CRUD over the configured item table.
///
/// Implementations are shared across concurrent requests behind an `Arc`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Inserts `item`, replacing any record with the same id.
    async fn put(&self, item: &Item) -> Result<(), StoreError>;

    /// Every item in the table, in store-defined order.
    async fn scan(&self) -> Result<Vec<Item>, StoreError>;

    /// Removes the item with primary key `id`. Succeeds whether or not it
    /// existed.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
