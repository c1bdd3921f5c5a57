//! Process-local item table.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ItemStore, StoreConfig, StoreError};
use crate::item::{Item, Record};

/// An in-memory table of records keyed by the configured primary-key field.
///
/// Contents live as long as the process. Used for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    config: StoreConfig,
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config, records: RwLock::new(HashMap::new()) }
    }

    /// Stores `record` as written, keyed by its primary-key field (or `""`
    /// when absent), as another writer sharing the table would. Nothing is
    /// validated until the record is scanned.
    pub async fn put_record(&self, record: Record) {
        let id = record.get(&self.config.primary_key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_owned();
        self.records.write().await.insert(id, record);
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        let record = item.to_record(&self.config.primary_key);
        self.records.write().await.insert(item.id.clone(), record);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let key = &self.config.primary_key;
        self.records.read().await
            .values()
            .map(|record| Item::from_record(key, record).ok_or_else(|| StoreError::malformed(key)))
            .collect()
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
