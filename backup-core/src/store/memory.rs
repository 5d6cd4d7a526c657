use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::{BackupStore, StoreResult};
use crate::models::BackupRecord;

/// Process-local store keyed by backup id.
///
/// Clones share the same map. Nothing is ever evicted; all records are lost
/// when the process exits. User lookups scan every record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackupStore {
    records: Arc<DashMap<String, BackupRecord>>,
}

impl InMemoryBackupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BackupStore for InMemoryBackupStore {
    async fn put(&self, key: &str, record: BackupRecord) -> StoreResult<()> {
        self.records.insert(key.to_string(), record);
        Ok(())
    }

    async fn query_by_user(&self, user_id: &str) -> StoreResult<Vec<BackupRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().user_id() == user_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<BackupRecord>> {
        Ok(self.records.get(key).map(|entry| entry.value().clone()))
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.records.len())
    }
}
