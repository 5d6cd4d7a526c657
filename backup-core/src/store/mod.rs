//! Storage for backup records.
//!
//! The service only talks to [`BackupStore`], so a file, key-value or
//! relational backend can replace [`InMemoryBackupStore`] without touching
//! the save/retrieve policy.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::BackupRecord;

pub use memory::InMemoryBackupStore;

#[async_trait]
pub trait BackupStore: Send + Sync {
    /// Store a record under `key`, replacing any record already there
    async fn put(&self, key: &str, record: BackupRecord) -> StoreResult<()>;

    /// Every record whose metadata belongs to `user_id`, in no particular order
    async fn query_by_user(&self, user_id: &str) -> StoreResult<Vec<BackupRecord>>;

    /// Look up a single record by key
    async fn get(&self, key: &str) -> StoreResult<Option<BackupRecord>>;

    /// Total number of records across all users
    async fn len(&self) -> StoreResult<usize>;

    async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len().await? == 0)
    }
}

#[derive(Debug, Error, Clone)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
