//! # Project backup core
//!
//! Domain layer for the project backup service: a user's project snapshot is
//! wrapped in backup metadata on save, and the most recent snapshot is handed
//! back on retrieval together with a restoration log entry.
//!
//! ## Building blocks
//!
//! - Data model ([`models`]): [`BackupRecord`], [`ProjectData`], [`LogEntry`]
//!   with lenient, field-preserving deserialization.
//! - Storage ([`store`]): the [`BackupStore`] trait and the process-local
//!   [`InMemoryBackupStore`].
//! - Time ([`clock`]): an injectable [`Clock`] and the ISO-8601 rendering used
//!   for every stored timestamp.
//! - Policy ([`service`]): [`BackupService`] implementing save, bootstrap,
//!   data protection and restore logging.
//!
//! ```no_run
//! use std::sync::Arc;
//! use backup_core::{BackupService, InMemoryBackupStore, SaveRequest};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = BackupService::new(Arc::new(InMemoryBackupStore::new()));
//! let request: SaveRequest = serde_json::from_value(json!({
//!     "projectData": { "projectPhases": [{ "id": "p1" }], "logs": [] },
//!     "userId": "u1"
//! }))?;
//! let saved = service.save(request).await?;
//! println!("saved {}", saved.backup_id);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use clock::{Clock, SystemClock, iso_timestamp};
#[cfg(any(test, feature = "test-util"))]
pub use clock::SteppingClock;
pub use config::BackupConfig;
pub use error::{BackupError, BackupResult};
pub use models::{
    BackupMetadata, BackupRecord, Lenient, LogEntry, LogKind, PhaseValidity, ProjectData,
    SyncAction,
};
pub use service::{BackupService, DataSize, RetrieveOutcome, SaveOutcome, SaveRequest};
pub use store::{BackupStore, InMemoryBackupStore, StoreError, StoreResult};
