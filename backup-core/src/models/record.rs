use serde::{Deserialize, Serialize};

use super::{log::LogEntry, project::ProjectData};

/// How a record came into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncAction {
    /// Explicit save from a client
    Upload,

    /// Bootstrap record created on a user's first retrieval
    InitialCreate,

    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub backup_id: String,

    /// ISO-8601 creation time
    pub timestamp: String,

    pub user_id: String,

    pub version: String,

    pub sync_action: SyncAction,

    pub backup_type: String,

    pub backup_source: String,

    #[serde(default)]
    pub sync_logs: Vec<LogEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_restore_timestamp: Option<String>,
}

/// Stored unit: a project snapshot plus its backup metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    pub project_data: ProjectData,
    pub backup_metadata: BackupMetadata,
}

impl BackupRecord {
    pub fn id(&self) -> &str {
        &self.backup_metadata.backup_id
    }

    pub fn user_id(&self) -> &str {
        &self.backup_metadata.user_id
    }

    pub fn is_bootstrap(&self) -> bool {
        self.backup_metadata.sync_action == SyncAction::InitialCreate
    }
}
