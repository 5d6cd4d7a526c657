//! Save and retrieve policy for project backups.
//!
//! Save wraps a snapshot in metadata and stores it under a fresh id.
//! Retrieve picks the user's most recent record and, depending on its
//! shape, either bootstraps an empty project, hands the record back
//! untouched (data protection), or appends a restore log and writes the
//! record back under the same key.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    clock::{Clock, SystemClock, iso_timestamp},
    config::{AUTO_BACKUP_TYPE, BackupConfig},
    error::{BackupError, BackupResult},
    models::{
        BackupMetadata, BackupRecord, LogEntry, LogKind, PhaseValidity, ProjectData, SyncAction,
    },
    store::BackupStore,
};

const INITIAL_BACKUP_TYPE: &str = "INITIAL";
const INITIAL_BACKUP_SOURCE: &str = "시스템 초기화";

/// Incoming save request, also the `POST /api/project` body.
///
/// Only `projectData` must be an object. The string fields accept numbers
/// (stringified) and treat any other non-string value as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Project snapshot; required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub project_data: Option<ProjectData>,

    /// Owner of the snapshot, `anonymous` when omitted
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,

    /// `AUTO` when omitted
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub backup_type: Option<String>,

    /// `자동 백업` when omitted
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub backup_source: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    })
}

impl SaveRequest {
    pub fn new(project_data: ProjectData) -> Self {
        Self {
            project_data: Some(project_data),
            ..Default::default()
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn backup_type(mut self, backup_type: impl Into<String>) -> Self {
        self.backup_type = Some(backup_type.into());
        self
    }

    pub fn backup_source(mut self, backup_source: impl Into<String>) -> Self {
        self.backup_source = Some(backup_source.into());
        self
    }
}

/// Size summary of a saved snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSize {
    pub workflow_count: usize,
    pub log_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub backup_id: String,
    pub message: String,
    pub saved_at: String,
    pub backup_type: String,
    pub backup_source: String,
    pub data_size: DataSize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetrieveOutcome {
    /// No record existed; a bootstrap record was created and stored
    Initial {
        record: BackupRecord,
        retrieved_at: String,
    },

    /// The first lookup found nothing but the re-check did; nothing was created
    ProtectedEmpty,

    /// The latest record failed the shape check and is returned unchanged
    ProtectedInvalid {
        record: BackupRecord,
        validity: PhaseValidity,
    },

    /// The latest record with a restore log appended
    Restored {
        record: BackupRecord,
        retrieved_at: String,
    },
}

#[derive(Clone)]
pub struct BackupService {
    store: Arc<dyn BackupStore>,
    clock: Arc<dyn Clock>,
    config: BackupConfig,
}

impl BackupService {
    pub fn new(store: Arc<dyn BackupStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config: BackupConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: BackupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn BackupStore> {
        &self.store
    }

    /// Store a new backup record for the request's project data
    pub async fn save(&self, request: SaveRequest) -> BackupResult<SaveOutcome> {
        let mut project_data = request
            .project_data
            .ok_or(BackupError::MissingProjectData)?;
        let user_id = non_empty(request.user_id)
            .unwrap_or_else(|| self.config.anonymous_user_id.clone());
        let backup_type = non_empty(request.backup_type)
            .unwrap_or_else(|| self.config.default_backup_type.clone());
        let backup_source = non_empty(request.backup_source)
            .unwrap_or_else(|| self.config.default_backup_source.clone());

        let now = self.clock.now();
        let timestamp = iso_timestamp(now);
        let backup_id = format!("backup_{}_{}", user_id, now.timestamp_millis());

        let backup_log = LogEntry::new(
            LogKind::CloudBackup,
            format!("클라우드 백업 ({backup_type} - {backup_source})"),
            timestamp.clone(),
        )
        .with_detail("backupId", backup_id.clone())
        .with_detail("backupType", backup_type.clone())
        .with_detail("backupSource", backup_source.clone());

        let mut sync_logs = project_data
            .log_entries()
            .map(<[LogEntry]>::to_vec)
            .unwrap_or_else(|| {
                warn!(%backup_id, "Project logs are malformed; keeping them as sent");
                Vec::new()
            });
        sync_logs.push(backup_log);
        project_data.replace_logs(sync_logs.clone());

        let version = project_data
            .version_tag()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_version.clone());
        let data_size = DataSize {
            workflow_count: project_data.phases().len(),
            log_count: sync_logs.len(),
        };

        let record = BackupRecord {
            project_data,
            backup_metadata: BackupMetadata {
                backup_id: backup_id.clone(),
                timestamp: timestamp.clone(),
                user_id: user_id.clone(),
                version,
                sync_action: SyncAction::Upload,
                backup_type: backup_type.clone(),
                backup_source: backup_source.clone(),
                sync_logs,
                restore_count: None,
                last_restore_timestamp: None,
            },
        };
        self.store.put(&backup_id, record).await?;

        info!(
            %backup_id,
            %user_id,
            %backup_type,
            workflows = data_size.workflow_count,
            logs = data_size.log_count,
            "Backup saved"
        );

        let message = if backup_type == AUTO_BACKUP_TYPE {
            "자동 백업이 완료되었습니다.".to_string()
        } else {
            format!("수동 백업이 완료되었습니다. ({backup_source})")
        };

        Ok(SaveOutcome {
            backup_id,
            message,
            saved_at: timestamp,
            backup_type,
            backup_source,
            data_size,
        })
    }

    /// Hand back the user's most recent snapshot
    pub async fn retrieve(&self, user_id: Option<&str>) -> BackupResult<RetrieveOutcome> {
        let user_id = user_id
            .filter(|id| !id.is_empty())
            .ok_or(BackupError::MissingUserId)?;

        let mut records = self.store.query_by_user(user_id).await?;
        records.sort_by(|a, b| b.backup_metadata.timestamp.cmp(&a.backup_metadata.timestamp));

        let Some(latest) = records.into_iter().next() else {
            return self.bootstrap(user_id).await;
        };

        match latest.project_data.validate() {
            PhaseValidity::Valid => self.restore(latest).await,
            _ if latest.is_bootstrap() => self.restore(latest).await,
            validity => {
                warn!(
                    backup_id = %latest.id(),
                    %user_id,
                    ?validity,
                    "Latest backup failed the shape check; returning it unchanged"
                );
                Ok(RetrieveOutcome::ProtectedInvalid {
                    record: latest,
                    validity,
                })
            }
        }
    }

    async fn bootstrap(&self, user_id: &str) -> BackupResult<RetrieveOutcome> {
        // Re-check the store before creating anything, so existing data is
        // never shadowed by a fresh bootstrap record.
        let existing = self.store.query_by_user(user_id).await?;
        if !existing.is_empty() {
            warn!(
                %user_id,
                records = existing.len(),
                "Records appeared on re-check; skipping bootstrap"
            );
            return Ok(RetrieveOutcome::ProtectedEmpty);
        }

        let now = self.clock.now();
        let timestamp = iso_timestamp(now);
        let millis = now.timestamp_millis();
        let backup_id = format!("initial_backup_{user_id}_{millis}");
        let version = format!("initial_{millis}");

        let init_log = LogEntry::new(
            LogKind::SystemInit,
            "새 프로젝트가 초기화되었습니다.",
            timestamp.clone(),
        )
        .with_detail("backupId", backup_id.clone());

        let record = BackupRecord {
            project_data: ProjectData::empty(vec![init_log.clone()], version.clone()),
            backup_metadata: BackupMetadata {
                backup_id: backup_id.clone(),
                timestamp: timestamp.clone(),
                user_id: user_id.to_string(),
                version,
                sync_action: SyncAction::InitialCreate,
                backup_type: INITIAL_BACKUP_TYPE.to_string(),
                backup_source: INITIAL_BACKUP_SOURCE.to_string(),
                sync_logs: vec![init_log],
                restore_count: None,
                last_restore_timestamp: None,
            },
        };
        self.store.put(&backup_id, record.clone()).await?;

        info!(%backup_id, %user_id, "Created bootstrap backup");

        Ok(RetrieveOutcome::Initial {
            record,
            retrieved_at: timestamp,
        })
    }

    async fn restore(&self, mut record: BackupRecord) -> BackupResult<RetrieveOutcome> {
        let retrieved_at = iso_timestamp(self.clock.now());
        let metadata = &record.backup_metadata;

        let restore_log = LogEntry::new(
            LogKind::Restore,
            format!("클라우드에서 복원 ({})", metadata.backup_id),
            retrieved_at.clone(),
        )
        .with_detail("backupId", metadata.backup_id.clone())
        .with_detail("backupTimestamp", metadata.timestamp.clone())
        .with_detail("syncAction", json!(metadata.sync_action))
        .with_detail("backupType", metadata.backup_type.clone())
        .with_detail("backupSource", metadata.backup_source.clone());

        if !record.project_data.push_log(restore_log.clone()) {
            warn!(
                backup_id = %record.id(),
                "Project logs are malformed; restore logged in metadata only"
            );
        }

        let metadata = &mut record.backup_metadata;
        metadata.sync_logs.push(restore_log);
        let restore_count = metadata.restore_count.unwrap_or(0) + 1;
        metadata.restore_count = Some(restore_count);
        metadata.last_restore_timestamp = Some(retrieved_at.clone());

        let key = record.id().to_string();
        self.store.put(&key, record.clone()).await?;

        info!(backup_id = %key, restore_count, "Backup restored");

        Ok(RetrieveOutcome::Restored {
            record,
            retrieved_at,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
