use backup_core::{DataSize, ProjectData, RetrieveOutcome, SaveOutcome};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Size summary of a saved snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataSizeResponse {
    /// Number of project phases
    #[serde(rename = "워크플로우")]
    pub workflow_count: usize,

    /// Number of log entries after the backup entry was appended
    #[serde(rename = "로그")]
    pub log_count: usize,
}

impl From<DataSize> for DataSizeResponse {
    fn from(size: DataSize) -> Self {
        Self {
            workflow_count: size.workflow_count,
            log_count: size.log_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProjectResponse {
    pub success: bool,
    pub backup_id: String,
    pub message: String,
    pub saved_at: String,
    pub backup_type: String,
    pub backup_source: String,
    pub data_size: DataSizeResponse,
}

impl From<SaveOutcome> for SaveProjectResponse {
    fn from(outcome: SaveOutcome) -> Self {
        Self {
            success: true,
            backup_id: outcome.backup_id,
            message: outcome.message,
            saved_at: outcome.saved_at,
            backup_type: outcome.backup_type,
            backup_source: outcome.backup_source,
            data_size: outcome.data_size.into(),
        }
    }
}

/// Query string of `GET /api/project`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RetrieveProjectQuery {
    /// Owner whose latest snapshot is returned
    pub user_id: Option<String>,
}

/// Reply of `GET /api/project`.
///
/// The flags tell the client which branch produced the reply: fresh bootstrap
/// data, protected data that was returned unchanged, or a normal restore.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveProjectResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub project_data: Option<ProjectData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Bootstrap data created by this request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_initial_data: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,

    /// Set with `isEmpty` when no data was returned to avoid a reset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_data: Option<bool>,

    /// Stored data failed the shape check and is returned unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_protected: Option<bool>,
}

impl From<RetrieveOutcome> for RetrieveProjectResponse {
    fn from(outcome: RetrieveOutcome) -> Self {
        match outcome {
            RetrieveOutcome::Initial {
                record,
                retrieved_at,
            } => Self {
                success: true,
                project_id: Some(record.backup_metadata.backup_id),
                project_data: Some(record.project_data),
                retrieved_at: Some(retrieved_at),
                message: Some("새 프로젝트 데이터를 생성했습니다.".to_string()),
                is_initial_data: Some(true),
                ..Default::default()
            },
            RetrieveOutcome::ProtectedEmpty => Self {
                success: false,
                message: Some(
                    "저장된 데이터를 확인할 수 없어 기존 데이터 보호를 위해 초기화하지 않았습니다."
                        .to_string(),
                ),
                is_empty: Some(true),
                protected_data: Some(true),
                ..Default::default()
            },
            RetrieveOutcome::ProtectedInvalid { record, .. } => Self {
                success: true,
                project_id: Some(record.backup_metadata.backup_id),
                project_data: Some(record.project_data),
                message: Some("기존 데이터를 보호하기 위해 저장된 데이터를 그대로 반환합니다.".to_string()),
                data_protected: Some(true),
                ..Default::default()
            },
            RetrieveOutcome::Restored {
                record,
                retrieved_at,
            } => Self {
                success: true,
                project_id: Some(record.backup_metadata.backup_id),
                project_data: Some(record.project_data),
                retrieved_at: Some(retrieved_at),
                restore_count: record.backup_metadata.restore_count,
                ..Default::default()
            },
        }
    }
}

/// Body of every error reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
