use serde::{Deserialize, Serialize};

/// Defaults applied by the backup service when a request leaves them out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Backup type recorded when the client sends none
    #[serde(default = "default_backup_type")]
    pub default_backup_type: String,

    /// Backup source label recorded when the client sends none
    #[serde(default = "default_backup_source")]
    pub default_backup_source: String,

    /// User id used for saves that carry no user
    #[serde(default = "default_anonymous_user_id")]
    pub anonymous_user_id: String,

    /// Version tag used when the project data has no string `version`
    #[serde(default = "default_version")]
    pub default_version: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            default_backup_type: default_backup_type(),
            default_backup_source: default_backup_source(),
            anonymous_user_id: default_anonymous_user_id(),
            default_version: default_version(),
        }
    }
}

pub const AUTO_BACKUP_TYPE: &str = "AUTO";

fn default_backup_type() -> String {
    AUTO_BACKUP_TYPE.to_string()
}

fn default_backup_source() -> String {
    "자동 백업".to_string()
}

fn default_anonymous_user_id() -> String {
    "anonymous".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}
