use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Project data is required")]
    MissingProjectData,

    #[error("User id is required")]
    MissingUserId,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type BackupResult<T> = std::result::Result<T, BackupError>;
