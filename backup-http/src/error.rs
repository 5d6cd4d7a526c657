//! Error handling for backup-http
//!
//! Every failure leaves the server as `{ "success": false, "error": ... }`
//! with a localized message. Internal details stay in the logs.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use backup_core::BackupError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

pub const MISSING_PROJECT_DATA_MESSAGE: &str = "프로젝트 데이터가 필요합니다.";
pub const INVALID_BODY_MESSAGE: &str = "요청 본문을 JSON으로 해석할 수 없습니다.";
pub const MISSING_USER_ID_MESSAGE: &str = "사용자 ID가 필요합니다.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "허용되지 않는 메서드입니다.";
pub const INTERNAL_ERROR_MESSAGE: &str = "서버 오류가 발생했습니다.";

/// Methods served on `/api/project`
pub const ALLOWED_METHODS: &str = "POST, GET";

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// The request body is not JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PartialEq<StatusCode> for AppError {
    fn eq(&self, status_code: &StatusCode) -> bool {
        let (error_status, _) = self.status_and_message();
        &error_status == status_code
    }
}

impl AppError {
    /// Get the status code and client-facing message for this error
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Backup(BackupError::MissingProjectData) => {
                (StatusCode::BAD_REQUEST, MISSING_PROJECT_DATA_MESSAGE)
            }
            Self::InvalidBody(_) => (StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE),
            Self::Backup(BackupError::MissingUserId) => {
                (StatusCode::BAD_REQUEST, MISSING_USER_ID_MESSAGE)
            }
            Self::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE),
            Self::Backup(BackupError::Store(_)) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: message.to_string(),
        });

        let mut response = (status, body).into_response();
        if matches!(self, Self::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}
