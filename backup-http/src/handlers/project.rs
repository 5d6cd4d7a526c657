use axum::{
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use backup_core::{BackupError, SaveRequest};
use serde_json::error::Category;
use tracing::warn;

use crate::error::AppError;
use crate::models::{
    ErrorResponse, RetrieveProjectQuery, RetrieveProjectResponse, SaveProjectResponse,
};
use crate::server::AppState;

/// Read a save request from the raw body, whatever the Content-Type says.
///
/// An empty body reads as a request without project data. Text that is not
/// JSON at all is [`AppError::InvalidBody`]; JSON whose `projectData` has the
/// wrong shape counts as missing project data.
fn parse_save_request(body: &[u8]) -> Result<SaveRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SaveRequest::default());
    }

    serde_json::from_slice(body).map_err(|err| {
        warn!("Rejected save request body: {}", err);
        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => {
                AppError::InvalidBody(err.to_string())
            }
            Category::Data => BackupError::MissingProjectData.into(),
        }
    })
}

/// Save project
///
/// Wraps the snapshot in backup metadata and stores it under a new backup id.
#[utoipa::path(
    post,
    path = "/api/project",
    request_body = SaveRequest,
    responses(
        (status = 200, description = "Backup saved", body = SaveProjectResponse),
        (status = 400, description = "Project data missing or body is not JSON", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "project"
)]
#[axum::debug_handler]
pub async fn save_project(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveProjectResponse>, AppError> {
    let request = parse_save_request(&body)?;

    let outcome = state.service.save(request).await?;

    Ok(Json(outcome.into()))
}

/// Retrieve project
///
/// Returns the user's most recent snapshot and records the restore. A user
/// without any snapshot gets fresh bootstrap data; stored data that fails
/// the shape check is returned unchanged.
#[utoipa::path(
    get,
    path = "/api/project",
    params(RetrieveProjectQuery),
    responses(
        (status = 200, description = "Latest snapshot, bootstrap data or protected data", body = RetrieveProjectResponse),
        (status = 400, description = "User id missing", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "project"
)]
#[axum::debug_handler]
pub async fn retrieve_project(
    State(state): State<AppState>,
    query: Result<Query<RetrieveProjectQuery>, QueryRejection>,
) -> Result<Json<RetrieveProjectResponse>, AppError> {
    let user_id = match query {
        Ok(Query(query)) => query.user_id,
        Err(rejection) => {
            warn!("Rejected retrieve query: {}", rejection.body_text());
            None
        }
    };

    let outcome = state.service.retrieve(user_id.as_deref()).await?;

    Ok(Json(outcome.into()))
}

/// Fallback for methods other than GET, POST and the CORS preflight
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
