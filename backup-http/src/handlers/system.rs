use axum::{http::StatusCode, response::IntoResponse};

/// Health check endpoint for container health monitoring
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up")
    ),
    tag = "system"
)]
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
