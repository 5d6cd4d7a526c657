pub mod project;

use crate::handlers;
use crate::models::{
    DataSizeResponse, ErrorResponse, RetrieveProjectResponse, SaveProjectResponse,
};
use crate::server::AppState;
use axum::{Json, Router, routing::get};
use backup_core::SaveRequest;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::project::save_project,
        handlers::project::retrieve_project,
        handlers::system::health_check
    ),
    components(schemas(
        SaveRequest,
        SaveProjectResponse,
        DataSizeResponse,
        RetrieveProjectResponse,
        ErrorResponse
    )),
    tags(
        (name = "project", description = "Project backup and restore"),
        (name = "system", description = "Server status")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    )
)]
pub struct ApiDoc;

/// Create the main API router with state
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(project::routes())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
