use crate::handlers::{method_not_allowed, retrieve_project, save_project};
use crate::server::AppState;
use axum::{Router, routing::get};

/// Create the project routes with state
///
/// axum answers HEAD with the GET handler unless a HEAD route exists, and a
/// retrieve writes to the store, so HEAD is rejected explicitly.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/project",
        get(retrieve_project)
            .post(save_project)
            .head(method_not_allowed)
            .fallback(method_not_allowed),
    )
}
