//! Development mock server.
//!
//! Answers `/api/project` and `/api/backup` with canned fixtures so a client
//! can be developed without the real backup service. Nothing is stored.

pub mod fixtures;

use axum::{Json, Router, extract::rejection::JsonRejection, routing::get};
use backup_core::{Clock, SystemClock, iso_timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::handlers::method_not_allowed;
use crate::server::{shutdown_signal, with_middleware};

/// Mock server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "debug".to_string()
}

/// Create the mock router with CORS and tracing applied
pub fn create_mock_app() -> Router {
    with_middleware(create_mock_router())
}

pub fn create_mock_router() -> Router {
    Router::new()
        .route(
            "/api/project",
            get(mock_retrieve_project)
                .post(mock_save_project)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/backup",
            get(mock_list_backups)
                .post(mock_create_backup)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
}

async fn mock_retrieve_project() -> Json<Value> {
    info!("Mock: serving project fixture");
    Json(fixtures::retrieve_response(&now()))
}

/// The body is read leniently; only the backup type and source are echoed
async fn mock_save_project(body: Result<Json<Value>, JsonRejection>) -> Json<Value> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let backup_type = body
        .get("backupType")
        .and_then(Value::as_str)
        .unwrap_or("AUTO");
    let backup_source = body
        .get("backupSource")
        .and_then(Value::as_str)
        .unwrap_or("자동 백업");

    info!(backup_type, "Mock: pretending to save project");
    Json(fixtures::save_response(
        fixtures::MOCK_PROJECT_ID,
        &now(),
        backup_type,
        backup_source,
    ))
}

async fn mock_list_backups() -> Json<Value> {
    Json(fixtures::backup_list_response())
}

async fn mock_create_backup() -> Json<Value> {
    Json(fixtures::backup_created_response(
        fixtures::MOCK_PROJECT_ID,
        &now(),
    ))
}

fn now() -> String {
    iso_timestamp(SystemClock.now())
}

/// Start the mock server
pub async fn start_mock_server(config: MockServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port).parse::<std::net::SocketAddr>()?;

    info!("Starting mock server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_mock_app())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
