//! Project backup HTTP API server
//!
//! This crate exposes the backup service over HTTP (`/api/project`) and ships
//! a development mock server answering the same routes with canned data.

pub mod error;
pub mod handlers;
pub mod mock;
pub mod models;
pub mod routes;
pub mod server;

use mock::{MockServerConfig, start_mock_server};
use server::{ServerConfig, start_server};

/// Start the backup HTTP server with the default configuration
pub async fn start() -> Result<(), Box<dyn std::error::Error>> {
    start_with_config(ServerConfig::default()).await
}

/// Start the backup HTTP server with a custom configuration
pub async fn start_with_config(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&config.log_level);

    start_server(config).await
}

/// Start the development mock server
pub async fn start_mock_with_config(
    config: MockServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&config.log_level);

    start_mock_server(config).await
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level`. A second call is a no-op.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
