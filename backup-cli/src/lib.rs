//! Command-line client for the project backup server.

pub mod api_client;
pub mod config;
