use backup_http::{self, server::ServerConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Project backup HTTP API server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(short = 'H', long, env = "BACKUP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "BACKUP_PORT", default_value_t = 3000)]
    port: u16,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server with a specific configuration file
    Config {
        /// Path to the configuration file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Tracing is initialized by the library once the log level is known
    let config = match &cli.command {
        Some(Commands::Config { file }) => {
            println!("Loading configuration from file: {}", file.display());
            ServerConfig::from_file(file)?
        }
        None => ServerConfig {
            host: cli.host,
            port: cli.port,
            log_level: cli.log_level,
            ..Default::default()
        },
    };

    println!(
        "Starting project backup server on {}:{}",
        config.host, config.port
    );
    backup_http::start_with_config(config).await
}
