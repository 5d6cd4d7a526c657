use backup_http::{self, mock::MockServerConfig};
use clap::Parser;

/// Development mock of the project backup API
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3001)]
    port: u16,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = MockServerConfig {
        host: cli.host,
        port: cli.port,
        log_level: cli.log_level,
    };

    println!("Starting mock backup server on {}:{}", config.host, config.port);
    backup_http::start_mock_with_config(config).await
}
