use backup_cli::{api_client::ApiClient, config::ClientConfig};
use backup_core::{ProjectData, SaveRequest};
use backup_http::models::RetrieveProjectResponse;
use clap::{Parser, Subcommand};
use std::{
    error::Error,
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backup server URL
    #[arg(long, short = 'u', env = "BACKUP_API_URL", global = true)]
    api_url: Option<String>,

    /// User whose snapshots are saved and restored
    #[arg(long, env = "BACKUP_USER_ID", global = true)]
    user_id: Option<String>,

    /// Config directory
    #[arg(long, short = 'd', default_value = ".backup", global = true)]
    config_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a project snapshot
    Save(SaveArgs),

    /// Fetch the latest snapshot
    Restore(RestoreArgs),

    /// Store the server URL and user id as defaults
    Configure(ConfigureArgs),
}

#[derive(Parser)]
struct SaveArgs {
    /// Project data file (JSON)
    #[arg(short, long)]
    file: PathBuf,

    /// Backup type, AUTO when omitted
    #[arg(short = 't', long)]
    backup_type: Option<String>,

    /// Label describing what triggered the backup
    #[arg(short = 's', long)]
    backup_source: Option<String>,
}

#[derive(Parser)]
struct RestoreArgs {
    /// Write the project data here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct ConfigureArgs {
    /// Test the connection with the resulting settings
    #[arg(long, default_value = "false")]
    test: bool,
}

fn client_config(cli: &Cli) -> ClientConfig {
    ClientConfig::initialize(
        cli.config_dir.clone(),
        cli.api_url.clone(),
        cli.user_id.clone(),
    )
}

fn output_json<T: serde::Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

async fn handle_save(args: &SaveArgs, cli: &Cli) -> CliResult<()> {
    let config = client_config(cli);

    let content = fs::read_to_string(&args.file)
        .map_err(|e| format!("Failed to read {}: {}", args.file.display(), e))?;
    let project_data: ProjectData = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse project data: {}", e))?;

    let request = SaveRequest {
        project_data: Some(project_data),
        user_id: config.user_id.clone(),
        backup_type: args.backup_type.clone(),
        backup_source: args.backup_source.clone(),
    };

    let response = ApiClient::new(&config.api_url)
        .save_project(&request)
        .await?;
    info!("Saved backup {}", response.backup_id);
    output_json(&response)
}

async fn handle_restore(args: &RestoreArgs, cli: &Cli) -> CliResult<()> {
    let config = client_config(cli);
    let user_id = config
        .user_id
        .as_deref()
        .ok_or("No user id given; pass --user-id or run `backup configure`")?;

    let response = ApiClient::new(&config.api_url)
        .retrieve_project(user_id)
        .await?;
    report_restore(&response);

    if !response.success {
        return Err(response
            .message
            .unwrap_or_else(|| "Server returned no data".to_string())
            .into());
    }

    let Some(project_data) = &response.project_data else {
        return Err("Server reply carried no project data".into());
    };
    let json = serde_json::to_string_pretty(project_data)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Project data written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Status lines go to stderr so stdout stays pipeable
fn report_restore(response: &RetrieveProjectResponse) {
    if let Some(id) = &response.project_id {
        eprintln!("Backup: {}", id);
    }
    if response.is_initial_data == Some(true) {
        eprintln!("No backup existed; the server created a new empty project");
    }
    if response.data_protected == Some(true) {
        warn!("Stored data failed validation and was returned unchanged");
        eprintln!("Warning: stored data was returned as-is without restoring");
    }
    if let Some(count) = response.restore_count {
        eprintln!("Restore count: {}", count);
    }
    if let Some(message) = &response.message {
        debug!("Server message: {}", message);
    }
}

async fn handle_configure(args: &ConfigureArgs, cli: &Cli) -> CliResult<()> {
    let config = client_config(cli);
    let path = config.save()?;

    println!("Saved settings to {}", path.display());
    println!("API URL: {}", config.api_url);
    println!(
        "User ID: {}",
        config.user_id.as_deref().unwrap_or("Not set")
    );

    if args.test {
        print!("Testing API connection... ");
        io::stdout().flush()?;

        match ApiClient::new(&config.api_url).health_check().await {
            Ok(_) => println!("✅ Success"),
            Err(e) => println!("❌ Failed: {}", e),
        }
    }

    Ok(())
}

async fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Save(args) => handle_save(args, cli).await,
        Commands::Restore(args) => handle_restore(args, cli).await,
        Commands::Configure(args) => handle_configure(args, cli).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
