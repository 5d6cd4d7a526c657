use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No home directory found")]
    NoHomeDir,

    #[error("Failed to create config directory: {0}")]
    CreateConfigDir(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Client defaults for talking to a backup server
/// Supported sources(in order of precedence):
/// - CLI arguments(by clap)
/// - Environment variables(by clap)
/// - Dot-env file(by clap and dotenv)
/// - Config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backup server base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User whose snapshots are saved and restored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip)]
    config_dir: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_id: None,
            config_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn new(config_dir: String) -> Self {
        Self {
            config_dir: Some(config_dir),
            ..Default::default()
        }
    }

    /// Layer explicit values over whatever the config file holds
    pub fn initialize(
        config_dir: Option<String>,
        url: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        let mut config = match config_dir {
            Some(dir) => {
                let mut config = ClientConfig::new(dir);
                let _ = config.load();
                config
            }
            None => ClientConfig::default(),
        };

        if let Some(url) = url.filter(|url| !url.is_empty()) {
            config.api_url = url;
        }

        if let Some(user_id) = user_id.filter(|id| !id.is_empty()) {
            config.user_id = Some(user_id);
        }
        config
    }

    /// Get the config file path, creating its directory when missing
    pub fn config_file_path(&self) -> ConfigResult<PathBuf> {
        if let Some(parent) = &self.config_dir {
            let parent_path = Path::new(parent);
            if !parent_path.exists() {
                fs::create_dir_all(parent_path)
                    .map_err(|e| ConfigError::CreateConfigDir(e.to_string()))?;
            }
            return Ok(parent_path.join("config.json"));
        }
        let proj_dirs =
            ProjectDirs::from("com", "backup", "backup-cli").ok_or(ConfigError::NoHomeDir)?;

        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)
                .map_err(|e| ConfigError::CreateConfigDir(e.to_string()))?;
        }

        Ok(config_dir.join("config.json"))
    }

    /// Overwrite the URL and user id with the stored ones, if a file exists
    pub fn load(&mut self) -> ConfigResult<ClientConfig> {
        let file_path = self.config_file_path()?;
        if file_path.exists() {
            let mut file = File::open(&file_path)?;
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            let stored: Self = serde_json::from_str(&contents)?;
            self.api_url = stored.api_url;
            self.user_id = stored.user_id;
        }

        Ok(self.clone())
    }

    pub fn save(&self) -> ConfigResult<PathBuf> {
        let file_path = self.config_file_path()?;
        let json = serde_json::to_string_pretty(self)?;

        let mut file = File::create(&file_path)?;
        file.write_all(json.as_bytes())?;

        Ok(file_path)
    }
}
