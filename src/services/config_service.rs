use crate::utils::error::{HsshError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Service for loading and saving `settings.toml`
pub struct ConfigService {
    config_dir: PathBuf,
}

impl ConfigService {
    /// Create a new config service with default directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Self::with_dir(config_dir)
    }

    /// Create a config service with custom directory
    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
            tracing::info!("Created config directory: {:?}", config_dir);
        }
        Ok(Self { config_dir })
    }

    fn get_config_dir() -> Result<PathBuf> {
        ProjectDirs::from("", "", "hssh")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| HsshError::ConfigError("Failed to get config directory".to_string()))
    }

    fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    /// Load settings, falling back to defaults when the file is absent
    pub fn load_settings(&self) -> Result<AppSettings> {
        let path = self.settings_file();

        if !path.exists() {
            tracing::info!("No settings file found, using defaults");
            return Ok(AppSettings::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: AppSettings = toml::from_str(&content)?;
        settings.validate()?;

        tracing::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        settings.validate()?;
        let content = toml::to_string_pretty(settings)?;

        let path = self.settings_file();
        fs::write(&path, content)?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Folder holding one SSH config fragment per host file
    #[serde(default = "default_host_folder")]
    pub host_folder: String,

    /// Buffer size of the channel used to collect connections
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Host aliases never taken from host files
    #[serde(default)]
    pub denied_hosts: Vec<String>,

    /// Reject connections whose `Port` is not a number
    #[serde(default)]
    pub strict_ports: bool,
}

fn default_host_folder() -> String {
    "~/.config/hssh/hosts".to_string()
}

fn default_channel_capacity() -> usize {
    32
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host_folder: default_host_folder(),
            channel_capacity: default_channel_capacity(),
            denied_hosts: Vec::new(),
            strict_ports: false,
        }
    }
}

impl AppSettings {
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(HsshError::ConfigError(
                "channel_capacity must be greater than 0".to_string(),
            ));
        }
        if self.host_folder.trim().is_empty() {
            return Err(HsshError::ConfigError("host_folder cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn host_folder_path(&self) -> Result<PathBuf> {
        expand_tilde(&self.host_folder)
    }
}

fn expand_tilde(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| HsshError::ConfigError("Failed to determine home directory".to_string()))?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}
