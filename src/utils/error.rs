use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HsshError {
    #[error("Failed to read host file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create host file {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection '{name}' rejected: {reason}")]
    InvalidConnection { name: String, reason: String },

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid host file state: {0}")]
    InvalidState(String),

    #[error("Connection channel closed by receiver")]
    ChannelClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Settings serialization error: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, HsshError>;

impl HsshError {
    pub(crate) fn invalid_connection(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConnection {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns a short message suitable for the command line
    pub fn user_message(&self) -> String {
        match self {
            Self::ReadFailed { path, .. } => format!("Cannot read {}", path.display()),
            Self::CreateFailed { path, .. } => format!("Cannot create {}", path.display()),
            Self::InvalidConnection { name, reason } => format!("Host '{}' skipped: {}", name, reason),
            Self::ChannelClosed => "Connection receiver went away".to_string(),
            Self::ConfigError(reason) => format!("Configuration error: {}", reason),
            _ => self.to_string(),
        }
    }
}
