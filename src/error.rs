use crate::platform::api::PlatformApiError;
use crate::wizard::WizardError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the relay-ctl binary and library entry points
#[derive(Debug, Error)]
pub enum RelayCtlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] PlatformApiError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    ParsingFailed(String),
}

pub type Result<T> = std::result::Result<T, RelayCtlError>;
