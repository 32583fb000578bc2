use crate::platform::api::PlatformApiError;
use crate::provision::form::FormError;
use crate::provision::WizardError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for CLI commands
#[derive(Debug, Error)]
pub enum InfraCtlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] PlatformApiError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("Invalid form values: {0}")]
    Form(#[from] FormError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No project selected - pass --project or run `infractl project use <ID>`")]
    NoProject,

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Provision(String),

    #[error("Provisioning of infra {0} failed")]
    ProvisioningFailed(u64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParsingFailed(String),

    #[error("could not determine home directory")]
    NoHomeDirectory,
}

pub type Result<T> = std::result::Result<T, InfraCtlError>;
