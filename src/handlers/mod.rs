// Handler modules
pub mod auth;
pub mod credentials;
pub mod infra;
pub mod project;
pub mod provision;
pub mod status;
pub mod templates;

use crate::config::types::Config;
use crate::error::{InfraCtlError, Result};
use crate::platform::api::PlatformApiClient;
use crate::platform::{ProjectContext, ProjectSession};
use std::path::PathBuf;

// Re-export all handler functions
pub use auth::handle_auth;
pub use credentials::handle_credentials;
pub use infra::handle_infra;
pub use project::handle_project;
pub use provision::handle_provision;
pub use status::handle_status;
pub use templates::handle_templates;

/// Everything a command needs, resolved once in `main`
pub struct CommandContext {
    pub config: Config,
    /// File `config` was loaded from and credentials are written to
    pub config_path: PathBuf,
    pub session: ProjectSession,
    pub session_path: PathBuf,
    pub project: Option<ProjectContext>,
    pub client: PlatformApiClient,
    pub json: bool,
}

impl CommandContext {
    /// The project to operate on, or an error telling the user how to pick one
    pub fn require_project(&self) -> Result<u64> {
        self.project
            .map(|p| p.project_id)
            .ok_or(InfraCtlError::NoProject)
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
