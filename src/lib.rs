//! # infractl
//!
//! A command-line client for a deployment platform's provisioning control
//! plane. It walks through template selection, cloud credentials and template
//! settings, starts the provisioning run and follows its Terraform modules
//! until they settle.
//!
//! ## Features
//!
//! - **Provisioning wizard**: a credentials → settings → status state machine
//!   that front-ends can drive without doing any I/O themselves
//! - **Status aggregation**: per-module state and completion percentage from
//!   raw Terraform resource state
//! - **Declarative forms**: template settings rendered from the form schema the
//!   platform ships with each template
//!
//! ## Example
//!
//! ```rust,no_run
//! use infractl::provision::{aggregate_module, ModuleState};
//! use infractl::platform::api::types::{TfModule, TfResource};
//!
//! let module = TfModule {
//!     id: 1,
//!     kind: "eks".to_string(),
//!     resources: vec![TfResource {
//!         addr: "aws_eks_cluster.main".to_string(),
//!         provisioned: true,
//!         error: String::new(),
//!     }],
//! };
//! assert_eq!(aggregate_module(&module).state, ModuleState::Successful);
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod platform;
pub mod provision;
pub mod wizard;

// Re-export commonly used types and functions
pub use error::{InfraCtlError, Result};
pub use handlers::CommandContext;
pub use provision::{ProvisionFlow, ProvisionWizard, StatusBoard, aggregate_module};

use cli::Commands;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(ctx: &CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Templates => handlers::handle_templates(ctx).await,
        Commands::Provision { template } => handlers::handle_provision(ctx, template).await,
        Commands::Status {
            infra_id,
            watch,
            interval,
        } => handlers::handle_status(ctx, infra_id, watch, interval).await,
        Commands::Infra => handlers::handle_infra(ctx).await,
        Commands::Credentials { provider } => handlers::handle_credentials(ctx, provider).await,
        Commands::Project { command } => handlers::handle_project(ctx, command).await,
        Commands::Auth { command } => handlers::handle_auth(ctx, command).await,
    }
}
