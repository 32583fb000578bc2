use crate::platform::api::types::CloudProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "infractl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provision cloud infrastructure from the terminal")]
#[command(
    long_about = "Pick an infrastructure template, connect a cloud account, fill in the template's settings and follow the Terraform modules as they are provisioned by the deployment platform."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project to operate on (defaults to the one selected with `project use`)
    #[arg(short, long, global = true, value_name = "ID", env = "INFRACTL_PROJECT")]
    pub project: Option<u64>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format where applicable
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the infrastructure templates available to the project
    Templates,

    /// Run the interactive provisioning wizard
    Provision {
        /// Start with this template instead of showing the picker
        #[arg(short, long, value_name = "NAME")]
        template: Option<String>,
    },

    /// Show the module status of a provisioning run
    Status {
        /// Infrastructure run to inspect
        #[arg(value_name = "INFRA_ID")]
        infra_id: u64,

        /// Keep polling until every module has finished
        #[arg(short, long)]
        watch: bool,

        /// Seconds between polls (defaults to `[status] poll_interval_secs`)
        #[arg(long, value_name = "SECS", requires = "watch")]
        interval: Option<u64>,
    },

    /// List provisioned infrastructure
    Infra,

    /// Store cloud credentials as a project integration
    Credentials {
        /// Provider to connect (prompted when omitted)
        #[arg(value_name = "PROVIDER", value_parser = parse_provider)]
        provider: Option<CloudProvider>,
    },

    /// Manage the selected project
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Manage authentication with the platform
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List the projects you belong to
    List,

    /// Select the project later commands operate on
    Use {
        /// Project id
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Show the selected project
    Show,

    /// Forget the selected project
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store an access token (prompted when not given)
    Login {
        /// Access token issued by the platform
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,

        /// Token lifetime in seconds, if it expires
        #[arg(long, value_name = "SECS")]
        expires_in: Option<u64>,
    },

    /// Remove the stored access token
    Logout,

    /// Show whether a usable token is available
    Status,
}

fn parse_provider(s: &str) -> Result<CloudProvider, String> {
    s.parse()
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .format_timestamp(None)
            .init();
    }
}
