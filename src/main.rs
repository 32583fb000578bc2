use clap::Parser;
use infractl::auth::credentials::get_access_token;
use infractl::cli::Cli;
use infractl::platform::api::PlatformApiClient;
use infractl::platform::{ProjectContext, ProjectSession};
use infractl::{CommandContext, config, run_command};
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> infractl::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;
    let config_path = config::config_file_path(cli.config.as_deref())?;

    // Resolve the project once; handlers never read the session file themselves
    let session_path = ProjectSession::session_path();
    let session = ProjectSession::load_from(&session_path).unwrap_or_else(|e| {
        log::warn!("Ignoring session at {}: {}", session_path.display(), e);
        ProjectSession::default()
    });
    let project = ProjectContext::resolve(cli.project, &session);
    log::debug!("Project context: {:?}", project);

    let client = PlatformApiClient::new(&config.api, get_access_token(&config.auth))?;

    let ctx = CommandContext {
        config,
        config_path,
        session,
        session_path,
        project,
        client,
        json: cli.json,
    };

    run_command(&ctx, cli.command).await
}
