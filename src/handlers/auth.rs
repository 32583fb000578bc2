use super::{CommandContext, print_json};
use crate::auth::credentials::{
    AuthStatus, TOKEN_ENV, clear_credentials, get_auth_status, save_credentials,
};
use crate::cli::AuthCommand;
use crate::error::{InfraCtlError, Result};
use crate::platform::api::{PlatformApiClient, PlatformApiError};
use crate::wizard::wizard_render_config;
use chrono::{DateTime, Utc};
use colored::Colorize;
use inquire::{Password, PasswordDisplayMode};
use serde_json::json;

pub async fn handle_auth(ctx: &CommandContext, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login { token, expires_in } => login(ctx, token, expires_in).await,
        AuthCommand::Logout => {
            clear_credentials(&ctx.config_path)
                .map_err(|e| InfraCtlError::Auth(format!("{:#}", e)))?;
            println!("{} Logged out", "✓".green());
            Ok(())
        }
        AuthCommand::Status => status(ctx),
    }
}

async fn login(ctx: &CommandContext, token: Option<String>, expires_in: Option<u64>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => Password::new("Access token:")
            .with_render_config(wizard_render_config())
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .map_err(|e| InfraCtlError::Auth(format!("No token entered: {}", e)))?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(InfraCtlError::Auth("The access token is empty".to_string()));
    }

    let client = PlatformApiClient::new(&ctx.config.api, Some(token.clone()))?;
    let email = match client.get_current_user().await {
        Ok(user) => Some(user.email),
        Err(PlatformApiError::Unauthorized) => {
            return Err(InfraCtlError::Auth(format!(
                "{} rejected the token",
                ctx.config.api.url
            )));
        }
        Err(e) => {
            log::warn!("Could not verify the token, storing it anyway: {}", e);
            None
        }
    };

    save_credentials(&ctx.config_path, &token, email.as_deref(), expires_in)
        .map_err(|e| InfraCtlError::Auth(format!("{:#}", e)))?;

    match email {
        Some(email) => println!("{} Logged in as {}", "✓".green(), email.cyan()),
        None => println!("{} Token saved", "✓".green()),
    }
    Ok(())
}

fn format_expiry(expires_at: u64) -> String {
    i64::try_from(expires_at)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| expires_at.to_string())
}

fn status(ctx: &CommandContext) -> Result<()> {
    let from_env = std::env::var(TOKEN_ENV).is_ok_and(|t| !t.trim().is_empty());
    let stored = get_auth_status(&ctx.config.auth);

    if ctx.json {
        let (state, email, expires_at) = match &stored {
            AuthStatus::NotAuthenticated => ("not_authenticated", None, None),
            AuthStatus::Expired => ("expired", None, None),
            AuthStatus::Authenticated { email, expires_at } => {
                ("authenticated", email.clone(), *expires_at)
            }
        };
        return print_json(&json!({
            "stored": state,
            "email": email,
            "expires_at": expires_at,
            "env_token": from_env,
            "api_url": ctx.config.api.url,
        }));
    }

    println!("API: {}", ctx.config.api.url.cyan());
    if from_env {
        println!("{} Using token from {}", "✓".green(), TOKEN_ENV);
    }
    match stored {
        AuthStatus::NotAuthenticated if !from_env => println!(
            "{} Not logged in. Run `infractl auth login`.",
            "✗".red()
        ),
        AuthStatus::NotAuthenticated => {}
        AuthStatus::Expired => println!(
            "{} Stored token has expired. Run `infractl auth login`.",
            "✗".red()
        ),
        AuthStatus::Authenticated { email, expires_at } => {
            println!(
                "{} Logged in{}",
                "✓".green(),
                email.map(|e| format!(" as {}", e.cyan())).unwrap_or_default()
            );
            if let Some(expires_at) = expires_at {
                println!("  expires {}", format_expiry(expires_at).dimmed());
            }
        }
    }
    Ok(())
}
