//! Access token storage and retrieval
//!
//! Tokens live in the `[auth]` section of the config file in effect
//! (~/.infractl.toml unless `--config` is given). `INFRACTL_TOKEN` takes
//! precedence over the stored token.

use crate::config::types::{AuthConfig, Config};
use crate::config::{read_config_file, write_config_file};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable carrying an access token
pub const TOKEN_ENV: &str = "INFRACTL_TOKEN";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Store a token in the given config
pub fn store_token(
    config: &mut Config,
    access_token: &str,
    user_email: Option<&str>,
    expires_in_secs: Option<u64>,
) {
    config.auth = AuthConfig {
        access_token: Some(access_token.to_string()),
        user_email: user_email.map(|s| s.to_string()),
        expires_at: expires_in_secs.map(|secs| now_secs() + secs),
    };
}

/// Load the config file at `path` for rewriting, or start from defaults
fn load_for_update(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    read_config_file(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Save a token to the config file at `path`, keeping its other sections
pub fn save_credentials(
    path: &Path,
    access_token: &str,
    user_email: Option<&str>,
    expires_in_secs: Option<u64>,
) -> Result<()> {
    let mut config = load_for_update(path)?;
    store_token(&mut config, access_token, user_email, expires_in_secs);
    write_config_file(path, &config).context("failed to save credentials")?;
    Ok(())
}

/// Get the access token to use for API calls
pub fn get_access_token(auth: &AuthConfig) -> Option<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            return Some(token);
        }
    }
    stored_token(auth, now_secs())
}

/// The stored token, if present and not expired at `now`
fn stored_token(auth: &AuthConfig, now: u64) -> Option<String> {
    if let Some(expires_at) = auth.expires_at {
        if now > expires_at {
            return None;
        }
    }
    auth.access_token.clone()
}

/// Clear the stored token (logout)
pub fn clear_credentials(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let mut config = load_for_update(path)?;
    config.auth = AuthConfig::default();
    write_config_file(path, &config).context("failed to clear credentials")?;
    Ok(())
}

/// Authentication status of the stored token
#[derive(Debug, PartialEq, Eq)]
pub enum AuthStatus {
    NotAuthenticated,
    Expired,
    Authenticated {
        email: Option<String>,
        expires_at: Option<u64>,
    },
}

/// Get authentication status of the stored token
pub fn get_auth_status(auth: &AuthConfig) -> AuthStatus {
    auth_status_at(auth, now_secs())
}

fn auth_status_at(auth: &AuthConfig, now: u64) -> AuthStatus {
    match &auth.access_token {
        None => AuthStatus::NotAuthenticated,
        Some(_) => match auth.expires_at {
            Some(expires_at) if now > expires_at => AuthStatus::Expired,
            expires_at => AuthStatus::Authenticated {
                email: auth.user_email.clone(),
                expires_at,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_token_sets_expiry() {
        let mut config = Config::default();
        store_token(&mut config, "tok", Some("dev@example.com"), Some(60));

        assert_eq!(config.auth.access_token.as_deref(), Some("tok"));
        assert_eq!(config.auth.user_email.as_deref(), Some("dev@example.com"));
        assert!(config.auth.expires_at.unwrap() >= now_secs());
    }

    #[test]
    fn test_expired_token_is_not_used() {
        let auth = AuthConfig {
            access_token: Some("old".to_string()),
            user_email: None,
            expires_at: Some(100),
        };
        assert_eq!(stored_token(&auth, 50), Some("old".to_string()));
        assert_eq!(stored_token(&auth, 101), None);
    }

    #[test]
    fn test_save_and_clear_keep_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("infractl.toml");
        std::fs::write(&path, "[api]\nurl = \"https://api.example.com\"\n").unwrap();

        save_credentials(&path, "tok", Some("dev@example.com"), None).unwrap();
        let config = read_config_file(&path).unwrap();
        assert_eq!(config.api.url, "https://api.example.com");
        assert_eq!(config.auth.access_token.as_deref(), Some("tok"));
        assert_eq!(config.auth.expires_at, None);

        clear_credentials(&path).unwrap();
        let config = read_config_file(&path).unwrap();
        assert_eq!(config.api.url, "https://api.example.com");
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn test_clear_without_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        clear_credentials(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            auth_status_at(&AuthConfig::default(), 0),
            AuthStatus::NotAuthenticated
        );

        let auth = AuthConfig {
            access_token: Some("tok".to_string()),
            user_email: Some("a@b.c".to_string()),
            expires_at: Some(10),
        };
        assert_eq!(auth_status_at(&auth, 11), AuthStatus::Expired);
        assert_eq!(
            auth_status_at(&auth, 5),
            AuthStatus::Authenticated {
                email: Some("a@b.c".to_string()),
                expires_at: Some(10)
            }
        );
    }
}
