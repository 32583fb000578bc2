pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".infractl.toml";

/// Environment variable overriding `[api] url`
pub const API_URL_ENV: &str = "INFRACTL_API_URL";

/// Get the global config file path (~/.infractl.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Load configuration
///
/// An explicit `--config` file must exist and parse. Without one, the global
/// config is used if present; a broken global file falls back to defaults.
/// `INFRACTL_API_URL` overrides the configured API URL either way.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    let mut config = match explicit {
        Some(path) => read_config_file(path)?,
        None => match global_config_path() {
            Some(global) if global.exists() => read_config_file(&global).unwrap_or_else(|e| {
                log::warn!("Ignoring config at {}: {}", global.display(), e);
                types::Config::default()
            }),
            _ => types::Config::default(),
        },
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            log::debug!("Using API URL from {}", API_URL_ENV);
            config.api.url = url;
        }
    }

    Ok(config)
}

/// Read and parse a single TOML config file
pub fn read_config_file(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    Ok(config)
}

/// Write a config to the given path
pub fn write_config_file(path: &Path, config: &types::Config) -> Result<()> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// The file settings are read from and written back to
pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(global_config_path().ok_or(ConfigError::NoHomeDirectory)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = types::Config::default();
        assert_eq!(config.api.url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.status.poll_interval_secs, 5);
        assert!(config.auth.access_token.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[status]\npoll_interval_secs = 2\n").unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.status.poll_interval_secs, 2);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let mut config = types::Config::default();
        config.api.url = "https://control.example.com".to_string();
        config.auth.access_token = Some("abc".to_string());

        write_config_file(&path, &config).unwrap();
        assert_eq!(read_config_file(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nurl = ").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_config_file_path_prefers_explicit() {
        let explicit = Path::new("/tmp/custom.toml");
        assert_eq!(config_file_path(Some(explicit)).unwrap(), explicit);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
