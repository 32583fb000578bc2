//! Project selection state
//!
//! Remembers the project the user selected with `infractl project use` across
//! CLI invocations. Stored in `~/.infractl/session.json`. Commands never read
//! this file directly: `main` resolves it into a [`ProjectContext`] that is
//! passed down explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persisted project selection
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProjectSession {
    /// Selected project id
    pub project_id: Option<u64>,
    /// Human-readable project name
    pub project_name: Option<String>,
    /// When the session was last updated
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProjectSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with a selected project
    pub fn with_project(project_id: u64, project_name: Option<String>) -> Self {
        Self {
            project_id: Some(project_id),
            project_name,
            last_updated: Some(Utc::now()),
        }
    }

    /// Clears the selected project
    pub fn clear(&mut self) {
        self.project_id = None;
        self.project_name = None;
        self.last_updated = Some(Utc::now());
    }

    pub fn is_project_selected(&self) -> bool {
        self.project_id.is_some()
    }

    /// Returns the path to the session file
    ///
    /// Location: `~/.infractl/session.json`
    pub fn session_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".infractl")
            .join("session.json")
    }

    /// Load the session from the default location
    pub fn load() -> io::Result<Self> {
        Self::load_from(&Self::session_path())
    }

    /// Load a session file, returning an empty session if it doesn't exist
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save the session to the default location
    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::session_path())
    }

    /// Save the session, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Returns a display string for the current selection
    pub fn display_context(&self) -> String {
        match (self.project_id, &self.project_name) {
            (Some(id), Some(name)) => format!("[{} #{}]", name, id),
            (Some(id), None) => format!("[project #{}]", id),
            _ => "[no project selected]".to_string(),
        }
    }
}

/// The project a command operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectContext {
    pub project_id: u64,
}

impl ProjectContext {
    /// Resolve the project from an explicit `--project` flag, falling back to
    /// the persisted selection
    pub fn resolve(flag: Option<u64>, session: &ProjectSession) -> Option<Self> {
        flag.or(session.project_id)
            .map(|project_id| ProjectContext { project_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_session_is_empty() {
        let session = ProjectSession::new();
        assert!(!session.is_project_selected());
        assert_eq!(session.display_context(), "[no project selected]");
    }

    #[test]
    fn test_with_project_and_clear() {
        let mut session = ProjectSession::with_project(12, Some("staging".to_string()));
        assert!(session.is_project_selected());
        assert_eq!(session.display_context(), "[staging #12]");

        session.clear();
        assert!(!session.is_project_selected());
        assert!(session.last_updated.is_some());
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        let session = ProjectSession::with_project(5, None);
        session.save_to(&path).unwrap();

        let loaded = ProjectSession::load_from(&path).unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.display_context(), "[project #5]");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp_dir = tempdir().unwrap();
        let loaded = ProjectSession::load_from(&temp_dir.path().join("absent.json")).unwrap();
        assert!(!loaded.is_project_selected());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        let err = ProjectSession::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_context_prefers_flag() {
        let session = ProjectSession::with_project(3, None);
        assert_eq!(
            ProjectContext::resolve(Some(9), &session),
            Some(ProjectContext { project_id: 9 })
        );
        assert_eq!(
            ProjectContext::resolve(None, &session),
            Some(ProjectContext { project_id: 3 })
        );
        assert_eq!(ProjectContext::resolve(None, &ProjectSession::new()), None);
    }
}
