//! Local user persistence.
//!
//! Keeps the logged-in user across restarts, in the platform-specific config
//! directory by default:
//! - Linux: ~/.config/wiki-client/session.json
//! - macOS: ~/Library/Application Support/wiki-client/session.json
//! - Windows: %APPDATA%/wiki-client/session.json

use std::path::{Path, PathBuf};

use tokio::fs;
use wiki_domain::LocalUser;

/// Error type for session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The session file is not valid JSON for a local user.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Repository storing the local user as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    path: Option<PathBuf>,
}

impl SessionRepository {
    /// Creates a repository using the default location.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: dirs::config_dir().map(|p| p.join("wiki-client").join("session.json")),
        }
    }

    /// Creates a repository backed by an explicit file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns where the session is stored, if a location is known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads the stored user.
    ///
    /// Returns `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Option<LocalUser>, SessionError> {
        let Some(path) = self.path() else {
            return Ok(None);
        };

        if !fs::try_exists(path).await? {
            return Ok(None);
        }

        let content = fs::read(path).await?;
        Ok(Some(serde_json::from_slice(&content)?))
    }

    /// Saves `user`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no location is known or the write fails.
    pub async fn save(&self, user: &LocalUser) -> Result<(), SessionError> {
        let path = self.path().ok_or(SessionError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut content = serde_json::to_vec_pretty(user)?;
        content.push(b'\n');
        fs::write(path, content).await?;
        Ok(())
    }

    /// Deletes the stored user. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn default_path_ends_with_session_file() {
        if let Some(path) = SessionRepository::new().path() {
            assert!(path.ends_with("wiki-client/session.json"));
        }
    }

    #[tokio::test]
    async fn load_returns_none_when_no_file() {
        let dir = tempdir().expect("temp dir");
        let repo = SessionRepository::at(dir.path().join("session.json"));
        assert_eq!(repo.load().await.expect("load works"), None);
    }

    #[tokio::test]
    async fn save_then_load_restores_user() {
        let dir = tempdir().expect("temp dir");
        let repo = SessionRepository::at(dir.path().join("nested").join("session.json"));
        let user = LocalUser {
            id: Some(42),
            login_name: "song".into(),
            name: "Song".into(),
            token: Some("abc123".into()),
        };

        repo.save(&user).await.expect("save works");
        let raw = std::fs::read_to_string(dir.path().join("nested/session.json")).expect("file");

        assert!(raw.ends_with('\n'));
        assert!(raw.contains("  \"login_name\": \"song\""));
        assert_eq!(repo.load().await.expect("load works"), Some(user));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempdir().expect("temp dir");
        let repo = SessionRepository::at(dir.path().join("session.json"));
        repo.save(&LocalUser::with_token("song", "t")).await.expect("save works");

        repo.clear().await.expect("first clear");
        repo.clear().await.expect("second clear");
        assert_eq!(repo.load().await.expect("load works"), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write");

        let result = SessionRepository::at(path).load().await;
        assert!(matches!(result, Err(SessionError::Serialization(_))));
    }
}
