// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-file persistence for the logged-in user.

use std::path::{Path, PathBuf};

use msgboard_config::model::SessionConfig;
use msgboard_core::{MsgboardError, Session, SessionStore};
use tracing::{debug, warn};

/// Stores the session as JSON at a fixed path. Logging out deletes the file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `session.path`, or `<config dir>/msgboard/session.json`.
    pub fn from_config(config: &SessionConfig) -> Result<Self, MsgboardError> {
        if let Some(path) = &config.path {
            return Ok(Self::new(path));
        }
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("msgboard").join("session.json")))
            .ok_or_else(|| {
                MsgboardError::Config(
                    "no config directory found; set session.path explicitly".to_string(),
                )
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Session, MsgboardError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::new()),
            Err(e) => {
                return Err(MsgboardError::Internal(format!(
                    "failed to read session file {}: {e}",
                    self.path.display()
                )));
            }
        };

        match serde_json::from_str(&content) {
            Ok(session) => Ok(session),
            Err(e) => {
                // An unreadable session just means logged out.
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
                Ok(Session::new())
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), MsgboardError> {
        if !session.is_logged_in() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(MsgboardError::Internal(format!(
                    "failed to remove session file {}: {e}",
                    self.path.display()
                ))),
            };
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MsgboardError::Internal(format!(
                    "failed to create session directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| MsgboardError::Internal(format!("failed to serialize session: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| {
            MsgboardError::Internal(format!(
                "failed to write session file {}: {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgboard_core::User;

    fn alice() -> User {
        User {
            id: Some("1".into()),
            username: "alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(!store.load().unwrap().is_logged_in());
    }

    #[test]
    fn login_survives_reload_and_logout_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSessionStore::new(&path);

        let mut session = Session::new();
        session.login(alice());
        store.save(&session).unwrap();
        assert!(path.exists());

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.current().map(|u| u.username.as_str()), Some("alice"));

        let mut session = reloaded;
        session.logout();
        store.save(&session).unwrap();
        assert!(!path.exists());

        // Logging out twice is fine.
        store.save(&session).unwrap();
    }

    #[test]
    fn corrupt_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(!store.load().unwrap().is_logged_in());
    }

    #[test]
    fn configured_path_wins() {
        let config = SessionConfig {
            path: Some("/tmp/custom-session.json".into()),
        };
        let store = FileSessionStore::from_config(&config).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/custom-session.json"));
    }
}
