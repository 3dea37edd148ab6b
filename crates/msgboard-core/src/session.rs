// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit current-user context.
//!
//! A [`Session`] is owned by whoever drives the client and handed to the code
//! that needs it. Persistence goes through a [`SessionStore`] supplied by the
//! caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MsgboardError;
use crate::types::User;

/// The logged-in user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any current user with `user`.
    pub fn login(&mut self, user: User) {
        debug!(username = %user.username, "session login");
        self.user = Some(user);
    }

    /// Clears the current user, returning it.
    pub fn logout(&mut self) -> Option<User> {
        let previous = self.user.take();
        if let Some(ref user) = previous {
            debug!(username = %user.username, "session logout");
        }
        previous
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Returns the current user or an [`MsgboardError::Unauthenticated`] for `context`.
    pub fn require_user(&self, context: &str) -> Result<&User, MsgboardError> {
        self.user.as_ref().ok_or_else(|| MsgboardError::Unauthenticated {
            context: context.to_string(),
        })
    }
}

/// Loads and saves a [`Session`] between runs.
pub trait SessionStore {
    /// Returns the saved session, or an empty one if nothing was saved.
    fn load(&self) -> Result<Session, MsgboardError>;

    fn save(&self, session: &Session) -> Result<(), MsgboardError>;
}

/// Keeps the session in memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: std::sync::Mutex<Session>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Session, MsgboardError> {
        self.inner
            .lock()
            .map(|s| s.clone())
            .map_err(|e| MsgboardError::Internal(format!("session lock poisoned: {e}")))
    }

    fn save(&self, session: &Session) -> Result<(), MsgboardError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| MsgboardError::Internal(format!("session lock poisoned: {e}")))?;
        *guard = session.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn alice() -> User {
        User {
            id: Some("1".into()),
            username: "alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn login_then_logout() {
        let mut session = Session::new();
        assert!(!session.is_logged_in());

        session.login(alice());
        assert!(session.is_logged_in());
        assert_eq!(session.current().map(|u| u.username.as_str()), Some("alice"));

        let previous = session.logout();
        assert_eq!(previous, Some(alice()));
        assert!(session.current().is_none());
        assert_eq!(session.logout(), None);
    }

    #[test]
    fn require_user_without_login_is_unauthenticated() {
        let session = Session::new();
        let err = session.require_user("Failed to create message").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert_eq!(err.to_string(), "Failed to create message: please log in first");
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemorySessionStore::default();
        assert!(!store.load().unwrap().is_logged_in());

        let mut session = Session::new();
        session.login(alice());
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), session);
    }
}
