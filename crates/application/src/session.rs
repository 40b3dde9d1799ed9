//! In-memory session state.

use std::sync::Arc;

use parking_lot::RwLock;
use wiki_domain::LocalUser;

use crate::ports::SessionStore;

/// Shared holder of the logged-in user.
///
/// Clones share the same state, so the login flow and the request hook can
/// each keep their own handle.
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    user: Arc<RwLock<Option<LocalUser>>>,
}

impl LocalSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already holding `user`.
    #[must_use]
    pub fn with_user(user: LocalUser) -> Self {
        Self {
            user: Arc::new(RwLock::new(Some(user))),
        }
    }

    /// Replaces the logged-in user.
    pub fn set_local_user(&self, user: LocalUser) {
        *self.user.write() = Some(user);
    }

    /// Returns a copy of the logged-in user.
    #[must_use]
    pub fn local_user(&self) -> Option<LocalUser> {
        self.user.read().clone()
    }

    /// Forgets the logged-in user.
    pub fn clear(&self) -> Option<LocalUser> {
        self.user.write().take()
    }

    /// Returns true if a user with a usable token is present.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user
            .read()
            .as_ref()
            .is_some_and(|u| u.active_token().is_some())
    }
}

impl SessionStore for LocalSession {
    fn token(&self) -> Option<String> {
        self.user.read().as_ref().and_then(|u| u.token.clone())
    }
}
