//! Session invalidation: credential wipe plus a positionally guarded redirect.
//!
//! The guard fires on every Unauthorized classification. Idempotence under
//! concurrent 401s comes from the positional check — navigation is skipped
//! when the current location is already under the login path — not from a
//! one-shot latch.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::credentials::{self, CredentialStore};
use crate::notify::{Notification, NotificationChannel};

/// Fixed banner text published on session expiry.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";

/// Navigation surface: where the user currently is and how to move them.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate_to(&self, path: &str);
}

/// Observable session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Invalidated,
}

/// One-way session transition on authentication failure.
///
/// State is an atomic flag, so the transition runs on `&self` and may be
/// invoked concurrently. Notification handlers fired during the transition
/// can safely call back into [`state`](Self::state).
#[derive(Debug)]
pub struct SessionGuard {
    login_path: String,
    invalidated: AtomicBool,
}

impl SessionGuard {
    #[must_use]
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            invalidated: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.invalidated.load(Ordering::SeqCst) {
            SessionState::Invalidated
        } else {
            SessionState::Active
        }
    }

    /// Runs the full invalidation transition:
    ///
    /// 1. publishes the fixed session-expired warning,
    /// 2. unconditionally clears every persisted credential key,
    /// 3. redirects to the login surface unless the current location is
    ///    already under it.
    ///
    /// Re-fires on every Unauthorized classification; only the navigation is
    /// suppressed positionally, so two concurrent failures cannot
    /// double-navigate.
    pub fn handle_unauthorized(
        &self,
        store: &dyn CredentialStore,
        navigator: &dyn Navigator,
        channel: &NotificationChannel,
    ) {
        channel.publish(&Notification::warning(SESSION_EXPIRED_MESSAGE));
        credentials::clear_session(store);

        let current = navigator.current_path();
        if current.starts_with(&self.login_path) {
            debug!(path = %current, "already on login surface; skipping redirect");
        } else {
            warn!(from = %current, to = %self.login_path, "session invalidated; redirecting to login");
            navigator.navigate_to(&self.login_path);
        }

        self.invalidated.store(true, Ordering::SeqCst);
    }
}
