//! Credential storage surface.
//!
//! The transport only ever reads and clears credentials; minting them is the
//! job of whatever drives the login flow. Storage itself is external — a
//! synchronous key-value store injected behind [`CredentialStore`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Key holding the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key holding the anti-forgery token attached to mutating requests.
pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Key holding the cached user profile. Cleared together with the tokens on
/// session invalidation, never read by this crate.
pub const USER_PROFILE_KEY: &str = "user_profile";

/// Synchronous key-value store for session credentials.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Snapshot of the tokens the outbound stage attaches to a request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    pub access_token: Option<String>,
    pub csrf_token: Option<String>,
}

impl CredentialSet {
    /// Reads the current tokens from the store.
    #[must_use]
    pub fn load(store: &dyn CredentialStore) -> Self {
        Self {
            access_token: store.get(ACCESS_TOKEN_KEY),
            csrf_token: store.get(CSRF_TOKEN_KEY),
        }
    }
}

// Token values are sensitive — Debug shows presence only.
impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("access_token", &redact(self.access_token.as_deref()))
            .field("csrf_token", &redact(self.csrf_token.as_deref()))
            .finish()
    }
}

fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(_) => "[REDACTED]",
        None => "[ABSENT]",
    }
}

/// Clears every session credential key. The three keys are independent in the
/// store but always cleared together.
pub fn clear_session(store: &dyn CredentialStore) {
    store.remove(ACCESS_TOKEN_KEY);
    store.remove(CSRF_TOKEN_KEY);
    store.remove(USER_PROFILE_KEY);
}

/// In-memory [`CredentialStore`] for embeddings without a platform store, and
/// for tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("MemoryCredentialStore")
            .field("entries", &count)
            .finish()
    }
}
