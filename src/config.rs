//! Client configuration: API base URL and the login surface path.

use std::env;

/// Environment variable overriding the API base URL (development deployments).
pub const API_URL_ENV: &str = "DOCBRIDGE_API_URL";

/// Path of the login surface; the session guard never redirects when the
/// current location is already under this path.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Configuration for the shared transport.
///
/// The base URL is empty by default (same-origin deployment — every request
/// path is used as-is). Development and test embeddings either set
/// [`API_URL_ENV`] or construct the config directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix applied to every request path. Empty means relative requests.
    pub base_url: String,
    /// Redirect target on session invalidation.
    pub login_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl ApiConfig {
    /// Creates a config with an explicit base URL and the default login path.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Reads the base URL override from the environment, falling back to the
    /// same-origin default when the variable is unset or blank.
    #[must_use]
    pub fn from_env() -> Self {
        match env::var(API_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::default(),
        }
    }

    /// Joins a request path onto the base URL.
    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Strips trailing slashes so joining with absolute paths stays clean.
fn normalize_base_url(raw: String) -> String {
    raw.trim_end_matches('/').to_string()
}
