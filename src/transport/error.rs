//! Error taxonomy for the transport layer.

use thiserror::Error;

/// Fallback message when no better failure detail is available.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unexpected network error. Please try again.";

/// Failure classification surfaced to callers.
///
/// Every variant is returned *after* its side effects (session invalidation,
/// notification publishing) have already run, so callers only need local
/// bookkeeping — the conventional caller reaction is to rely on the
/// notification channel for user-visible reporting.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service rejected the session (HTTP 401). The credential wipe and
    /// login redirect have already been performed.
    #[error("unauthorized (HTTP 401): {message}")]
    Unauthorized { message: String },

    /// The caller aborted the request. Fully silent: never produces a
    /// notification.
    #[error("request canceled by caller")]
    Canceled,

    /// Any other failure. `status` is `None` when no response was received
    /// (connect failure, DNS, TLS, decode).
    #[error("request failed ({}): {message}", status_label(.status))]
    Generic {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn generic(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Generic {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status code associated with the failure, when one exists.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Canceled => None,
            Self::Generic { status, .. } => *status,
        }
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => "network".to_string(),
    }
}
