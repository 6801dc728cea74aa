//! Per-request configuration assembled by resource operations before dispatch.

use reqwest::Method;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Mutable per-call request description: method (defaulting to GET), path,
/// query parameters, optional JSON body, and an optional cancellation token.
///
/// Scoped to one request; consumed on dispatch.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    method: Option<String>,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    cancel: Option<CancellationToken>,
}

impl RequestContext {
    /// Creates a GET request context for the given path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Overrides the HTTP method. Normalized case-insensitively on dispatch;
    /// an unrecognized method falls back to GET.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches a caller-owned cancellation token. A request aborted through
    /// the token surfaces as [`ApiError::Canceled`](super::ApiError::Canceled).
    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub(crate) fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub(crate) fn cancel(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Resolves the effective method: trimmed, uppercased, defaulting to GET.
    #[must_use]
    pub fn resolved_method(&self) -> Method {
        match &self.method {
            Some(raw) => {
                let normalized = raw.trim().to_ascii_uppercase();
                Method::from_bytes(normalized.as_bytes()).unwrap_or(Method::GET)
            }
            None => Method::GET,
        }
    }
}

/// The mutating set that must carry the anti-forgery token.
pub(crate) fn is_mutating(method: &Method) -> bool {
    *method == Method::POST
        || *method == Method::PUT
        || *method == Method::PATCH
        || *method == Method::DELETE
}
