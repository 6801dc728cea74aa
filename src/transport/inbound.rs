//! Inbound stage: classifies a failed response.
//!
//! Runs only on failure (network error or non-2xx status), never on success.
//! The classification itself is pure; the transport applies the side effects
//! (session guard, deduplicated notification) and re-raises the failure.

use serde_json::Value;

use super::error::GENERIC_FAILURE_MESSAGE;

/// Tagged outcome of inbound classification, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classification {
    /// Status 401 — session invalid.
    Unauthorized { message: String },
    /// Caller-initiated abort, not a server response.
    Canceled,
    /// Everything else.
    Generic {
        status: Option<u16>,
        message: String,
    },
}

/// Classifies a failure from its observable parts.
pub(crate) fn classify_failure(
    status: Option<u16>,
    body: Option<&str>,
    transport_error: Option<&str>,
    canceled: bool,
) -> Classification {
    if status == Some(401) {
        return Classification::Unauthorized {
            message: derive_failure_message(body, transport_error),
        };
    }
    if canceled {
        return Classification::Canceled;
    }
    Classification::Generic {
        status,
        message: derive_failure_message(body, transport_error),
    }
}

/// Derives the human-readable failure message.
///
/// Precedence: non-empty response body as plain text, `detail` string field
/// of a structured (JSON object) body, the transport error's message, and
/// finally the fixed fallback.
pub(crate) fn derive_failure_message(
    body: Option<&str>,
    transport_error: Option<&str>,
) -> String {
    if let Some(raw) = body {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Object(fields)) => {
                    if let Some(Value::String(detail)) = fields.get("detail") {
                        if !detail.is_empty() {
                            return detail.clone();
                        }
                    }
                    // Structured body without a usable detail — fall through
                    // to the transport error / fallback.
                }
                // A JSON string body decodes to its contents.
                Ok(Value::String(text)) if !text.is_empty() => return text,
                // Anything non-JSON is a plain string body, used as-is.
                _ => return trimmed.to_string(),
            }
        }
    }

    if let Some(message) = transport_error {
        if !message.trim().is_empty() {
            return message.to_string();
        }
    }

    GENERIC_FAILURE_MESSAGE.to_string()
}
