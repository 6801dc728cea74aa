//! Outbound stage: augments a request with auth and anti-forgery headers.
//!
//! Pure with respect to business data — reads the credential snapshot, writes
//! request headers, never inspects or buffers the body.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};

use super::context::is_mutating;
use crate::credentials::CredentialSet;

/// Header carrying the anti-forgery token on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Attaches `Authorization: Bearer` when an access token is present, and the
/// CSRF header when the method is mutating and a CSRF token is present.
pub(crate) fn augment_request(
    mut builder: RequestBuilder,
    method: &Method,
    credentials: &CredentialSet,
) -> RequestBuilder {
    if let Some(token) = &credentials.access_token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if is_mutating(method) {
        if let Some(token) = &credentials.csrf_token {
            builder = builder.header(CSRF_HEADER, token.as_str());
        }
    }
    builder
}
