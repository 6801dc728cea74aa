//! docbridge — resilient client layer for a remote document-management service.
//!
//! All network traffic flows through one shared [`Transport`], which attaches
//! authentication and anti-forgery credentials on the way out and classifies
//! failures on the way in. User-visible failure reporting is decoupled from
//! callers through an in-process [`NotificationChannel`] with sliding-window
//! deduplication, and authentication failures trigger a single idempotent
//! session-invalidation transition (credential wipe plus login redirect).
//!
//! # Architecture
//!
//! - [`transport`] - shared HTTP client with outbound/inbound interceptor stages
//! - [`notify`] - pub/sub notification bus and duplicate suppression
//! - [`credentials`] - credential store surface (read/clear only)
//! - [`session`] - session guard: credential wipe + guarded login redirect
//! - [`download`] - Content-Disposition filename extraction and triggered saves
//! - [`documents`] - typed operations for the document resource

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod credentials;
pub mod documents;
pub mod download;
pub mod notify;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use config::ApiConfig;
pub use credentials::{
    ACCESS_TOKEN_KEY, CSRF_TOKEN_KEY, CredentialSet, CredentialStore, MemoryCredentialStore,
    USER_PROFILE_KEY,
};
pub use documents::{Document, DocumentFilters, DocumentPage, DocumentsApi};
pub use download::{
    DirectorySaveTarget, DownloadError, SaveTarget, extract_filename, trigger_download,
};
pub use notify::{
    DedupKey, Notification, NotificationChannel, NotificationDeduplicator, Severity, Subscription,
};
pub use session::{Navigator, SESSION_EXPIRED_MESSAGE, SessionGuard, SessionState};
pub use transport::{
    ApiError, BinaryPayload, CSRF_HEADER, GENERIC_FAILURE_MESSAGE, RequestContext, Transport,
};
