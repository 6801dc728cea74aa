//! Shared HTTP transport: one client plus two ordered interceptor stages.
//!
//! The outbound stage ([`outbound`]) attaches credentials before dispatch;
//! the inbound stage ([`inbound`]) classifies failures and drives the session
//! guard and the deduplicated notification path. In every failure branch the
//! error is re-raised to the caller after side effects, so callers retain
//! full information and may add local handling.

mod context;
mod error;
mod inbound;
mod outbound;

pub use context::RequestContext;
pub use error::{ApiError, GENERIC_FAILURE_MESSAGE};
pub use outbound::CSRF_HEADER;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::credentials::{CredentialSet, CredentialStore};
use crate::notify::{DedupKey, Notification, NotificationChannel, NotificationDeduplicator};
use crate::session::{Navigator, SessionGuard, SessionState};

/// Connect timeout for the shared client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Binary response payload with its filename metadata.
#[derive(Debug, Clone)]
pub struct BinaryPayload {
    pub bytes: Vec<u8>,
    /// Raw `Content-Disposition` header value, when the server sent one.
    pub content_disposition: Option<String>,
}

struct TransportInner {
    client: Client,
    config: ApiConfig,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    channel: NotificationChannel,
    // The only lock in the layer. Held briefly, never across await points,
    // and released before any notification publishes.
    dedup: Mutex<NotificationDeduplicator>,
    guard: SessionGuard,
}

/// The shared HTTP client instance.
///
/// Constructed once per application root; cloning shares the underlying
/// client, credential store, session guard, and notification state.
#[derive(Clone)]
pub struct Transport {
    inner: Arc<TransportInner>,
}

impl Transport {
    /// Creates the transport.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(
        config: ApiConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        channel: NotificationChannel,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("failed to build HTTP client with static configuration");
        let guard = SessionGuard::new(config.login_path.clone());
        Self {
            inner: Arc::new(TransportInner {
                client,
                config,
                credentials,
                navigator,
                channel,
                dedup: Mutex::new(NotificationDeduplicator::new()),
                guard,
            }),
        }
    }

    /// The notification channel producers and the renderer share.
    #[must_use]
    pub fn channel(&self) -> &NotificationChannel {
        &self.inner.channel
    }

    /// Current session lifecycle state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.inner.guard.state()
    }

    /// Returns a reference to the underlying reqwest client.
    ///
    /// This can be used for advanced operations not covered by this wrapper.
    #[must_use]
    pub fn inner_client(&self) -> &Client {
        &self.inner.client
    }

    /// Sends a request through both interceptor stages.
    ///
    /// On success the raw response flows back. On failure the inbound stage
    /// classifies, runs its side effects, and the error is returned to the
    /// caller unchanged in meaning.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for network failures, non-2xx statuses, and
    /// caller-driven cancellation.
    #[instrument(level = "debug", skip(self, ctx), fields(method = %ctx.resolved_method(), path = %ctx.path()))]
    pub async fn send(&self, ctx: RequestContext) -> Result<Response, ApiError> {
        let method = ctx.resolved_method();
        let url = self.inner.config.url_for(ctx.path());
        let snapshot = CredentialSet::load(self.inner.credentials.as_ref());

        let mut builder = self.inner.client.request(method.clone(), &url);
        if !ctx.query_params().is_empty() {
            builder = builder.query(ctx.query_params());
        }
        if let Some(body) = ctx.body() {
            builder = builder.json(body);
        }
        builder = outbound::augment_request(builder, &method, &snapshot);

        let outcome = match ctx.cancel() {
            Some(token) => {
                tokio::select! {
                    () = token.cancelled() => {
                        return Err(self.classify_and_report(None, None, None, true));
                    }
                    outcome = builder.send() => outcome,
                }
            }
            None => builder.send().await,
        };

        let response = match outcome {
            Ok(response) => response,
            Err(source) => {
                let message = source.to_string();
                return Err(self.classify_and_report(None, None, Some(&message), false));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(self.classify_and_report(Some(status.as_u16()), Some(&body), None, false))
    }

    /// Sends a request and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`send`](Self::send); a body that fails to
    /// decode surfaces as a generic failure without a notification.
    pub async fn send_json<T: DeserializeOwned>(&self, ctx: RequestContext) -> Result<T, ApiError> {
        let response = self.send(ctx).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::generic(None, source.to_string()))
    }

    /// Sends a request and buffers the binary response body together with its
    /// `Content-Disposition` header.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`send`](Self::send).
    pub async fn send_bytes(&self, ctx: RequestContext) -> Result<BinaryPayload, ApiError> {
        let response = self.send(ctx).await?;
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::generic(None, source.to_string()))?
            .to_vec();
        Ok(BinaryPayload {
            bytes,
            content_disposition,
        })
    }

    /// Applies inbound classification and its side effects, producing the
    /// error to re-raise.
    fn classify_and_report(
        &self,
        status: Option<u16>,
        body: Option<&str>,
        transport_error: Option<&str>,
        canceled: bool,
    ) -> ApiError {
        match inbound::classify_failure(status, body, transport_error, canceled) {
            inbound::Classification::Unauthorized { message } => {
                self.inner.guard.handle_unauthorized(
                    self.inner.credentials.as_ref(),
                    self.inner.navigator.as_ref(),
                    &self.inner.channel,
                );
                ApiError::unauthorized(message)
            }
            inbound::Classification::Canceled => {
                debug!("request canceled by caller; no notification");
                ApiError::Canceled
            }
            inbound::Classification::Generic { status, message } => {
                let key = DedupKey::new(status, &message);
                let suppressed = self
                    .inner
                    .dedup
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .should_suppress(&key, Instant::now());
                if suppressed {
                    debug!(%key, "duplicate failure notification suppressed");
                } else {
                    self.inner.channel.publish(&Notification::error(message.clone()));
                }
                ApiError::generic(status, message)
            }
        }
    }
}
