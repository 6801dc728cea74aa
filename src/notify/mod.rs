//! In-process notification bus decoupling status-message producers from the
//! single rendering surface.
//!
//! Producers publish [`Notification`]s; the renderer subscribes once per
//! application root. Publishing is synchronous fan-out over a snapshot of the
//! subscribers registered when the call started, so a handler that subscribes
//! another handler never causes the newcomer to see the in-flight message.

mod dedup;

pub use dedup::{DEDUP_WINDOW, DedupKey, NotificationDeduplicator};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tracing::warn;

/// Default banner display duration.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// Severity of a user-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// An ephemeral user-facing status message.
///
/// Created by any producer, consumed exactly once by the renderer, and
/// destroyed after its duration elapses or on manual dismissal. Never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

struct Subscriber {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct ChannelInner {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

/// Publish/subscribe bus for user-facing status messages.
///
/// Cloning is cheap and shares the subscriber list; construct one per
/// application root and hand clones to producers and the renderer.
#[derive(Clone, Default)]
pub struct NotificationChannel {
    inner: Arc<ChannelInner>,
}

impl NotificationChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers the notification synchronously to every subscriber registered
    /// at the start of the call, in registration order.
    ///
    /// Never panics: a panicking handler is isolated and logged, and delivery
    /// continues with the remaining subscribers.
    pub fn publish(&self, notification: &Notification) {
        let snapshot: Vec<Handler> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|subscriber| Arc::clone(&subscriber.handler))
            .collect();

        for handler in snapshot {
            if catch_unwind(AssertUnwindSafe(|| handler(notification))).is_err() {
                warn!(message = %notification.message, "notification handler panicked");
            }
        }
    }

    /// Registers a handler and returns a capability that removes exactly that
    /// handler. Calling [`Subscription::unsubscribe`] twice is a no-op.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                id,
                handler: Arc::new(handler),
            });
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
            active: AtomicBool::new(true),
        }
    }
}

/// Capability returned by [`NotificationChannel::subscribe`].
///
/// Dropping the subscription does NOT unsubscribe; removal is explicit.
pub struct Subscription {
    inner: Weak<ChannelInner>,
    id: u64,
    active: AtomicBool,
}

impl Subscription {
    /// Removes the associated handler. Idempotent.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|subscriber| subscriber.id != self.id);
        }
    }
}
