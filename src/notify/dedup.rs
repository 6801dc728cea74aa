//! Sliding-window suppression of repeated identical failure notifications.

use std::fmt;
use std::time::{Duration, Instant};

/// Sliding suppression window for repeated identical notifications.
pub const DEDUP_WINDOW: Duration = Duration::from_millis(3000);

/// Deduplication key: `(status code or "network") + ":" + message`.
///
/// Derived per failure and compared against the last delivered key; never
/// stored beyond the suppression window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupKey(String);

impl DedupKey {
    /// Builds a key from the response status code (or the literal `network`
    /// when no response was received) and the derived message.
    #[must_use]
    pub fn new(status: Option<u16>, message: &str) -> Self {
        match status {
            Some(code) => Self(format!("{code}:{message}")),
            None => Self(format!("network:{message}")),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last-delivered tracker implementing the sliding suppression window.
///
/// Duplicates rapid-fired inside the window are dropped entirely (not merged,
/// not queued); any notification with a different key is delivered
/// immediately regardless of window state.
#[derive(Debug, Default)]
pub struct NotificationDeduplicator {
    last_delivered: Option<(DedupKey, Instant)>,
}

impl NotificationDeduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the notification should be dropped.
    ///
    /// On a non-suppressed call the `(key, now)` pair is recorded before
    /// returning, so the first of a burst always wins and resets the window
    /// baseline for subsequent duplicates.
    pub fn should_suppress(&mut self, key: &DedupKey, now: Instant) -> bool {
        if let Some((last_key, delivered_at)) = &self.last_delivered {
            if last_key == key && now.duration_since(*delivered_at) < DEDUP_WINDOW {
                return true;
            }
        }
        self.last_delivered = Some((key.clone(), now));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_delivery_never_suppressed() {
        let mut dedup = NotificationDeduplicator::new();
        let key = DedupKey::new(Some(500), "boom");
        assert!(!dedup.should_suppress(&key, Instant::now()));
    }

    #[test]
    fn test_duplicate_inside_window_suppressed() {
        let mut dedup = NotificationDeduplicator::new();
        let key = DedupKey::new(Some(500), "boom");
        let start = Instant::now();
        assert!(!dedup.should_suppress(&key, start));
        assert!(dedup.should_suppress(&key, start + Duration::from_millis(100)));
        assert!(dedup.should_suppress(&key, start + Duration::from_millis(2999)));
    }

    #[test]
    fn test_duplicate_after_window_delivered() {
        let mut dedup = NotificationDeduplicator::new();
        let key = DedupKey::new(Some(500), "boom");
        let start = Instant::now();
        assert!(!dedup.should_suppress(&key, start));
        assert!(!dedup.should_suppress(&key, start + DEDUP_WINDOW));
    }

    #[test]
    fn test_window_baseline_is_first_delivery_not_last_attempt() {
        // Suppressed duplicates must not extend the window.
        let mut dedup = NotificationDeduplicator::new();
        let key = DedupKey::new(Some(500), "boom");
        let start = Instant::now();
        assert!(!dedup.should_suppress(&key, start));
        assert!(dedup.should_suppress(&key, start + Duration::from_millis(2000)));
        assert!(!dedup.should_suppress(&key, start + Duration::from_millis(3001)));
    }

    #[test]
    fn test_different_key_delivered_immediately() {
        let mut dedup = NotificationDeduplicator::new();
        let first = DedupKey::new(Some(500), "boom");
        let second = DedupKey::new(Some(404), "boom");
        let start = Instant::now();
        assert!(!dedup.should_suppress(&first, start));
        assert!(!dedup.should_suppress(&second, start + Duration::from_millis(1)));
    }

    #[test]
    fn test_different_key_resets_baseline() {
        // After a different key delivers, the original key delivers again even
        // though its first firing was moments ago.
        let mut dedup = NotificationDeduplicator::new();
        let first = DedupKey::new(Some(500), "boom");
        let second = DedupKey::new(None, "boom");
        let start = Instant::now();
        assert!(!dedup.should_suppress(&first, start));
        assert!(!dedup.should_suppress(&second, start + Duration::from_millis(10)));
        assert!(!dedup.should_suppress(&first, start + Duration::from_millis(20)));
    }

    #[test]
    fn test_key_distinguishes_network_from_status() {
        assert_ne!(
            DedupKey::new(None, "boom"),
            DedupKey::new(Some(500), "boom")
        );
        assert_eq!(DedupKey::new(None, "boom").to_string(), "network:boom");
        assert_eq!(DedupKey::new(Some(401), "x").to_string(), "401:x");
    }
}
