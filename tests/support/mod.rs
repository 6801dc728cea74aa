//! Shared helpers for integration tests.

use std::sync::{Arc, Mutex, Once};

use docbridge::{
    ApiConfig, CredentialStore, MemoryCredentialStore, Navigator, Notification,
    NotificationChannel, Subscription, Transport,
};

static TRACING: Once = Once::new();

/// Installs a log subscriber once per test binary; filter via `RUST_LOG`.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Navigator test double: tracks the current path and records navigations.
pub struct RecordingNavigator {
    current: Mutex<String>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn navigate_to(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
        *self.current.lock().unwrap() = path.to_string();
    }
}

/// A transport wired to test doubles, with handles to observe side effects.
pub struct Harness {
    pub transport: Transport,
    pub store: Arc<MemoryCredentialStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifications: Arc<Mutex<Vec<Notification>>>,
    // Kept alive so the collector stays subscribed for the test's duration.
    #[allow(dead_code)]
    subscription: Subscription,
}

impl Harness {
    pub fn new(base_url: &str) -> Self {
        init_tracing();
        let store = Arc::new(MemoryCredentialStore::new());
        let navigator = Arc::new(RecordingNavigator::at("/documents"));
        let channel = NotificationChannel::new();

        let notifications = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&notifications);
        let subscription = channel.subscribe(move |notification| {
            sink.lock().unwrap().push(notification.clone());
        });

        let transport = Transport::new(
            ApiConfig::new(base_url),
            Arc::clone(&store) as Arc<dyn CredentialStore>,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            channel,
        );

        Self {
            transport,
            store,
            navigator,
            notifications,
            subscription,
        }
    }

    pub fn notification_messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }
}
