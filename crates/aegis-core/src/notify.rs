//! User-visible notifications

/// A browser notification. The coordinator raises these for best-effort
/// failures that have no reply channel to report into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
}

impl Notification {
    /// Raised when the bridge cannot be injected into a tab, whether the
    /// restriction was detected proactively or from the injection error.
    pub fn inject_error() -> Self {
        Self {
            id: "inject-error".to_string(),
            title: "Injecting content script error".to_string(),
            message: "You cannot inject script here!".to_string(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that only logs. Useful where no notification surface exists.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            id = %notification.id,
            title = %notification.title,
            message = %notification.message,
            "Notification"
        );
    }
}
