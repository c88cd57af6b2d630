use tracing::{error, info, warn};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Something failed but state is consistent.
    Error,
    /// State may be inconsistent and needs the user's attention.
    Critical,
}

/// A message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Short headline.
    pub message: String,
    /// Optional detail line.
    pub description: Option<String>,
    /// Whether offering a retry makes sense.
    pub retryable: bool,
}

impl Notification {
    /// Error-level notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            description: None,
            retryable: false,
        }
    }

    /// Critical notification for possibly inconsistent state.
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Critical,
            ..Self::error(message)
        }
    }

    /// Info-level notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            ..Self::error(message)
        }
    }

    /// Attach a detail line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the failure as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

/// Displays notifications to the user. Fire-and-forget.
pub trait Notifier: Send + Sync {
    /// Show `notification`.
    fn notify(&self, notification: Notification);
}

/// Notifier that only writes to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or_default();
        match notification.level {
            NotificationLevel::Info => info!(description, "{}", notification.message),
            NotificationLevel::Error => warn!(description, "{}", notification.message),
            NotificationLevel::Critical => error!(description, "{}", notification.message),
        }
    }
}
