//! Console and desktop notifications.

use shortcut_recorder_core::{Notification, NotificationLevel, Notifier};

use tracing::{debug, warn};

/// Prints notifications to stderr and optionally raises desktop notifications.
#[derive(Debug, Clone, Copy)]
pub struct UserNotifier {
    desktop: bool,
}

impl UserNotifier {
    /// Create a notifier. `desktop` enables desktop notifications.
    pub fn new(desktop: bool) -> Self {
        Self { desktop }
    }
}

pub(crate) fn format_notification(notification: &Notification) -> String {
    let prefix = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Error => "error",
        NotificationLevel::Critical => "CRITICAL",
    };

    let mut line = format!("[{prefix}] {}", notification.message);
    if let Some(description) = &notification.description {
        line.push_str(": ");
        line.push_str(description);
    }
    if notification.retryable {
        line.push_str(" (try again)");
    }
    line
}

impl Notifier for UserNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", format_notification(&notification));

        if !self.desktop {
            return;
        }

        let mut desktop = notify_rust::Notification::new();
        desktop.summary(&notification.message);
        if let Some(description) = &notification.description {
            desktop.body(description);
        }

        match desktop.show() {
            Ok(_) => debug!("Desktop notification shown"),
            Err(e) => warn!(error = %e, "Desktop notification failed"),
        }
    }
}
