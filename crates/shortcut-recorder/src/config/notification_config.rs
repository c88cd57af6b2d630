use crate::config::default_desktop_notifications;

use serde::{Deserialize, Serialize};

/// User notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Also raise desktop notifications (console output is always on).
    #[serde(default = "default_desktop_notifications")]
    pub desktop: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            desktop: default_desktop_notifications(),
        }
    }
}
