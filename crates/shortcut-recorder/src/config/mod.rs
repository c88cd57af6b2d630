mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod notification_config;
mod storage_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, notification_config::NotificationConfig,
    storage_config::StorageConfig,
};

pub(crate) const DEFAULT_DESKTOP_NOTIFICATIONS: bool = false;

pub(crate) fn default_cancel_key() -> String {
    shortcut_recorder_core::DEFAULT_CANCEL_KEY.to_string()
}

pub(crate) fn default_desktop_notifications() -> bool {
    DEFAULT_DESKTOP_NOTIFICATIONS
}
