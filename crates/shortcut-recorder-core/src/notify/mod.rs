mod notification;

pub use notification::{LogNotifier, Notification, NotificationLevel, Notifier};
