use crate::user_notifier::format_notification;

use shortcut_recorder_core::Notification;

/// WHAT: Console lines carry level, message and description
/// WHY: Restore failures must be distinguishable from ordinary errors
#[test]
fn given_notifications_when_formatting_then_level_and_description_shown() {
    let error = Notification::error("Couldn't set shortcut to Ctrl+R")
        .with_description("Ctrl+R is already assigned to paste_last");
    let critical = Notification::critical("Couldn't restore shortcut Ctrl+Shift+R");
    let retry = Notification::error("Couldn't start recording a shortcut").retryable();

    assert_eq!(
        format_notification(&error),
        "[error] Couldn't set shortcut to Ctrl+R: Ctrl+R is already assigned to paste_last"
    );
    assert_eq!(
        format_notification(&critical),
        "[CRITICAL] Couldn't restore shortcut Ctrl+Shift+R"
    );
    assert!(format_notification(&retry).ends_with("(try again)"));
}
