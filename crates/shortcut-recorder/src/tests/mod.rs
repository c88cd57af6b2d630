mod stdin_capture;
mod user_notifier;
