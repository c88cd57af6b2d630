mod key_event;
mod lock;
mod service;

pub use {
    key_event::{KEY_CAPTURE_EVENT, KeyEvent},
    lock::{CaptureLock, CaptureLockGuard},
    service::CaptureService,
};
