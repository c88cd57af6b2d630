//! Shortcut Recorder Core Library
//!
//! Records a new keyboard chord for a shortcut by listening to a key capture
//! stream, shows the chord live while it is held, and commits it to a binding
//! store on release. Cancel, focus loss and teardown all return the session to
//! `Idle` with the capture stream released; cancel and failed commits write
//! the original chord back.
//!
//! # Example
//!
//! ```no_run
//! use shortcut_recorder_core::{
//!     Binding, CaptureService, CoreResult, EventBridge, KEY_CAPTURE_EVENT, KeyEvent,
//!     LogNotifier, MemoryBindingStore, RecordingSession,
//! };
//!
//! use std::sync::Arc;
//!
//! struct NoopCapture;
//!
//! #[async_trait::async_trait]
//! impl CaptureService for NoopCapture {
//!     async fn begin_capture(&self, _shortcut_id: &str) -> CoreResult<()> {
//!         Ok(())
//!     }
//!     async fn end_capture(&self) -> CoreResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn demo() -> CoreResult<()> {
//! let store = MemoryBindingStore::new([Binding::new("toggle_recording", "Ctrl+Shift+R", "Toggle")]);
//! let bridge = EventBridge::new();
//! let mut session = RecordingSession::new(
//!     Arc::new(NoopCapture),
//!     Arc::new(store.clone()),
//!     Arc::new(LogNotifier),
//!     bridge.clone(),
//! );
//!
//! session.start("toggle_recording").await?;
//! bridge.emit_event(KEY_CAPTURE_EVENT, &KeyEvent::down("Ctrl+R"))?;
//! bridge.emit_event(KEY_CAPTURE_EVENT, &KeyEvent::up())?;
//! session.process_pending().await;
//!
//! assert_eq!(store.chord("toggle_recording").as_deref(), Some("Ctrl+R"));
//! # Ok(())
//! # }
//! ```

mod binding;
mod bridge;
mod capture;
mod error;
mod notify;
mod session;

pub(crate) use session::{CancellationTriggers, SessionInput, TaggedInput};

pub use {
    binding::{Binding, BindingCommitter, BindingStore, Chord, MemoryBindingStore, Modifier},
    bridge::{Disposer, EventBridge},
    capture::{CaptureLock, CaptureLockGuard, CaptureService, KEY_CAPTURE_EVENT, KeyEvent},
    error::{CommitError, RecorderError, Result as CoreResult},
    notify::{LogNotifier, Notification, NotificationLevel, Notifier},
    session::{
        CANCEL_REQUESTED_EVENT, CancelReason, DEFAULT_CANCEL_KEY, FOCUS_LOST_EVENT,
        OWNER_TEARDOWN_EVENT, RecordingSession, RecordingState, SessionOutcome,
    },
};

#[cfg(test)]
mod tests;
