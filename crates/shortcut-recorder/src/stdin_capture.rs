//! Capture service fed by newline-delimited JSON on stdin.
//!
//! Each line is an envelope `{"channel": "...", "payload": ...}`. Key events
//! are only forwarded while capture is active; other channels (cancel, focus
//! loss, teardown) are always forwarded.

use shortcut_recorder_core::{
    CaptureService, CoreResult, EventBridge, KEY_CAPTURE_EVENT, OWNER_TEARDOWN_EVENT,
    RecorderError,
};

use std::{
    io::BufRead,
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use serde::Deserialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One line of input.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub(crate) channel: String,
    #[serde(default)]
    pub(crate) payload: Value,
}

/// Capture service whose "stream" is the process's stdin.
#[derive(Debug, Default)]
pub struct StdinCaptureService {
    active: AtomicBool,
}

impl StdinCaptureService {
    /// Create an inactive service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether key events are currently being forwarded.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

#[async_trait]
impl CaptureService for StdinCaptureService {
    async fn begin_capture(&self, shortcut_id: &str) -> CoreResult<()> {
        if self.active.swap(true, Ordering::AcqRel) {
            return Err(RecorderError::StartCapture {
                reason: "capture is already active".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(shortcut_id, "Key capture started");
        Ok(())
    }

    async fn end_capture(&self) -> CoreResult<()> {
        if self.active.swap(false, Ordering::AcqRel) {
            info!("Key capture stopped");
        }
        Ok(())
    }
}

/// Route one input line to the bridge. Returns whether it was delivered.
pub(crate) fn route_line(bridge: &EventBridge, capture: &StdinCaptureService, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }

    let envelope: Envelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed input line");
            return false;
        }
    };

    if envelope.channel == KEY_CAPTURE_EVENT && !capture.is_active() {
        debug!("Key event while capture inactive, dropped");
        return false;
    }

    bridge.emit(&envelope.channel, envelope.payload) > 0
}

/// Forward lines from `reader` to `bridge` on a blocking thread.
///
/// When the reader is exhausted the owner is gone, so the teardown signal is
/// emitted. Call this only after the session has subscribed; the bridge does
/// not buffer. For stdin the thread blocks in `read_line` and cannot be joined
/// early; it is cleaned up on process exit.
pub(crate) fn spawn_line_forwarder<R>(
    bridge: EventBridge,
    capture: Arc<StdinCaptureService>,
    reader: R,
) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    route_line(&bridge, &capture, &line);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break;
                }
            }
        }

        debug!("Input closed");
        bridge.emit(OWNER_TEARDOWN_EVENT, Value::Null);
    })
}
