use crate::CoreResult;

use async_trait::async_trait;

/// Backend that owns the exclusive key capture stream.
///
/// While capture is active the service publishes
/// [`KeyEvent`](crate::KeyEvent)s on [`KEY_CAPTURE_EVENT`](crate::KEY_CAPTURE_EVENT).
#[async_trait]
pub trait CaptureService: Send + Sync {
    /// Start capturing raw key transitions for `shortcut_id`.
    async fn begin_capture(&self, shortcut_id: &str) -> CoreResult<()>;

    /// Stop capturing. Must be safe to call when no capture is active.
    async fn end_capture(&self) -> CoreResult<()>;
}
