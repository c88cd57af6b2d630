use crate::{CoreResult, RecorderError};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Process-wide exclusivity for the capture stream.
///
/// Clone one lock into every session that shares a capture service. A session
/// holds the guard from before begin-capture until it returns to `Idle`.
#[derive(Debug, Clone, Default)]
pub struct CaptureLock {
    inner: Arc<Mutex<()>>,
}

/// Proof that the holder owns the capture stream. Released on drop.
#[derive(Debug)]
pub struct CaptureLockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl CaptureLock {
    /// Create an unheld lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::CaptureBusy`] if another session holds it.
    #[track_caller]
    pub fn try_acquire(&self) -> CoreResult<CaptureLockGuard> {
        let guard = Arc::clone(&self.inner)
            .try_lock_owned()
            .map_err(|_| RecorderError::CaptureBusy {
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(CaptureLockGuard { _guard: guard })
    }

    /// Whether some session currently holds the lock.
    pub fn is_held(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}
