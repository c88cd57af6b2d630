use crate::{CancelReason, CoreResult, KeyEvent};

use uuid::Uuid;

/// Everything that can drive a recording session forward.
#[derive(Debug)]
pub(crate) enum SessionInput {
    /// A decoded key event, or a subscription failure.
    Key(CoreResult<KeyEvent>),
    /// Explicit cancel or focus loss.
    Cancel(CancelReason),
    /// The owner of the session is going away.
    Teardown,
}

/// Input stamped with the session it was produced for.
///
/// Inputs whose `session_id` no longer matches the active session are stale
/// and dropped.
#[derive(Debug)]
pub(crate) struct TaggedInput {
    pub(crate) session_id: Uuid,
    pub(crate) input: SessionInput,
}
