mod input;
mod recording_state;
#[allow(clippy::module_inception)]
mod session;
mod triggers;

pub(crate) use {
    input::{SessionInput, TaggedInput},
    triggers::CancellationTriggers,
};

pub use {
    recording_state::RecordingState,
    session::{DEFAULT_CANCEL_KEY, RecordingSession, SessionOutcome},
    triggers::{
        CANCEL_REQUESTED_EVENT, CancelReason, FOCUS_LOST_EVENT, OWNER_TEARDOWN_EVENT,
    },
};
