use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures raised while applying a chord to the binding store.
///
/// The committer never retries and never rolls back; the session decides what
/// to do with each variant.
#[derive(Error, Debug)]
pub enum CommitError {
    /// The chord string is not a well-formed key combination.
    #[error("Invalid chord {chord:?}: {reason} {location}")]
    InvalidChord {
        /// The rejected chord as received.
        chord: String,
        /// Why the chord was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The chord is already bound to a different shortcut.
    #[error("Chord {chord} is already used by {conflicting_id} {location}")]
    Conflict {
        /// The canonical chord that collided.
        chord: String,
        /// Shortcut currently holding the chord.
        conflicting_id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No binding exists for the shortcut id.
    #[error("Unknown shortcut: {shortcut_id} {location}")]
    UnknownShortcut {
        /// The shortcut id that was looked up.
        shortcut_id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The settings store failed to read or persist.
    #[error("Binding store failure: {reason} {location}")]
    Backend {
        /// Description of the storage failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CommitError {
    /// One-line explanation suitable for a notification body.
    pub fn user_message(&self) -> String {
        match self {
            CommitError::InvalidChord { chord, reason, .. } => {
                format!("{chord} is not a valid shortcut: {reason}")
            }
            CommitError::Conflict {
                chord,
                conflicting_id,
                ..
            } => format!("{chord} is already assigned to {conflicting_id}"),
            CommitError::UnknownShortcut { shortcut_id, .. } => {
                format!("No shortcut named {shortcut_id}")
            }
            CommitError::Backend { reason, .. } => reason.clone(),
        }
    }
}

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// begin-capture failed; the session never entered `Recording`.
    #[error("Failed to start key capture: {reason} {location}")]
    StartCapture {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Another session already owns the capture stream.
    #[error("Key capture is already in use by another session {location}")]
    CaptureBusy {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// end-capture failed. Logged, never surfaced to the user.
    #[error("Failed to stop key capture: {reason} {location}")]
    EndCapture {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The new chord could not be committed.
    #[error("Failed to commit binding: {source} {location}")]
    Commit {
        /// The underlying commit failure.
        #[source]
        source: CommitError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Restoring the original chord failed after a failed commit or cancel.
    #[error("Failed to restore original binding: {source} {location}")]
    Restore {
        /// The underlying commit failure.
        #[source]
        source: CommitError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The event subscription could not be created or delivered bad data.
    #[error("Event subscription error: {reason} {location}")]
    Subscription {
        /// Description of the subscription failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading the settings store failed.
    #[error("Settings store error: {reason} {location}")]
    Store {
        /// Description of the store failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl RecorderError {
    /// Wrap a failed commit of the recorded chord.
    #[track_caller]
    pub fn commit(source: CommitError) -> Self {
        RecorderError::Commit {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Wrap a failed restoration of the original chord.
    #[track_caller]
    pub fn restore(source: CommitError) -> Self {
        RecorderError::Restore {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
