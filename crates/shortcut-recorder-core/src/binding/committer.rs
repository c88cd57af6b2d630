use crate::{BindingStore, Chord, CommitError};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Applies chords to the binding store.
///
/// Validates the chord, rejects chords already held by another shortcut and
/// writes the canonical form. Performs no retries and no rollback; callers
/// orchestrate restoration themselves.
#[derive(Clone)]
pub struct BindingCommitter {
    store: Arc<dyn BindingStore>,
}

impl BindingCommitter {
    /// Create a committer writing to `store`.
    pub fn new(store: Arc<dyn BindingStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn BindingStore> {
        &self.store
    }

    /// Persist `chord` as the binding for `shortcut_id`.
    ///
    /// # Errors
    ///
    /// - [`CommitError::InvalidChord`] if the chord does not parse.
    /// - [`CommitError::UnknownShortcut`] if the shortcut does not exist.
    /// - [`CommitError::Conflict`] if another shortcut holds the same chord.
    /// - [`CommitError::Backend`] if the store fails.
    #[instrument(skip(self))]
    pub async fn apply(&self, shortcut_id: &str, chord: &str) -> Result<(), CommitError> {
        let parsed = Chord::parse(chord)?;
        let canonical = parsed.to_string();

        let bindings = self.store.bindings().await?;

        if !bindings.contains_key(shortcut_id) {
            return Err(CommitError::UnknownShortcut {
                shortcut_id: shortcut_id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let conflict = bindings.values().find(|binding| {
            binding.id != shortcut_id
                && Chord::parse(&binding.current_binding).is_ok_and(|existing| existing == parsed)
        });

        if let Some(other) = conflict {
            return Err(CommitError::Conflict {
                chord: canonical,
                conflicting_id: other.id.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.store.write_binding(shortcut_id, &canonical).await?;

        info!(shortcut_id, chord = %canonical, "Binding applied");

        Ok(())
    }

    /// Write a previously stored chord back for `shortcut_id` as-is.
    ///
    /// The chord came out of the store, so it is not re-validated and not
    /// checked for conflicts. A hand-edited or legacy value is put back
    /// exactly as it was found.
    ///
    /// # Errors
    ///
    /// - [`CommitError::UnknownShortcut`] or [`CommitError::Backend`] from the store.
    #[instrument(skip(self))]
    pub async fn restore(&self, shortcut_id: &str, chord: &str) -> Result<(), CommitError> {
        self.store.write_binding(shortcut_id, chord).await?;

        info!(shortcut_id, chord, "Binding restored");

        Ok(())
    }
}
