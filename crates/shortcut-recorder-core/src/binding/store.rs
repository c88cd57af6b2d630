use crate::{Binding, CommitError};

use std::{
    collections::BTreeMap,
    panic::Location,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::debug;

/// The external settings store that owns every [`Binding`].
///
/// Implementations must be cheap to share behind an `Arc`; the recorder reads
/// the full map once per session and writes single chords through
/// [`BindingCommitter`](crate::BindingCommitter).
#[async_trait]
pub trait BindingStore: Send + Sync {
    /// Snapshot of every binding keyed by shortcut id.
    async fn bindings(&self) -> Result<BTreeMap<String, Binding>, CommitError>;

    /// Persist `chord` for `shortcut_id`.
    ///
    /// # Errors
    ///
    /// [`CommitError::UnknownShortcut`] if the id has no binding, or
    /// [`CommitError::Backend`] if persistence fails.
    async fn write_binding(&self, shortcut_id: &str, chord: &str) -> Result<(), CommitError>;
}

/// In-process binding store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBindingStore {
    bindings: Arc<Mutex<BTreeMap<String, Binding>>>,
}

impl MemoryBindingStore {
    /// Create a store seeded with `bindings`.
    pub fn new(bindings: impl IntoIterator<Item = Binding>) -> Self {
        let map = bindings
            .into_iter()
            .map(|binding| (binding.id.clone(), binding))
            .collect();

        Self {
            bindings: Arc::new(Mutex::new(map)),
        }
    }

    /// Current chord for `shortcut_id`, if the shortcut exists.
    pub fn chord(&self, shortcut_id: &str) -> Option<String> {
        self.lock()
            .get(shortcut_id)
            .map(|binding| binding.current_binding.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Binding>> {
        // A poisoned map is still a valid map.
        self.bindings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BindingStore for MemoryBindingStore {
    async fn bindings(&self) -> Result<BTreeMap<String, Binding>, CommitError> {
        Ok(self.lock().clone())
    }

    async fn write_binding(&self, shortcut_id: &str, chord: &str) -> Result<(), CommitError> {
        let mut bindings = self.lock();

        let binding = bindings
            .get_mut(shortcut_id)
            .ok_or_else(|| CommitError::UnknownShortcut {
                shortcut_id: shortcut_id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        binding.current_binding = chord.to_string();
        debug!(shortcut_id, chord, "Binding written");

        Ok(())
    }
}
