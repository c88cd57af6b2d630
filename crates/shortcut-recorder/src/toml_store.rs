//! Binding store persisted as a TOML file.
//!
//! The whole file is rewritten atomically on every change. A missing file is
//! seeded with [`TomlBindingStore::default_bindings`].

use crate::{AppError, AppResult, atomic_write::write_atomic};

use std::{
    collections::BTreeMap,
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use shortcut_recorder_core::{Binding, BindingStore, CommitError};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

#[derive(Debug, Default, Serialize, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    bindings: Vec<Binding>,
}

/// TOML-file backed [`BindingStore`].
pub struct TomlBindingStore {
    path: PathBuf,
    bindings: Mutex<BTreeMap<String, Binding>>,
}

impl TomlBindingStore {
    /// Open the bindings file at `path`, creating it with defaults if missing.
    #[track_caller]
    #[instrument]
    pub fn open(path: &Path) -> AppResult<Self> {
        let bindings = if path.exists() {
            let contents = fs::read_to_string(path)?;
            let file: BindingsFile =
                toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                    reason: format!("Failed to parse bindings file: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            info!(bindings_path = ?path, count = file.bindings.len(), "Bindings loaded");
            file.bindings
        } else {
            let defaults = Self::default_bindings();
            persist(path, &defaults).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create bindings file: {}", e.user_message()),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(bindings_path = ?path, "No bindings found, created defaults");
            defaults
        };

        Ok(Self {
            path: path.to_path_buf(),
            bindings: Mutex::new(
                bindings
                    .into_iter()
                    .map(|binding| (binding.id.clone(), binding))
                    .collect(),
            ),
        })
    }

    /// Bindings a fresh install starts with.
    pub fn default_bindings() -> Vec<Binding> {
        vec![
            Binding::new("transcribe", "Ctrl+Space", "Transcribe")
                .with_description("Start or stop transcription"),
            Binding::new("toggle_recording", "Ctrl+Shift+R", "Toggle recording")
                .with_description("Start or stop recording audio"),
            Binding::new("cancel", "Escape", "Cancel")
                .with_description("Abort the current operation"),
        ]
    }

    /// Default chord for `shortcut_id`, if it has one.
    pub fn default_chord(shortcut_id: &str) -> Option<String> {
        Self::default_bindings()
            .into_iter()
            .find(|binding| binding.id == shortcut_id)
            .map(|binding| binding.current_binding)
    }

    /// Location of the bindings file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BindingStore for TomlBindingStore {
    async fn bindings(&self) -> Result<BTreeMap<String, Binding>, CommitError> {
        Ok(self.bindings.lock().await.clone())
    }

    async fn write_binding(&self, shortcut_id: &str, chord: &str) -> Result<(), CommitError> {
        let mut bindings = self.bindings.lock().await;

        let previous = match bindings.get_mut(shortcut_id) {
            Some(binding) => std::mem::replace(&mut binding.current_binding, chord.to_string()),
            None => {
                return Err(CommitError::UnknownShortcut {
                    shortcut_id: shortcut_id.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let snapshot: Vec<Binding> = bindings.values().cloned().collect();
        if let Err(e) = persist(&self.path, &snapshot) {
            // Keep memory in step with disk.
            if let Some(binding) = bindings.get_mut(shortcut_id) {
                binding.current_binding = previous;
            }
            return Err(e);
        }

        debug!(shortcut_id, chord, bindings_path = ?self.path, "Binding persisted");

        Ok(())
    }
}

fn persist(path: &Path, bindings: &[Binding]) -> Result<(), CommitError> {
    let file = BindingsFile {
        bindings: bindings.to_vec(),
    };

    let contents = toml::to_string_pretty(&file).map_err(|e| CommitError::Backend {
        reason: format!("Failed to serialize bindings: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    write_atomic(path, contents.as_bytes()).map_err(|e| CommitError::Backend {
        reason: format!("Failed to write {}: {}", path.display(), e),
        location: ErrorLocation::from(Location::caller()),
    })
}
