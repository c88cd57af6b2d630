use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Binding storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the bindings file (None = `bindings.toml` in the data directory).
    #[serde(default)]
    pub bindings_path: Option<PathBuf>,
}
