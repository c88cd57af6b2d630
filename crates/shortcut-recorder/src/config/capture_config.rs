use crate::config::default_cancel_key;

use serde::{Deserialize, Serialize};

/// Key capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Key that cancels recording when pressed without modifiers.
    #[serde(default = "default_cancel_key")]
    pub cancel_key: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            cancel_key: default_cancel_key(),
        }
    }
}
