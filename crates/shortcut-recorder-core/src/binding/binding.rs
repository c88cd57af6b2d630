use serde::{Deserialize, Serialize};

/// Persisted association between a shortcut and its chord.
///
/// Identity is `id`. The recorder only ever reads a snapshot of this and
/// writes back through [`BindingCommitter`](crate::BindingCommitter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Stable shortcut identifier, e.g. `toggle_recording`.
    pub id: String,
    /// Canonical chord string, e.g. `Ctrl+Shift+R`. Empty when unbound.
    pub current_binding: String,
    /// Human-readable shortcut name.
    pub name: String,
    /// What the shortcut does.
    #[serde(default)]
    pub description: String,
}

impl Binding {
    /// Create a binding with an empty description.
    pub fn new(
        id: impl Into<String>,
        current_binding: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            current_binding: current_binding.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
