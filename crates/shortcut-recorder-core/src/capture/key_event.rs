use crate::Modifier;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Channel on which the capture service publishes [`KeyEvent`]s.
pub const KEY_CAPTURE_EVENT: &str = "key-capture-event";

/// A raw key transition observed by the capture service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Modifiers held at the time of the event.
    #[serde(default)]
    pub modifiers: BTreeSet<String>,
    /// The non-modifier key, if one is involved.
    #[serde(default)]
    pub key: Option<String>,
    /// `true` for a press, `false` for a release.
    pub is_key_down: bool,
    /// Canonical chord at the moment of the event.
    #[serde(default)]
    pub hotkey_string: String,
}

impl KeyEvent {
    /// A key press producing `hotkey_string`.
    pub fn down(hotkey_string: impl Into<String>) -> Self {
        let hotkey_string = hotkey_string.into();
        let (modifiers, keys): (Vec<&str>, Vec<&str>) = hotkey_string
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .partition(|part| Modifier::from_name(part).is_some());
        let modifiers = modifiers.into_iter().map(str::to_string).collect();
        let key = keys.last().map(|key| key.to_string());

        Self {
            modifiers,
            key,
            is_key_down: true,
            hotkey_string,
        }
    }

    /// A release with no chord information.
    pub fn up() -> Self {
        Self {
            modifiers: BTreeSet::new(),
            key: None,
            is_key_down: false,
            hotkey_string: String::new(),
        }
    }

    /// Whether this is a bare press of `key` with no modifiers held.
    pub fn is_bare_press(&self, key: &str) -> bool {
        self.is_key_down
            && self.modifiers.is_empty()
            && self
                .key
                .as_deref()
                .is_some_and(|pressed| pressed.eq_ignore_ascii_case(key))
    }
}
