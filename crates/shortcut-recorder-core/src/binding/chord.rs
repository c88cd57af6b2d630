//! Canonical chord parsing.
//!
//! A chord is zero or more modifiers followed by exactly one key, joined with
//! `+`. Modifier spellings are folded to one canonical name and ordered
//! Ctrl, Alt, Shift, Super so that equal chords compare equal as strings.

use crate::CommitError;

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Modifier keys in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    /// Control.
    Ctrl,
    /// Alt / Option.
    Alt,
    /// Shift.
    Shift,
    /// Super / Command / Windows.
    Super,
}

impl Modifier {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "super" | "cmd" | "command" | "meta" | "win" => Some(Modifier::Super),
            _ => None,
        }
    }

    /// Canonical spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Super => "Super",
        }
    }
}

/// A validated key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    modifiers: Vec<Modifier>,
    key: String,
}

impl Chord {
    /// Parse and canonicalise a chord string.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError::InvalidChord`] for empty parts, repeated parts,
    /// a missing key, or more than one non-modifier key.
    #[track_caller]
    pub fn parse(input: &str) -> Result<Self, CommitError> {
        let caller = Location::caller();
        let invalid = |reason: &str| CommitError::InvalidChord {
            chord: input.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(caller),
        };

        if input.trim().is_empty() {
            return Err(invalid("chord is empty"));
        }

        let mut modifiers = Vec::new();
        let mut key: Option<String> = None;

        for part in input.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(invalid("chord contains an empty key"));
            }

            if let Some(modifier) = Modifier::from_name(part) {
                if modifiers.contains(&modifier) {
                    return Err(invalid("modifier is repeated"));
                }
                modifiers.push(modifier);
                continue;
            }

            if key.is_some() {
                return Err(invalid("chord has more than one non-modifier key"));
            }
            key = Some(canonical_key(part));
        }

        let key = key.ok_or_else(|| invalid("chord has no non-modifier key"))?;
        modifiers.sort();

        Ok(Self { modifiers, key })
    }

    /// Modifiers in canonical order.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// The non-modifier key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

fn canonical_key(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for Chord {
    type Err = CommitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chord::parse(s)
    }
}
