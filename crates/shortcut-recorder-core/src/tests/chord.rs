use crate::{Chord, CommitError, Modifier};

/// WHAT: Modifier spellings and order are canonicalised
/// WHY: Equal chords must compare equal for conflict detection
#[test]
#[allow(clippy::unwrap_used)]
fn given_mixed_case_chord_when_parsing_then_canonical_form() {
    // Given/When: Loosely written chords
    let a = Chord::parse("shift+control+r").unwrap();
    let b = Chord::parse(" Ctrl + Shift + R ").unwrap();
    let c = Chord::parse("cmd+option+space").unwrap();

    // Then: Canonical spelling and ordering
    assert_eq!(a.to_string(), "Ctrl+Shift+R");
    assert_eq!(a, b);
    assert_eq!(a.modifiers(), &[Modifier::Ctrl, Modifier::Shift]);
    assert_eq!(a.key(), "R");
    assert_eq!(c.to_string(), "Alt+Super+Space");
}

/// WHAT: A bare key is a valid chord
/// WHY: Single keys like F5 or Escape can be bound
#[test]
#[allow(clippy::unwrap_used)]
fn given_bare_key_when_parsing_then_valid() {
    // Given/When
    let chord: Chord = "f5".parse().unwrap();

    // Then
    assert!(chord.modifiers().is_empty());
    assert_eq!(chord.to_string(), "F5");
}

/// WHAT: Malformed chords are rejected as InvalidChord
/// WHY: The committer must never store an unusable binding
#[test]
fn given_malformed_chords_when_parsing_then_invalid_chord() {
    // Given: Chords that are empty, modifier-only, doubled or with two keys
    let malformed = ["", "   ", "Ctrl+", "Ctrl++R", "Ctrl+Shift", "Ctrl+ctrl+R", "Ctrl+A+B"];

    for input in malformed {
        // When
        let result = Chord::parse(input);

        // Then
        assert!(
            matches!(result, Err(CommitError::InvalidChord { .. })),
            "{input:?} should be rejected"
        );
    }
}
