use crate::{CaptureLock, KeyEvent, RecorderError};

use serde_json::json;

/// WHAT: Capture service payloads decode into KeyEvent
/// WHY: The bridge feeds raw JSON from the backend
#[test]
#[allow(clippy::unwrap_used)]
fn given_backend_payload_when_decoding_then_key_event() {
    // Given: A payload as emitted on key-capture-event
    let payload = json!({
        "modifiers": ["ctrl", "shift"],
        "key": "r",
        "is_key_down": true,
        "hotkey_string": "ctrl+shift+r"
    });

    // When
    let event: KeyEvent = serde_json::from_value(payload).unwrap();

    // Then
    assert!(event.is_key_down);
    assert_eq!(event.key.as_deref(), Some("r"));
    assert_eq!(event.modifiers.len(), 2);
    assert_eq!(event.hotkey_string, "ctrl+shift+r");
}

/// WHAT: A release payload with a null key decodes
/// WHY: Releases carry no key
#[test]
#[allow(clippy::unwrap_used)]
fn given_release_payload_when_decoding_then_key_is_none() {
    // Given
    let payload = json!({ "modifiers": [], "key": null, "is_key_down": false, "hotkey_string": "" });

    // When
    let event: KeyEvent = serde_json::from_value(payload).unwrap();

    // Then
    assert_eq!(event, KeyEvent::up());
}

/// WHAT: KeyEvent::down splits modifiers from the key
/// WHY: Cancel key detection looks at modifiers and key separately
#[test]
fn given_chord_string_when_building_key_down_then_modifiers_and_key_split() {
    // Given/When
    let with_key = KeyEvent::down("Ctrl+Shift+R");
    let modifiers_only = KeyEvent::down("Ctrl+Alt");
    let escape = KeyEvent::down("Escape");

    // Then
    assert_eq!(with_key.key.as_deref(), Some("R"));
    assert_eq!(with_key.modifiers.len(), 2);
    assert!(modifiers_only.key.is_none());
    assert!(escape.is_bare_press("escape"));
    assert!(!with_key.is_bare_press("R"));
    assert!(!KeyEvent::up().is_bare_press("Escape"));
}

/// WHAT: The capture lock is exclusive until its guard drops
/// WHY: Only one session may own the capture stream
#[test]
#[allow(clippy::unwrap_used)]
fn given_held_lock_when_acquiring_again_then_capture_busy() {
    // Given: A held lock
    let lock = CaptureLock::new();
    let guard = lock.try_acquire().unwrap();

    // When: A clone tries to acquire
    let second = lock.clone().try_acquire();

    // Then: Busy until the guard drops
    assert!(matches!(second, Err(RecorderError::CaptureBusy { .. })));
    drop(guard);
    assert!(lock.try_acquire().is_ok());
}
