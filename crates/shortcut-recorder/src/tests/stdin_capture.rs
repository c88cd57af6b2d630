use crate::{StdinCaptureService, stdin_capture::route_line};

use shortcut_recorder_core::{
    CANCEL_REQUESTED_EVENT, CaptureService, EventBridge, KEY_CAPTURE_EVENT, KeyEvent,
};

use std::sync::{Arc, Mutex};

const KEY_LINE: &str = r#"{"channel":"key-capture-event","payload":{"modifiers":["Ctrl"],"key":"R","is_key_down":true,"hotkey_string":"Ctrl+R"}}"#;

/// WHAT: Key events are only forwarded while capture is active
/// WHY: The capture stream delivers nothing outside begin/end
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_capture_toggled_when_routing_key_lines_then_forwarded_only_while_active() {
    // Given: A key event subscriber
    let bridge = EventBridge::new();
    let capture = StdinCaptureService::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _disposer = bridge
        .subscribe::<KeyEvent, _>(KEY_CAPTURE_EVENT, move |event| {
            sink.lock().unwrap().push(event.unwrap().hotkey_string);
        })
        .await
        .unwrap();

    // When: Routing before, during and after capture
    let before = route_line(&bridge, &capture, KEY_LINE);
    capture.begin_capture("toggle_recording").await.unwrap();
    let during = route_line(&bridge, &capture, KEY_LINE);
    capture.end_capture().await.unwrap();
    let after = route_line(&bridge, &capture, KEY_LINE);

    // Then
    assert!(!before);
    assert!(during);
    assert!(!after);
    assert_eq!(*seen.lock().unwrap(), vec!["Ctrl+R"]);
}

/// WHAT: Trigger channels pass through regardless of capture state
/// WHY: Cancel must work even if capture already stopped
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_inactive_capture_when_routing_cancel_then_forwarded() {
    // Given
    let bridge = EventBridge::new();
    let capture = StdinCaptureService::new();
    let _disposer = bridge
        .subscribe::<serde_json::Value, _>(CANCEL_REQUESTED_EVENT, |_| {})
        .await
        .unwrap();

    // When
    let delivered = route_line(
        &bridge,
        &capture,
        r#"{"channel":"capture-cancel-requested"}"#,
    );

    // Then
    assert!(delivered);
}

/// WHAT: Blank and malformed lines are ignored
/// WHY: Bad input must not end the session
#[test]
fn given_garbage_lines_when_routing_then_ignored() {
    let bridge = EventBridge::new();
    let capture = StdinCaptureService::new();

    assert!(!route_line(&bridge, &capture, ""));
    assert!(!route_line(&bridge, &capture, "not json"));
    assert!(!route_line(&bridge, &capture, r#"{"payload":1}"#));
}

/// WHAT: end-capture is safe when nothing is active, begin is exclusive
/// WHY: end-capture is idempotent from the caller's perspective
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_capture_service_when_toggling_then_begin_exclusive_and_end_idempotent() {
    let capture = StdinCaptureService::new();

    capture.end_capture().await.unwrap();
    capture.begin_capture("a").await.unwrap();
    assert!(capture.begin_capture("b").await.is_err());
    capture.end_capture().await.unwrap();
    capture.end_capture().await.unwrap();
    assert!(!capture.is_active());
}
