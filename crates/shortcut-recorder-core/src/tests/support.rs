use crate::{
    Binding, BindingStore, CaptureService, CommitError, CoreResult, EventBridge,
    KEY_CAPTURE_EVENT, KeyEvent, MemoryBindingStore, Notification, Notifier, RecorderError,
    RecordingSession,
};

use std::{
    collections::BTreeMap,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use error_location::ErrorLocation;

/// Capture service that counts begin/end calls.
#[derive(Default)]
pub(crate) struct FakeCapture {
    pub(crate) begins: AtomicUsize,
    pub(crate) ends: AtomicUsize,
    pub(crate) fail_begin: AtomicBool,
    pub(crate) fail_end: AtomicBool,
}

impl FakeCapture {
    pub(crate) fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub(crate) fn ends(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureService for FakeCapture {
    async fn begin_capture(&self, _shortcut_id: &str) -> CoreResult<()> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        if self.fail_begin.load(Ordering::SeqCst) {
            return Err(RecorderError::StartCapture {
                reason: "keyboard hook unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    async fn end_capture(&self) -> CoreResult<()> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        if self.fail_end.load(Ordering::SeqCst) {
            return Err(RecorderError::EndCapture {
                reason: "keyboard hook already gone".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

/// Binding store that logs every write and can be told to reject chords.
pub(crate) struct FakeStore {
    pub(crate) inner: MemoryBindingStore,
    writes: Mutex<Vec<(String, String)>>,
    failing_chords: Mutex<Vec<String>>,
}

impl FakeStore {
    pub(crate) fn new(bindings: impl IntoIterator<Item = Binding>) -> Self {
        Self {
            inner: MemoryBindingStore::new(bindings),
            writes: Mutex::new(Vec::new()),
            failing_chords: Mutex::new(Vec::new()),
        }
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn fail_writes_of(&self, chord: &str) {
        self.failing_chords.lock().unwrap().push(chord.to_string());
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl BindingStore for FakeStore {
    async fn bindings(&self) -> Result<BTreeMap<String, Binding>, CommitError> {
        self.inner.bindings().await
    }

    #[allow(clippy::unwrap_used)]
    async fn write_binding(&self, shortcut_id: &str, chord: &str) -> Result<(), CommitError> {
        self.writes
            .lock()
            .unwrap()
            .push((shortcut_id.to_string(), chord.to_string()));

        if self.failing_chords.lock().unwrap().iter().any(|c| c == chord) {
            return Err(CommitError::Backend {
                reason: "disk full".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.inner.write_binding(shortcut_id, chord).await
    }
}

/// Notifier that keeps everything it is shown.
#[derive(Default)]
pub(crate) struct CollectingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    #[allow(clippy::unwrap_used)]
    pub(crate) fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for CollectingNotifier {
    #[allow(clippy::unwrap_used)]
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub(crate) struct Harness {
    pub(crate) session: RecordingSession,
    pub(crate) bridge: EventBridge,
    pub(crate) capture: Arc<FakeCapture>,
    pub(crate) store: Arc<FakeStore>,
    pub(crate) notifier: Arc<CollectingNotifier>,
}

pub(crate) fn default_bindings() -> Vec<Binding> {
    vec![
        Binding::new("toggle_recording", "Ctrl+Shift+R", "Toggle recording"),
        Binding::new("transcribe", "Ctrl+Space", "Transcribe"),
        Binding::new("unbound", "", "Not yet bound"),
    ]
}

pub(crate) fn harness() -> Harness {
    harness_with(default_bindings())
}

pub(crate) fn harness_with(bindings: Vec<Binding>) -> Harness {
    let bridge = EventBridge::new();
    let capture = Arc::new(FakeCapture::default());
    let store = Arc::new(FakeStore::new(bindings));
    let notifier = Arc::new(CollectingNotifier::default());

    let session = RecordingSession::new(
        Arc::clone(&capture) as Arc<dyn CaptureService>,
        Arc::clone(&store) as Arc<dyn BindingStore>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        bridge.clone(),
    );

    Harness {
        session,
        bridge,
        capture,
        store,
        notifier,
    }
}

impl Harness {
    #[allow(clippy::unwrap_used)]
    pub(crate) fn press(&self, chord: &str) -> usize {
        self.bridge
            .emit_event(KEY_CAPTURE_EVENT, &KeyEvent::down(chord))
            .unwrap()
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn release(&self) -> usize {
        self.bridge
            .emit_event(KEY_CAPTURE_EVENT, &KeyEvent::up())
            .unwrap()
    }
}
