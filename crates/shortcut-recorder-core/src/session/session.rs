//! Chord recording state machine.
//!
//! A session moves `Idle -> Recording -> Idle`. While recording it owns one
//! key event subscription, the cancellation triggers, and the capture lock.
//! Every input (key events and trigger signals) is queued on one channel and
//! handled one at a time, so the `active` slot is the only guard needed
//! against reentry: whichever exit path takes it first wins, and inputs that
//! arrive for a finished session are dropped as stale.

use crate::{
    BindingCommitter, BindingStore, CancelReason, CancellationTriggers, CaptureLock,
    CaptureLockGuard, CaptureService, CoreResult, Disposer, EventBridge, KEY_CAPTURE_EVENT,
    KeyEvent, Notification, Notifier, RecorderError, RecordingState, SessionInput, TaggedInput,
};

use std::{panic::Location, sync::Arc, time::Instant};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Key that cancels recording when pressed with no modifiers.
pub const DEFAULT_CANCEL_KEY: &str = "Escape";

/// How the most recent recording session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The recorded chord was stored.
    Committed {
        /// Shortcut that was rebound.
        shortcut_id: String,
        /// The chord as recorded.
        chord: String,
    },
    /// Storing the recorded chord failed.
    CommitFailed {
        /// Shortcut that was being rebound.
        shortcut_id: String,
        /// Whether the original chord was written back successfully.
        restored: bool,
    },
    /// Recording was cancelled before a chord was released.
    Cancelled {
        /// Shortcut that was being rebound.
        shortcut_id: String,
        /// Why the session was cancelled.
        reason: CancelReason,
        /// Whether the original chord was written back successfully.
        restored: bool,
    },
    /// The owner went away mid-recording. Bindings were not touched.
    TornDown {
        /// Shortcut that was being rebound.
        shortcut_id: String,
    },
}

/// Per-recording state. Exists only while `Recording`.
struct ActiveCapture {
    session_id: Uuid,
    started_at: Instant,
    shortcut_id: String,
    /// Rollback target, snapshotted at start. Empty when the shortcut was unbound.
    original_binding: String,
    /// Latest chord from a key-down. Read at release time, never cached elsewhere.
    live_chord: String,
    /// `Some` until the key event subscription has been released.
    disposer: Option<Disposer>,
    triggers: CancellationTriggers,
    _lock: CaptureLockGuard,
}

impl ActiveCapture {
    fn release_subscription(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer.dispose();
        }
    }

    fn release_all(&mut self) {
        self.release_subscription();
        self.triggers.deregister();
    }
}

/// Records a new chord for one shortcut and commits it atomically on release.
pub struct RecordingSession {
    capture: Arc<dyn CaptureService>,
    committer: BindingCommitter,
    notifier: Arc<dyn Notifier>,
    bridge: EventBridge,
    capture_lock: CaptureLock,
    cancel_key: String,
    active: Option<ActiveCapture>,
    input_tx: mpsc::UnboundedSender<TaggedInput>,
    input_rx: mpsc::UnboundedReceiver<TaggedInput>,
    display_tx: watch::Sender<String>,
    last_outcome: Option<SessionOutcome>,
}

impl RecordingSession {
    /// Create an idle session.
    ///
    /// The session gets its own [`CaptureLock`]; use
    /// [`with_capture_lock`](Self::with_capture_lock) to share one between
    /// sessions that use the same capture service.
    pub fn new(
        capture: Arc<dyn CaptureService>,
        store: Arc<dyn BindingStore>,
        notifier: Arc<dyn Notifier>,
        bridge: EventBridge,
    ) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (display_tx, _) = watch::channel(String::new());

        Self {
            capture,
            committer: BindingCommitter::new(store),
            notifier,
            bridge,
            capture_lock: CaptureLock::new(),
            cancel_key: DEFAULT_CANCEL_KEY.to_string(),
            active: None,
            input_tx,
            input_rx,
            display_tx,
            last_outcome: None,
        }
    }

    /// Share `lock` with other sessions.
    pub fn with_capture_lock(mut self, lock: CaptureLock) -> Self {
        self.capture_lock = lock;
        self
    }

    /// Use `key` as the explicit-cancel key.
    pub fn with_cancel_key(mut self, key: impl Into<String>) -> Self {
        self.cancel_key = key.into();
        self
    }

    /// Current state.
    pub fn state(&self) -> RecordingState {
        match &self.active {
            Some(active) => RecordingState::Recording {
                started_at: active.started_at,
                session_id: active.session_id,
            },
            None => RecordingState::Idle,
        }
    }

    /// Whether a chord is being captured.
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Shortcut being recorded, if any.
    pub fn shortcut_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.shortcut_id.as_str())
    }

    /// Chord to restore on failure or cancel, if recording.
    pub fn original_binding(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.original_binding.as_str())
    }

    /// Latest chord observed while recording.
    pub fn live_chord(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.live_chord.as_str())
    }

    /// Receiver for the chord to display while recording.
    ///
    /// Cleared to an empty string on start and whenever the session ends.
    pub fn display(&self) -> watch::Receiver<String> {
        self.display_tx.subscribe()
    }

    /// How the most recent session ended.
    pub fn last_outcome(&self) -> Option<&SessionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Live cancellation trigger subscriptions (zero while idle).
    pub fn active_triggers(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.triggers.active())
    }

    /// Begin recording a chord for `shortcut_id`.
    ///
    /// Does nothing if already recording. On any failure the session stays
    /// `Idle`, the user is notified, and the error is returned.
    #[instrument(skip(self))]
    pub async fn start(&mut self, shortcut_id: &str) -> CoreResult<()> {
        if let Some(active) = &self.active {
            debug!(
                session_id = %active.session_id,
                "Start ignored, already recording"
            );
            return Ok(());
        }

        match self.try_start(shortcut_id).await {
            Ok(active) => {
                info!(
                    session_id = %active.session_id,
                    shortcut_id,
                    original_binding = %active.original_binding,
                    "Recording started"
                );
                self.display_tx.send_replace(String::new());
                self.active = Some(active);
                Ok(())
            }
            Err(e) => {
                error!(shortcut_id, error = ?e, "Failed to start recording");
                self.notifier.notify(
                    Notification::error("Couldn't start recording a shortcut")
                        .with_description(start_failure_message(&e))
                        .retryable(),
                );
                Err(e)
            }
        }
    }

    async fn try_start(&self, shortcut_id: &str) -> CoreResult<ActiveCapture> {
        let lock = self.capture_lock.try_acquire()?;

        let original_binding = self
            .committer
            .store()
            .bindings()
            .await
            .map_err(|e| RecorderError::Store {
                reason: e.user_message(),
                location: ErrorLocation::from(Location::caller()),
            })?
            .get(shortcut_id)
            .map(|binding| binding.current_binding.clone())
            .unwrap_or_default();

        self.capture
            .begin_capture(shortcut_id)
            .await
            .map_err(|e| match e {
                e @ RecorderError::StartCapture { .. } => e,
                other => RecorderError::StartCapture {
                    reason: other.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
            })?;

        let session_id = Uuid::new_v4();

        match self.wire(session_id).await {
            Ok((disposer, triggers)) => Ok(ActiveCapture {
                session_id,
                started_at: Instant::now(),
                shortcut_id: shortcut_id.to_string(),
                original_binding,
                live_chord: String::new(),
                disposer: Some(disposer),
                triggers,
                _lock: lock,
            }),
            Err(e) => {
                // Capture already began; undo it before reporting.
                self.end_capture().await;
                Err(e)
            }
        }
    }

    async fn wire(&self, session_id: Uuid) -> CoreResult<(Disposer, CancellationTriggers)> {
        let tx = self.input_tx.clone();
        let disposer = self
            .bridge
            .subscribe::<KeyEvent, _>(KEY_CAPTURE_EVENT, move |event| {
                let _ = tx.send(TaggedInput {
                    session_id,
                    input: SessionInput::Key(event),
                });
            })
            .await?;

        // `disposer` drops (and releases) if trigger registration fails.
        let triggers =
            CancellationTriggers::register(&self.bridge, session_id, &self.input_tx).await?;

        Ok((disposer, triggers))
    }

    /// Handle every input already queued, without waiting for more.
    pub async fn process_pending(&mut self) {
        while let Ok(tagged) = self.input_rx.try_recv() {
            self.handle_input(tagged).await;
        }
    }

    /// Handle inputs as they arrive until the session is back to `Idle`.
    ///
    /// Returns immediately when idle. There is no timeout: if the capture
    /// service stops delivering events and no trigger fires, this waits
    /// forever.
    pub async fn run_until_idle(&mut self) -> Option<&SessionOutcome> {
        while self.active.is_some() {
            match self.input_rx.recv().await {
                Some(tagged) => self.handle_input(tagged).await,
                // `self` holds a sender, so the queue never closes.
                None => break,
            }
        }

        self.last_outcome.as_ref()
    }

    async fn handle_input(&mut self, tagged: TaggedInput) {
        let Some(active) = &self.active else {
            debug!(session_id = %tagged.session_id, "Dropping input, session idle");
            return;
        };

        if active.session_id != tagged.session_id {
            debug!(
                session_id = %tagged.session_id,
                active_session_id = %active.session_id,
                "Dropping stale input"
            );
            return;
        }

        match tagged.input {
            SessionInput::Key(Ok(event)) => self.on_key_event(event).await,
            SessionInput::Key(Err(e)) => {
                error!(
                    session_id = %tagged.session_id,
                    error = ?e,
                    "Key event subscription failed"
                );
                self.notifier.notify(
                    Notification::error("Shortcut recording stopped unexpectedly")
                        .with_description("Key events could not be read."),
                );
                self.cancel_with(CancelReason::SubscriptionFailed).await;
            }
            SessionInput::Cancel(reason) => self.cancel_with(reason).await,
            SessionInput::Teardown => self.teardown().await,
        }
    }

    /// Apply one key transition to the active session.
    ///
    /// Key-downs only update the live chord. A release with a non-empty live
    /// chord commits it. A bare press of the cancel key cancels. Ignored
    /// while idle.
    pub async fn on_key_event(&mut self, event: KeyEvent) {
        let cancel_key = self.cancel_key.as_str();
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if event.is_bare_press(cancel_key) {
            debug!(session_id = %active.session_id, "Cancel key pressed");
            self.cancel_with(CancelReason::Explicit).await;
            return;
        }

        if event.is_key_down {
            if !event.hotkey_string.is_empty() {
                active.live_chord = event.hotkey_string;
                self.display_tx.send_replace(active.live_chord.clone());
                debug!(
                    session_id = %active.session_id,
                    chord = %active.live_chord,
                    "Chord updated"
                );
            }
            return;
        }

        if active.live_chord.is_empty() {
            debug!(session_id = %active.session_id, "Release before any chord, ignoring");
            return;
        }

        self.commit().await;
    }

    async fn commit(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };

        let chord = active.live_chord.clone();
        active.release_all();
        self.end_capture().await;

        let outcome = match self.committer.apply(&active.shortcut_id, &chord).await {
            Ok(()) => {
                info!(
                    session_id = %active.session_id,
                    shortcut_id = %active.shortcut_id,
                    chord = %chord,
                    duration_ms = active.started_at.elapsed().as_millis(),
                    "Binding committed"
                );
                SessionOutcome::Committed {
                    shortcut_id: active.shortcut_id.clone(),
                    chord,
                }
            }
            Err(source) => {
                let description = source.user_message();
                let e = RecorderError::commit(source);
                error!(session_id = %active.session_id, error = ?e, "Commit failed");
                self.notifier.notify(
                    Notification::error(format!("Couldn't set shortcut to {chord}"))
                        .with_description(description),
                );

                let restored = self.restore(&active).await;
                SessionOutcome::CommitFailed {
                    shortcut_id: active.shortcut_id.clone(),
                    restored,
                }
            }
        };

        self.finish(active, outcome);
    }

    /// Abandon the recording and write the original chord back.
    ///
    /// Never commits the in-progress chord. No-op while idle.
    pub async fn cancel(&mut self) {
        self.cancel_with(CancelReason::Explicit).await;
    }

    #[instrument(skip(self))]
    async fn cancel_with(&mut self, reason: CancelReason) {
        let Some(mut active) = self.active.take() else {
            debug!("Cancel ignored, not recording");
            return;
        };

        active.release_all();
        self.end_capture().await;
        let restored = self.restore(&active).await;

        info!(session_id = %active.session_id, ?reason, restored, "Recording cancelled");

        let outcome = SessionOutcome::Cancelled {
            shortcut_id: active.shortcut_id.clone(),
            reason,
            restored,
        };
        self.finish(active, outcome);
    }

    /// Stop recording because the owner is going away.
    ///
    /// Releases the subscription and ends capture, but leaves the binding
    /// store untouched. No-op while idle.
    #[instrument(skip(self))]
    pub async fn teardown(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };

        active.release_all();
        self.end_capture().await;

        info!(session_id = %active.session_id, "Recording torn down");

        let outcome = SessionOutcome::TornDown {
            shortcut_id: active.shortcut_id.clone(),
        };
        self.finish(active, outcome);
    }

    /// Write `original_binding` back verbatim. Returns whether a restore succeeded.
    async fn restore(&self, active: &ActiveCapture) -> bool {
        if active.original_binding.is_empty() {
            return false;
        }

        match self
            .committer
            .restore(&active.shortcut_id, &active.original_binding)
            .await
        {
            Ok(()) => {
                debug!(
                    session_id = %active.session_id,
                    chord = %active.original_binding,
                    "Original binding restored"
                );
                true
            }
            Err(source) => {
                let description = format!(
                    "{} may be left without a working shortcut. {}",
                    active.shortcut_id,
                    source.user_message()
                );
                let e = RecorderError::restore(source);
                error!(session_id = %active.session_id, error = ?e, "Restore failed");
                self.notifier.notify(
                    Notification::critical(format!(
                        "Couldn't restore shortcut {}",
                        active.original_binding
                    ))
                    .with_description(description),
                );
                false
            }
        }
    }

    async fn end_capture(&self) {
        if let Err(e) = self.capture.end_capture().await {
            warn!(error = ?e, "end-capture failed, ignoring");
        }
    }

    fn finish(&mut self, active: ActiveCapture, outcome: SessionOutcome) {
        self.display_tx.send_replace(String::new());
        // Dropping `active` releases the capture lock.
        drop(active);
        self.last_outcome = Some(outcome);
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };

        active.release_all();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let capture = Arc::clone(&self.capture);
                handle.spawn(async move {
                    if let Err(e) = capture.end_capture().await {
                        warn!(error = ?e, "end-capture after drop failed");
                    }
                });
            }
            Err(_) => warn!(
                session_id = %active.session_id,
                "Session dropped outside a runtime, end-capture skipped"
            ),
        }

        info!(session_id = %active.session_id, "Recording dropped mid-session");
    }
}

fn start_failure_message(e: &RecorderError) -> String {
    match e {
        RecorderError::CaptureBusy { .. } => {
            "Another shortcut is already being recorded.".to_string()
        }
        RecorderError::StartCapture { reason, .. } => reason.clone(),
        RecorderError::Store { reason, .. } => format!("Settings could not be read: {reason}"),
        other => other.to_string(),
    }
}
