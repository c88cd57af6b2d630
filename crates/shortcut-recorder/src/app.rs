use crate::{
    AppError, AppResult, Command, StdinCaptureService, TomlBindingStore, UserNotifier,
    config::Config, stdin_capture::spawn_line_forwarder,
};

use std::{
    io::{BufRead, BufReader},
    panic::Location,
    sync::Arc,
};

use error_location::ErrorLocation;
use serde_json::Value;
use shortcut_recorder_core::{
    BindingCommitter, BindingStore, CommitError, EventBridge, Notification, Notifier,
    OWNER_TEARDOWN_EVENT, RecordingSession, SessionOutcome,
};
use tracing::{debug, error, info, instrument};

/// Main application state.
pub struct App {
    pub(crate) config: Config,
    pub(crate) store: Arc<TomlBindingStore>,
    pub(crate) notifier: Arc<UserNotifier>,
}

impl App {
    /// Open the binding store named by `config`.
    #[track_caller]
    pub fn new(config: Config) -> AppResult<Self> {
        let store = TomlBindingStore::open(&config.bindings_path()?)?;
        debug!(bindings_path = ?store.path(), "Binding store opened");
        let notifier = UserNotifier::new(config.notifications.desktop);

        Ok(Self {
            config,
            store: Arc::new(store),
            notifier: Arc::new(notifier),
        })
    }

    /// Execute one command.
    #[instrument(skip(self))]
    pub async fn run(self, command: Command) -> AppResult<()> {
        match command {
            Command::List => self.list().await,
            Command::Record { shortcut_id } => self.record(&shortcut_id).await,
            Command::Reset { shortcut_id } => self.reset(&shortcut_id).await,
        }
    }

    async fn list(&self) -> AppResult<()> {
        for binding in self.store.bindings().await?.values() {
            let chord = if binding.current_binding.is_empty() {
                "(unbound)"
            } else {
                binding.current_binding.as_str()
            };
            println!(
                "{:<20} {:<16} {} - {}",
                binding.id, chord, binding.name, binding.description
            );
        }
        Ok(())
    }

    /// Record a chord from stdin until the session returns to idle.
    #[instrument(skip(self))]
    async fn record(&self, shortcut_id: &str) -> AppResult<()> {
        let original_binding = self
            .store
            .bindings()
            .await?
            .get(shortcut_id)
            .map(|binding| binding.current_binding.clone())
            .ok_or_else(|| {
                AppError::from(CommitError::UnknownShortcut {
                    shortcut_id: shortcut_id.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            })?;

        let outcome = self
            .drive_recording(shortcut_id, BufReader::new(std::io::stdin()))
            .await?;

        if let Some(SessionOutcome::Committed { shortcut_id, chord }) = &outcome {
            self.notifier
                .notify(Notification::info(format!("{shortcut_id} is now {chord}")));
        }

        println!("{}", outcome_summary(outcome.as_ref(), &original_binding)?);
        Ok(())
    }

    /// Run one recording session fed by `input` until it is idle again.
    ///
    /// The session subscribes before the first line is read, so nothing
    /// routed from `input` (including the teardown at end of input) is lost.
    pub(crate) async fn drive_recording<R>(
        &self,
        shortcut_id: &str,
        input: R,
    ) -> AppResult<Option<SessionOutcome>>
    where
        R: BufRead + Send + 'static,
    {
        let bridge = EventBridge::new();
        let capture = Arc::new(StdinCaptureService::new());

        let mut session = RecordingSession::new(
            Arc::clone(&capture) as _,
            Arc::clone(&self.store) as _,
            Arc::clone(&self.notifier) as _,
            bridge.clone(),
        )
        .with_cancel_key(self.config.capture.cancel_key.clone());

        session.start(shortcut_id).await?;
        eprintln!(
            "Recording {shortcut_id}: press the new chord, release to save, {} to cancel",
            self.config.capture.cancel_key
        );

        // Detached: a stdin reader blocks until EOF or process exit.
        let _forwarder = spawn_line_forwarder(bridge.clone(), Arc::clone(&capture), input);

        let interrupt_bridge = bridge.clone();
        let interrupt = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupted, tearing down");
                    interrupt_bridge.emit(OWNER_TEARDOWN_EVENT, Value::Null);
                }
                Err(e) => error!(error = ?e, "Failed to listen for Ctrl-C"),
            }
        });

        let outcome = session.run_until_idle().await.cloned();

        interrupt.abort();
        bridge.shutdown();

        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn reset(&self, shortcut_id: &str) -> AppResult<()> {
        let chord = TomlBindingStore::default_chord(shortcut_id).ok_or_else(|| {
            AppError::from(CommitError::UnknownShortcut {
                shortcut_id: shortcut_id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        })?;

        BindingCommitter::new(Arc::clone(&self.store) as _)
            .apply(shortcut_id, &chord)
            .await?;

        println!("{shortcut_id} = {chord}");
        Ok(())
    }
}

/// Line printed for a finished session, or the error to exit with.
///
/// A cancel that failed to put back a non-empty `original_binding` is an
/// error: the store may now hold the wrong chord.
#[track_caller]
pub(crate) fn outcome_summary(
    outcome: Option<&SessionOutcome>,
    original_binding: &str,
) -> AppResult<String> {
    let caller = Location::caller();
    let incomplete = |reason: &str| AppError::RecordingIncomplete {
        reason: reason.to_string(),
        location: ErrorLocation::from(caller),
    };

    match outcome {
        Some(SessionOutcome::Committed { shortcut_id, chord }) => {
            Ok(format!("{shortcut_id} = {chord}"))
        }
        Some(SessionOutcome::Cancelled { restored, .. })
            if *restored || original_binding.is_empty() =>
        {
            Ok("cancelled".to_string())
        }
        Some(SessionOutcome::Cancelled { .. }) => Err(incomplete(
            "cancelled, but the original chord could not be restored",
        )),
        Some(SessionOutcome::CommitFailed { restored: true, .. }) => {
            Err(incomplete("new chord rejected, original restored"))
        }
        Some(SessionOutcome::CommitFailed { .. }) => Err(incomplete("new chord rejected")),
        Some(SessionOutcome::TornDown { .. }) | None => {
            Err(incomplete("recording was interrupted"))
        }
    }
}
