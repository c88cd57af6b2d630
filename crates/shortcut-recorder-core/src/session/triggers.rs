use crate::{CoreResult, Disposer, EventBridge, SessionInput, TaggedInput};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Channel signalling an explicit cancel request from the UI.
pub const CANCEL_REQUESTED_EVENT: &str = "capture-cancel-requested";
/// Channel signalling pointer or input activity outside the capture region.
pub const FOCUS_LOST_EVENT: &str = "capture-focus-lost";
/// Channel signalling that the owner of the capture input is being destroyed.
pub const OWNER_TEARDOWN_EVENT: &str = "capture-owner-teardown";

/// Why a session was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Cancel key or cancel request.
    Explicit,
    /// Focus left the capture region.
    FocusLost,
    /// The key event subscription failed.
    SubscriptionFailed,
}

/// The three cancellation sources wired to one recording session.
///
/// All three subscriptions are released together by
/// [`deregister`](Self::deregister) or on drop.
#[derive(Debug)]
pub(crate) struct CancellationTriggers {
    disposers: Vec<Disposer>,
}

impl CancellationTriggers {
    pub(crate) async fn register(
        bridge: &EventBridge,
        session_id: Uuid,
        tx: &mpsc::UnboundedSender<TaggedInput>,
    ) -> CoreResult<Self> {
        let sources: [(&str, fn() -> SessionInput); 3] = [
            (CANCEL_REQUESTED_EVENT, || {
                SessionInput::Cancel(CancelReason::Explicit)
            }),
            (FOCUS_LOST_EVENT, || SessionInput::Cancel(CancelReason::FocusLost)),
            (OWNER_TEARDOWN_EVENT, || SessionInput::Teardown),
        ];

        // If a later subscribe fails, dropping `triggers` releases the earlier ones.
        let mut triggers = Self {
            disposers: Vec::with_capacity(sources.len()),
        };
        for (channel, make_input) in sources {
            let disposer = signal(bridge, channel, session_id, tx, make_input).await?;
            triggers.disposers.push(disposer);
        }

        debug!(session_id = %session_id, "Cancellation triggers registered");

        Ok(triggers)
    }

    /// Release every trigger subscription. Returns how many were still live.
    pub(crate) fn deregister(&mut self) -> usize {
        self.disposers
            .drain(..)
            .filter(|disposer| disposer.dispose())
            .count()
    }

    /// Number of trigger subscriptions still live.
    pub(crate) fn active(&self) -> usize {
        self.disposers
            .iter()
            .filter(|disposer| disposer.is_active())
            .count()
    }
}

async fn signal(
    bridge: &EventBridge,
    channel: &str,
    session_id: Uuid,
    tx: &mpsc::UnboundedSender<TaggedInput>,
    make_input: fn() -> SessionInput,
) -> CoreResult<Disposer> {
    let tx = tx.clone();
    let channel_name = channel.to_string();

    bridge
        .subscribe::<Value, _>(channel, move |_payload| {
            debug!(session_id = %session_id, channel = %channel_name, "Cancellation trigger fired");
            // A closed queue means the session is gone; nothing left to cancel.
            let _ = tx.send(TaggedInput {
                session_id,
                input: make_input(),
            });
        })
        .await
}
