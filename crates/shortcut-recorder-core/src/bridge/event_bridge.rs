//! Named-channel event hub between the capture backend and its listeners.
//!
//! Delivery is synchronous and in emit order. There is no buffering and no
//! replay: a handler only sees events emitted while its subscription is live.

use crate::{CoreResult, RecorderError};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex, MutexGuard, Weak,
        atomic::{AtomicBool, Ordering},
    },
};

use error_location::ErrorLocation;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

struct Registration {
    id: u64,
    channel: String,
    active: Arc<AtomicBool>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    closed: bool,
    subscriptions: Vec<Registration>,
}

/// Channel hub. Clones share the same subscriptions.
#[derive(Clone, Default)]
pub struct EventBridge {
    registry: Arc<Mutex<Registry>>,
}

impl EventBridge {
    /// Create an empty bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for payloads on `channel`.
    ///
    /// Payloads that fail to decode as `T` reach the handler as
    /// [`RecorderError::Subscription`].
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Subscription`] if the bridge was shut down.
    pub async fn subscribe<T, F>(&self, channel: &str, handler: F) -> CoreResult<Disposer>
    where
        T: DeserializeOwned,
        F: Fn(CoreResult<T>) + Send + Sync + 'static,
    {
        let mut registry = self.lock();

        if registry.closed {
            return Err(RecorderError::Subscription {
                reason: format!("Bridge is shut down, cannot subscribe to {channel}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let channel_name = channel.to_string();
        let decode: Handler = Arc::new(move |payload: &Value| {
            let decoded = serde_json::from_value::<T>(payload.clone()).map_err(|e| {
                RecorderError::Subscription {
                    reason: format!("Malformed payload on {channel_name}: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                }
            });
            handler(decoded);
        });

        registry.next_id += 1;
        let id = registry.next_id;
        let active = Arc::new(AtomicBool::new(true));

        registry.subscriptions.push(Registration {
            id,
            channel: channel.to_string(),
            active: Arc::clone(&active),
            handler: decode,
        });

        debug!(channel, subscription_id = id, "Subscribed");

        Ok(Disposer {
            id,
            active,
            registry: Arc::downgrade(&self.registry),
        })
    }

    /// Deliver `payload` to every live handler on `channel`.
    ///
    /// Returns how many handlers received it.
    pub fn emit(&self, channel: &str, payload: Value) -> usize {
        // Handlers run outside the lock so they may dispose or subscribe.
        let targets: Vec<(Arc<AtomicBool>, Handler)> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|registration| registration.channel == channel)
            .map(|registration| {
                (
                    Arc::clone(&registration.active),
                    Arc::clone(&registration.handler),
                )
            })
            .collect();

        let mut delivered = 0;
        for (active, handler) in targets {
            // An earlier handler in this same emit may have disposed this one.
            if active.load(Ordering::Acquire) {
                handler(&payload);
                delivered += 1;
            }
        }

        delivered
    }

    /// Serialize `event` and [`emit`](Self::emit) it.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Subscription`] if `event` cannot be serialized.
    #[track_caller]
    pub fn emit_event<T: Serialize>(&self, channel: &str, event: &T) -> CoreResult<usize> {
        let payload = serde_json::to_value(event).map_err(|e| RecorderError::Subscription {
            reason: format!("Failed to encode payload for {channel}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(self.emit(channel, payload))
    }

    /// Number of live subscriptions on `channel`.
    pub fn active_subscriptions(&self, channel: &str) -> usize {
        self.lock()
            .subscriptions
            .iter()
            .filter(|registration| registration.channel == channel)
            .count()
    }

    /// Drop every subscription and refuse new ones.
    pub fn shutdown(&self) {
        let mut registry = self.lock();
        registry.closed = true;

        for registration in registry.subscriptions.drain(..) {
            registration.active.store(false, Ordering::Release);
        }

        warn!("Event bridge shut down");
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Releases one subscription.
///
/// Disposing is idempotent; only the first call has an effect. Dropping a
/// `Disposer` disposes it.
pub struct Disposer {
    id: u64,
    active: Arc<AtomicBool>,
    registry: Weak<Mutex<Registry>>,
}

impl Disposer {
    /// Release the subscription. Returns `true` only for the call that
    /// actually released it.
    pub fn dispose(&self) -> bool {
        if !self.active.swap(false, Ordering::AcqRel) {
            return false;
        }

        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .subscriptions
                .retain(|registration| registration.id != self.id);
        }

        debug!(subscription_id = self.id, "Subscription disposed");

        true
    }

    /// Whether the subscription is still live.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
