mod event_bridge;

pub use event_bridge::{Disposer, EventBridge};
