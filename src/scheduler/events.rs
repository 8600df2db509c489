//! Change notifications
//!
//! Observers (the host's word list, mostly) subscribe once and refresh on
//! every event instead of polling the store.

use serde::Serialize;
use tokio::sync::broadcast;

/// Event name the host bridge forwards to its listeners
pub const STATE_CHANGED_EVENT: &str = "db_changed";

const CHANNEL_CAPACITY: usize = 64;

/// Opaque "something in the store or scheduler state changed" event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateChanged;

impl StateChanged {
    pub fn name(&self) -> &'static str {
        STATE_CHANGED_EVENT
    }
}

#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<StateChanged>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.tx.subscribe()
    }

    /// Having no subscribers is fine
    pub fn notify(&self) {
        let _ = self.tx.send(StateChanged);
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
