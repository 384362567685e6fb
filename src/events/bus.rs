//! # Broadcast bus for connectivity notifications.
//!
//! [`StatusBus`] is a thin wrapper around [`tokio::sync::broadcast`] carrying
//! [`StatusChange`] values from the connection supervisor to any number of
//! status indicators.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent notifications for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: notifications are lost if there are no receivers at send time.

use tokio::sync::broadcast;

use super::status::StatusChange;

/// Broadcast channel for connectivity notifications.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct StatusBus {
    tx: broadcast::Sender<StatusChange>,
}

impl StatusBus {
    /// Creates a new bus with the given channel capacity (minimum 1, clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<StatusChange>(capacity);
        Self { tx }
    }

    /// Publishes a notification to all active receivers.
    ///
    /// If there are no receivers, the notification is dropped.
    pub fn publish(&self, change: StatusChange) {
        let _ = self.tx.send(change);
    }

    /// Creates a new receiver that observes notifications sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChange> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
