//! # UpdateFeed: owns the registry, the source, the connection and the log.
//!
//! The [`UpdateFeed`] is the object a dashboard composes once and tears down on
//! exit. It wires every part of the feed together and exposes the programmatic
//! contract consumed by role views, badges and status indicators.
//!
//! ## High-level architecture
//! ```text
//! UpdateFeed
//!   ├─ root CancellationToken ──┬─► ConnectionSupervisor driver (check / reconnect timer)
//!   │                           └─► UpdateSource loop           (emission timer)
//!   ├─ StatusBus  ◄── StatusChange on connect/disconnect
//!   └─ UpdateHub
//!        ├─ UpdateLog (newest first, max_updates)
//!        └─ SubscriptionRegistry ──► subscriber 1 … N (registration order)
//! ```
//!
//! ## Lifecycle
//! - `build()` creates everything in `Connected(Excellent)`; no timers run yet
//! - `start()` spawns both timer loops (needs a tokio runtime)
//! - `stop()` cancels both; the feed can be started again
//! - dropping the feed cancels the root token, so no timer outlives its owner
//!
//! ## Example
//! ```rust
//! use feedvisor::{FeedConfig, Update, UpdateFeed, UpdateKind};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), feedvisor::FeedError> {
//!     let feed = UpdateFeed::new(FeedConfig::default())?;
//!     let id = feed.subscribe_to_updates(|u: &Update| println!("{}: {}", u.kind, u.title));
//!
//!     feed.start()?;
//!     let up = feed.trigger_manual_update(UpdateKind::System, None).await;
//!     assert_eq!(feed.updates()[0].id, up.id);
//!
//!     feed.unsubscribe_from_updates(id);
//!     feed.stop();
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use serde_json::Value;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::builder::FeedBuilder;
use crate::core::config::FeedConfig;
use crate::core::connection::ConnectionSupervisor;
use crate::core::hub::UpdateHub;
use crate::core::source::UpdateSource;
use crate::error::FeedError;
use crate::events::{ConnectionState, Quality, StatusBus, StatusChange, Update, UpdateKind};
use crate::subscribers::{Subscribe, SubscriptionId};

/// Simulated real-time update feed.
pub struct UpdateFeed {
    pub(crate) cfg: FeedConfig,
    pub(crate) hub: Arc<UpdateHub>,
    pub(crate) source: Arc<UpdateSource>,
    pub(crate) connection: Arc<ConnectionSupervisor>,
    pub(crate) bus: StatusBus,
    pub(crate) root: CancellationToken,
}

impl UpdateFeed {
    /// Starts a builder for the given configuration.
    pub fn builder(cfg: FeedConfig) -> FeedBuilder {
        FeedBuilder::new(cfg)
    }

    /// Builds a feed with thread-local randomness and the default catalog.
    pub fn new(cfg: FeedConfig) -> Result<Self, FeedError> {
        FeedBuilder::new(cfg).build()
    }

    pub fn config(&self) -> &FeedConfig {
        &self.cfg
    }

    /// Spawns the connection and emission timers.
    pub fn start(&self) -> Result<(), FeedError> {
        self.connection.start()?;
        self.source.start()?;
        info!(event = "feed.started", max_updates = self.cfg.max_updates_clamped());
        Ok(())
    }

    /// Cancels every pending timer; idempotent. Subscriptions and the log are kept.
    pub fn stop(&self) {
        self.source.stop();
        self.connection.stop();
        info!(event = "feed.stopped");
    }

    pub fn is_running(&self) -> bool {
        self.source.is_running()
    }

    /// Registers a subscriber for every subsequent update.
    pub fn subscribe_to_updates(&self, sub: impl Subscribe) -> SubscriptionId {
        self.hub.registry.subscribe(sub)
    }

    /// Registers a shared subscriber for every subsequent update.
    pub fn subscribe_arc(&self, sub: Arc<dyn Subscribe>) -> SubscriptionId {
        self.hub.registry.subscribe_arc(sub)
    }

    /// Removes a subscriber; unknown ids are a no-op returning `false`.
    pub fn unsubscribe_from_updates(&self, id: SubscriptionId) -> bool {
        self.hub.registry.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.hub.registry.len()
    }

    /// Publishes a `success` update of `kind` right now, outside the schedule.
    pub async fn trigger_manual_update(&self, kind: UpdateKind, data: Option<Value>) -> Update {
        self.source.emit_manual(kind, data).await
    }

    /// Empties the update list; `last_update` is kept.
    pub fn clear_updates(&self) {
        self.hub.log().clear();
    }

    /// Retained updates, newest first.
    pub fn updates(&self) -> Vec<Update> {
        self.hub.log().snapshot()
    }

    /// Timestamp of the most recent update, `None` before the first one.
    pub fn last_update(&self) -> Option<SystemTime> {
        self.hub.log().last_update()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Quality while connected, `None` while disconnected.
    pub fn connection_quality(&self) -> Option<Quality> {
        self.connection.quality()
    }

    /// Reconnects immediately if disconnected; `false` when already connected.
    pub fn force_reconnect(&self) -> bool {
        self.connection.force_reconnect()
    }

    /// Receiver for connect/disconnect notifications sent after this call.
    pub fn status_changes(&self) -> broadcast::Receiver<StatusChange> {
        self.bus.subscribe()
    }
}

impl Drop for UpdateFeed {
    fn drop(&mut self) {
        self.root.cancel();
        self.hub.registry.clear();
    }
}
