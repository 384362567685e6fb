//! # feedvisor
//!
//! **Feedvisor** simulates the real-time update stream behind a governance
//! dashboard: synthetic compliance, audit, project, team and system updates,
//! fanned out to subscribers, gated by a simulated connection that drops and
//! recovers on its own.
//!
//! ## Architecture
//! ### Overview
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  UpdateFeed (owner; created on mount, dropped on unmount)         │
//! │  - FeedConfig (injected)          - Dice (injected randomness)    │
//! │  - root CancellationToken         - StatusBus (connect/disconnect)│
//! └──────┬──────────────────────────────────┬─────────────────────────┘
//!        ▼                                  ▼
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │ ConnectionSupervisor │ state  │      UpdateSource        │
//! │ check every N secs   ├───────►│ sleep(uniform[min,max])  │
//! │ drop → reconnect     │        │ if connected && roll:    │
//! └──────────┬───────────┘        │   synthesize Update      │
//!            │ StatusChange       └────────────┬─────────────┘
//!            ▼                                 ▼ deliver(&Update)
//!     status indicators           ┌──────────────────────────┐
//!                                 │        UpdateHub         │
//!                                 │  UpdateLog (newest first,│
//!                                 │   max_updates, FIFO out) │
//!                                 │  SubscriptionRegistry    │
//!                                 └──┬─────────┬─────────┬───┘
//!                                    ▼         ▼         ▼
//!                                  sub 1     sub 2     sub N   (registration order,
//!                                                               failures isolated)
//! ```
//!
//! ### Connection state machine
//! ```text
//! Connected(q) ── check, low roll ──► Disconnected      status-change(false), schedule reconnect
//! Connected(q) ── check, other roll ─► Connected(q')     (no notification)
//! Disconnected ── timer / force ─────► Connected(Excellent)  status-change(true)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                        |
//! |-------------------|----------------------------------------------------------|-------------------------------------------|
//! | **Subscriber API**| Receive every update; closures or custom types.          | [`Subscribe`], [`SubscriptionRegistry`]   |
//! | **Feed**          | Owner object with start/stop and the dashboard contract. | [`UpdateFeed`], [`FeedBuilder`]           |
//! | **Simulation**    | Emission timing, odds and connection bands.              | [`EmissionInterval`], [`ConnectionOdds`]  |
//! | **Randomness**    | Injectable, seedable or scripted.                        | [`RandomSource`], [`Dice`]                |
//! | **Errors**        | Typed errors for configuration and subscribers.          | [`FeedError`], [`SubscriberError`]        |
//! | **Configuration** | Centralized settings.                                    | [`FeedConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber that forwards updates to `tracing`.
//!
//! ## Concurrency
//! Subscribers, connection state and the log each sit behind a mutex that is never
//! held while a subscriber runs. One pending timer exists per responsibility
//! (emission, connection check or reconnect); all of them hang off the feed's root
//! `CancellationToken`, cancelled by [`UpdateFeed::stop`] and on drop.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use feedvisor::{FeedConfig, SeededRandom, Update, UpdateFeed, UpdateKind};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = FeedConfig::default();
//!     cfg.max_updates = 20;
//!
//!     let feed = UpdateFeed::builder(cfg)
//!         .with_random(SeededRandom::new(7))
//!         .build()?;
//!
//!     feed.subscribe_to_updates(|u: &Update| {
//!         println!("[{}] {} ({:?})", u.kind, u.title, u.severity);
//!     });
//!
//!     feed.start()?;
//!     feed.trigger_manual_update(UpdateKind::Compliance, None).await;
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     feed.stop();
//!
//!     assert!(!feed.updates().is_empty());
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    ConnectionMachine, ConnectionSupervisor, FeedBuilder, FeedConfig, MANUAL_TITLE,
    MessageCatalog, Template, Transition, UpdateFeed, UpdateLog, UpdateSource,
};
pub use error::{FeedError, SubscriberError};
pub use events::{
    ConnectionState, Origin, Quality, Severity, StatusBus, StatusChange, Update, UpdateKind,
};
pub use policies::{
    CheckOutcome, ConnectionOdds, Dice, EmissionInterval, EmissionOdds, MAX_DELAY,
    RandomSource, ScriptedRandom, SeededRandom, ThreadRandom,
};
pub use subscribers::{Delivery, Subscribe, SubscriptionId, SubscriptionRegistry};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
