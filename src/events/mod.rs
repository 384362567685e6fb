//! Feed records and the connectivity bus.
//!
//! ## Contents
//! - [`Update`], [`UpdateKind`], [`Severity`], [`Origin`] the notification data model
//! - [`ConnectionState`], [`Quality`], [`StatusChange`] simulated connectivity
//! - [`StatusBus`] thin wrapper over `tokio::sync::broadcast` for status changes
//!
//! ## Quick reference
//! - **Update producers**: `UpdateSource` (scheduled and manual emission).
//! - **Status producers**: `ConnectionSupervisor`.
//! - **Consumers**: `SubscriptionRegistry` subscribers, status receivers.

mod bus;
mod status;
mod update;

pub use bus::StatusBus;
pub use status::{ConnectionState, Quality, StatusChange};
pub use update::{Origin, Severity, Update, UpdateKind};
