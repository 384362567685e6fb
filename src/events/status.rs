//! # Connectivity notifications emitted by the connection supervisor.
//!
//! [`StatusChange`] is published on every connect/disconnect transition so that
//! status indicators can follow connectivity without consuming the update feed.
//! Quality-only changes while connected are **not** published.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Global sequence counter for status notifications.
static STATUS_SEQ: AtomicU64 = AtomicU64::new(0);

/// Simulated feed health while connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Excellent,
    Good,
    Poor,
}

impl Quality {
    pub fn as_label(&self) -> &'static str {
        match self {
            Quality::Excellent => "excellent",
            Quality::Good => "good",
            Quality::Poor => "poor",
        }
    }
}

/// Simulated connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connected(Quality),
    Disconnected,
}

impl Default for ConnectionState {
    /// `Connected(Excellent)`, the state every feed starts in.
    fn default() -> Self {
        ConnectionState::Connected(Quality::Excellent)
    }
}

impl ConnectionState {
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    /// Quality, meaningful only while connected.
    #[inline]
    pub fn quality(&self) -> Option<Quality> {
        match self {
            ConnectionState::Connected(q) => Some(*q),
            ConnectionState::Disconnected => None,
        }
    }
}

/// Connect/disconnect notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Monotonic sequence number across all status notifications.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// `true` after a reconnect, `false` after a drop.
    pub connected: bool,
    /// Quality after the transition (`None` when disconnected).
    pub quality: Option<Quality>,
}

impl StatusChange {
    /// Builds a notification describing the state just entered.
    pub fn entered(state: ConnectionState) -> Self {
        Self {
            seq: STATUS_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            connected: state.is_connected(),
            quality: state.quality(),
        }
    }
}
