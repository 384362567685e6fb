//! # Synthetic updates delivered to feed subscribers.
//!
//! The [`UpdateKind`] enum classifies the simulated domain an update belongs to:
//! - **Governance**: compliance evaluations and audits
//! - **Delivery**: AI projects and team performance
//! - **Platform**: system-level notices
//!
//! The [`Update`] struct carries the display strings, severity, timestamp and an
//! optional free-form JSON payload.
//!
//! ## Ordering guarantees
//! Each update has a process-wide sequence number (`seq`) that increases monotonically.
//! A feed re-stamps `seq` and `timestamp` at the moment it records an update, so
//! its newest-first list is always in strictly decreasing `seq` order.
//! Wall-clock `timestamp` is for display; use `seq` when ordering matters.
//!
//! ## Example
//! ```rust
//! use feedvisor::{Severity, Update, UpdateKind};
//!
//! let up = Update::new(UpdateKind::Audit, "Audit Completed", "Q3 audit closed")
//!     .with_severity(Severity::Success)
//!     .with_data(serde_json::json!({ "findings": 2 }));
//!
//! assert_eq!(up.kind, UpdateKind::Audit);
//! assert_eq!(up.severity, Severity::Success);
//! assert!(up.data.is_some());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Global sequence counter for update ordering.
static UPDATE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Domain an update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// Compliance evaluation results and policy checks.
    Compliance,
    /// Audit scheduling and findings.
    Audit,
    /// AI project lifecycle (deployments, model versions).
    Project,
    /// Team performance and membership.
    Team,
    /// Platform maintenance and health notices.
    System,
}

impl UpdateKind {
    /// Every kind, in declaration order.
    pub const ALL: [UpdateKind; 5] = [
        UpdateKind::Compliance,
        UpdateKind::Audit,
        UpdateKind::Project,
        UpdateKind::Team,
        UpdateKind::System,
    ];

    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            UpdateKind::Compliance => "compliance",
            UpdateKind::Audit => "audit",
            UpdateKind::Project => "project",
            UpdateKind::Team => "team",
            UpdateKind::System => "system",
        }
    }

    /// Severity a scheduled update of this kind takes when the escalation roll hits.
    pub fn escalated_severity(&self) -> Severity {
        match self {
            UpdateKind::Compliance | UpdateKind::Audit => Severity::Warning,
            UpdateKind::Project | UpdateKind::Team => Severity::Success,
            UpdateKind::System => Severity::Error,
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_label())
    }
}

/// Display severity of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

/// How the update came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Produced by the randomized emission timer.
    Scheduled,
    /// Produced by an explicit refresh request.
    Manual,
}

/// Notification record fanned out to subscribers.
///
/// - `id`: unique per update (UUID v4)
/// - `seq`: monotonic global sequence for ordering
/// - `timestamp`: wall-clock creation time, never modified afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Unique identifier assigned at creation.
    pub id: Uuid,
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Domain classification.
    pub kind: UpdateKind,
    /// Short headline.
    pub title: String,
    /// Human-readable body.
    pub message: String,
    /// Wall-clock creation time.
    pub timestamp: SystemTime,
    /// Display severity.
    pub severity: Severity,
    /// Scheduled vs manual.
    pub origin: Origin,
    /// Optional payload attached by the emitter.
    pub data: Option<Value>,
}

impl Update {
    /// Creates a scheduled `info` update stamped with the current time and next sequence number.
    pub fn new(kind: UpdateKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            seq: UPDATE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: SystemTime::now(),
            severity: Severity::Info,
            origin: Origin::Scheduled,
            data: None,
        }
    }

    /// Sets the severity.
    #[inline]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches a payload.
    #[inline]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches a payload if one is given.
    #[inline]
    pub fn with_optional_data(mut self, data: Option<Value>) -> Self {
        self.data = data;
        self
    }

    /// Marks the update as produced by an explicit refresh.
    #[inline]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Takes the next sequence number and the current time.
    ///
    /// Called under the log lock so insertion order and `seq` order agree.
    pub(crate) fn restamp(&mut self) {
        self.seq = UPDATE_SEQ.fetch_add(1, AtomicOrdering::Relaxed);
        self.timestamp = SystemTime::now();
    }

    #[inline]
    pub fn is_manual(&self) -> bool {
        matches!(self.origin, Origin::Manual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_and_seq_are_unique() {
        let a = Update::new(UpdateKind::Team, "a", "a");
        let b = Update::new(UpdateKind::Team, "b", "b");
        assert_ne!(a.id, b.id);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_defaults_to_scheduled_info() {
        let up = Update::new(UpdateKind::System, "t", "m");
        assert_eq!(up.severity, Severity::Info);
        assert_eq!(up.origin, Origin::Scheduled);
        assert!(!up.is_manual());
        assert!(up.data.is_none());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&UpdateKind::Compliance).unwrap();
        assert_eq!(json, "\"compliance\"");
        assert_eq!(UpdateKind::Project.to_string(), "project");
    }
}
