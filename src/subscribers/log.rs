//! # LogWriter — update tracer
//!
//! A minimal subscriber that forwards incoming [`Update`]s to `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO feed.update kind=audit severity=Info origin=Scheduled title="Audit Completed"
//! WARN feed.update kind=compliance severity=Warning origin=Scheduled title="Policy Violation"
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::SubscriberError;
use crate::events::{Severity, Update};
use crate::subscribers::Subscribe;

/// Update writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_update(&self, u: &Update) -> Result<(), SubscriberError> {
        match u.severity {
            Severity::Info | Severity::Success => info!(
                event = "feed.update",
                kind = %u.kind,
                severity = ?u.severity,
                origin = ?u.origin,
                seq = u.seq,
                title = %u.title,
                message = %u.message,
            ),
            Severity::Warning => warn!(
                event = "feed.update",
                kind = %u.kind,
                severity = ?u.severity,
                origin = ?u.origin,
                seq = u.seq,
                title = %u.title,
                message = %u.message,
            ),
            Severity::Error => error!(
                event = "feed.update",
                kind = %u.kind,
                severity = ?u.severity,
                origin = ?u.origin,
                seq = u.seq,
                title = %u.title,
                message = %u.message,
            ),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::UpdateKind;

    #[tokio::test]
    async fn test_never_fails() {
        let w = LogWriter::new();
        for sev in [Severity::Info, Severity::Warning, Severity::Error, Severity::Success] {
            let up = Update::new(UpdateKind::System, "t", "m").with_severity(sev);
            assert!(w.on_update(&up).await.is_ok());
        }
        assert_eq!(w.name(), "LogWriter");
    }
}
