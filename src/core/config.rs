//! # Feed configuration.
//!
//! Provides [`FeedConfig`], the centralized settings injected into an
//! [`UpdateFeed`](crate::UpdateFeed) at construction.
//!
//! ## Sentinel values
//! - `max_updates = 0` → clamped to 1 (the log always keeps the newest update)
//! - `status_capacity = 0` → clamped to 1 (minimum broadcast capacity)
//!
//! Delays above [`MAX_DELAY`] (one year) are rejected by [`FeedConfig::validate`].

use std::time::Duration;

use crate::error::FeedError;
use crate::policies::{ConnectionOdds, EmissionInterval, EmissionOdds, MAX_DELAY};

/// Configuration for an update feed.
///
/// ## Field semantics
/// - `max_updates`: rolling log length; oldest entries evicted first
/// - `interval`: uniform wait between scheduled emission attempts
/// - `emission`: emit / escalate probabilities for scheduled updates
/// - `check_interval`: period of connection checks while connected
/// - `reconnect_delay`: fixed wait between a drop and the automatic reconnect
/// - `connection`: disconnect / quality bands for each check
/// - `status_capacity`: status bus ring buffer size
///
/// ## Notes
/// All fields are public. Call [`FeedConfig::validate`] (done by the builder) before use.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedConfig {
    /// Maximum number of updates retained, newest first.
    pub max_updates: usize,

    /// Randomized wait between scheduled emission attempts.
    pub interval: EmissionInterval,

    /// Probabilities applied when an emission attempt is due.
    pub emission: EmissionOdds,

    /// How often connectivity is re-rolled while connected.
    ///
    /// Checks pause while disconnected; the pending reconnect is the only timer then.
    pub check_interval: Duration,

    /// Delay before a dropped connection comes back on its own.
    pub reconnect_delay: Duration,

    /// Probability bands for connection checks.
    pub connection: ConnectionOdds,

    /// Capacity of the status-change broadcast channel.
    pub status_capacity: usize,
}

impl FeedConfig {
    /// Rolling log length clamped to a minimum of 1.
    #[inline]
    pub fn max_updates_clamped(&self) -> usize {
        self.max_updates.max(1)
    }

    /// Status bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn status_capacity_clamped(&self) -> usize {
        self.status_capacity.max(1)
    }

    /// Checks every field; the first offending one is reported.
    pub fn validate(&self) -> Result<(), FeedError> {
        self.interval.validate()?;
        self.emission.validate()?;
        self.connection.validate()?;
        if self.check_interval.is_zero() {
            return Err(FeedError::invalid(
                "check_interval",
                "must be greater than zero",
            ));
        }
        for (field, delay) in [
            ("check_interval", self.check_interval),
            ("reconnect_delay", self.reconnect_delay),
        ] {
            if delay > MAX_DELAY {
                return Err(FeedError::invalid(
                    field,
                    format!("{delay:?} exceeds {MAX_DELAY:?}"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    /// Default configuration:
    ///
    /// - `max_updates = 50`
    /// - `interval = 5s..=15s`
    /// - `emission = EmissionOdds::default()` (emit 0.4, escalate 0.1)
    /// - `check_interval = 5s`
    /// - `reconnect_delay = 3s`
    /// - `connection = ConnectionOdds::default()` (disconnect 0.02)
    /// - `status_capacity = 64`
    fn default() -> Self {
        Self {
            max_updates: 50,
            interval: EmissionInterval::default(),
            emission: EmissionOdds::default(),
            check_interval: Duration::from_secs(5),
            reconnect_delay: Duration::from_secs(3),
            connection: ConnectionOdds::default(),
            status_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FeedConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_sizes_are_clamped() {
        let cfg = FeedConfig {
            max_updates: 0,
            status_capacity: 0,
            ..FeedConfig::default()
        };
        assert_eq!(cfg.max_updates_clamped(), 1);
        assert_eq!(cfg.status_capacity_clamped(), 1);
    }

    #[test]
    fn test_zero_check_interval_rejected() {
        let cfg = FeedConfig {
            check_interval: Duration::ZERO,
            ..FeedConfig::default()
        };
        match cfg.validate() {
            Err(FeedError::InvalidConfig { field, .. }) => assert_eq!(field, "check_interval"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_unbounded_reconnect_delay_rejected() {
        let cfg = FeedConfig {
            reconnect_delay: Duration::MAX,
            ..FeedConfig::default()
        };
        match cfg.validate() {
            Err(FeedError::InvalidConfig { field, .. }) => assert_eq!(field, "reconnect_delay"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_nested_policy_errors_surface() {
        let mut cfg = FeedConfig::default();
        cfg.emission.emit = 2.0;
        assert!(cfg.validate().is_err());
    }
}
