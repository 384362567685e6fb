//! # Probability thresholds for the simulation.
//!
//! - [`ConnectionOdds`] — what a periodic connection check turns into
//! - [`EmissionOdds`] — whether a due emission fires, and whether it escalates
//!
//! A connection check consumes **one** roll and maps it onto consecutive bands:
//! ```text
//! 0 ── disconnect ──┬── poor ──┬── degrade ──┬──────── excellent ──────── 1
//!   Disconnected    │  Poor    │   Good      │   Excellent
//! ```

use crate::error::FeedError;
use crate::events::Quality;

/// Outcome of one connection check roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Drop the connection.
    Disconnect,
    /// Stay connected at the given quality.
    Quality(Quality),
}

/// Band widths for periodic connection checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionOdds {
    /// Probability of dropping the connection.
    pub disconnect: f64,
    /// Probability of reporting `Poor` quality.
    pub poor: f64,
    /// Probability of degrading to `Good` quality.
    pub degrade: f64,
}

impl Default for ConnectionOdds {
    /// `disconnect = 0.02`, `poor = 0.005`, `degrade = 0.01`.
    fn default() -> Self {
        Self {
            disconnect: 0.02,
            poor: 0.005,
            degrade: 0.01,
        }
    }
}

impl ConnectionOdds {
    /// Maps a roll in `[0, 1]` to a check outcome.
    pub fn classify(&self, roll: f64) -> CheckOutcome {
        let mut edge = self.disconnect;
        if roll < edge {
            return CheckOutcome::Disconnect;
        }
        edge += self.poor;
        if roll < edge {
            return CheckOutcome::Quality(Quality::Poor);
        }
        edge += self.degrade;
        if roll < edge {
            return CheckOutcome::Quality(Quality::Good);
        }
        CheckOutcome::Quality(Quality::Excellent)
    }

    pub fn validate(&self) -> Result<(), FeedError> {
        probability("connection.disconnect", self.disconnect)?;
        probability("connection.poor", self.poor)?;
        probability("connection.degrade", self.degrade)?;
        let total = self.disconnect + self.poor + self.degrade;
        if total > 1.0 {
            return Err(FeedError::invalid(
                "connection",
                format!("bands sum to {total}, above 1"),
            ));
        }
        Ok(())
    }
}

/// Rolls applied to scheduled emissions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionOdds {
    /// Probability that a due emission actually fires.
    pub emit: f64,
    /// Probability that a fired update escalates above `info`.
    pub escalate: f64,
}

impl Default for EmissionOdds {
    /// `emit = 0.4`, `escalate = 0.1`.
    fn default() -> Self {
        Self {
            emit: 0.4,
            escalate: 0.1,
        }
    }
}

impl EmissionOdds {
    pub fn validate(&self) -> Result<(), FeedError> {
        probability("emission.emit", self.emit)?;
        probability("emission.escalate", self.escalate)
    }
}

fn probability(field: &'static str, p: f64) -> Result<(), FeedError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(FeedError::invalid(field, format!("{p} is not a probability")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let odds = ConnectionOdds::default();
        assert_eq!(odds.classify(0.0), CheckOutcome::Disconnect);
        assert_eq!(odds.classify(0.019), CheckOutcome::Disconnect);
        assert_eq!(odds.classify(0.022), CheckOutcome::Quality(Quality::Poor));
        assert_eq!(odds.classify(0.03), CheckOutcome::Quality(Quality::Good));
        assert_eq!(odds.classify(0.5), CheckOutcome::Quality(Quality::Excellent));
        assert_eq!(odds.classify(1.0), CheckOutcome::Quality(Quality::Excellent));
    }

    #[test]
    fn test_zero_odds_never_disconnect() {
        let odds = ConnectionOdds {
            disconnect: 0.0,
            poor: 0.0,
            degrade: 0.0,
        };
        assert_eq!(odds.classify(0.0), CheckOutcome::Quality(Quality::Excellent));
    }

    #[test]
    fn test_validate_rejects_bad_probabilities() {
        let mut odds = ConnectionOdds::default();
        odds.disconnect = 1.5;
        assert!(odds.validate().is_err());

        let odds = ConnectionOdds {
            disconnect: 0.6,
            poor: 0.3,
            degrade: 0.3,
        };
        assert!(odds.validate().is_err());

        let emission = EmissionOdds {
            emit: f64::NAN,
            escalate: 0.1,
        };
        assert!(emission.validate().is_err());
        assert!(EmissionOdds::default().validate().is_ok());
    }
}
