//! # Emission interval policy.
//!
//! [`EmissionInterval`] bounds the randomized wait between two scheduled
//! emission attempts. Each wait is drawn uniformly from `[min, max]`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use feedvisor::{Dice, EmissionInterval, ScriptedRandom};
//!
//! let every = EmissionInterval::new(Duration::from_secs(5), Duration::from_secs(15));
//! let dice = Dice::new(ScriptedRandom::new([0.0, 0.5]));
//!
//! assert_eq!(every.sample(&dice), Duration::from_secs(5));
//! assert_eq!(every.sample(&dice), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::error::FeedError;
use crate::policies::random::Dice;

/// Upper bound accepted for any configured delay (one year).
pub const MAX_DELAY: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Uniform delay range for the emission timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmissionInterval {
    /// Shortest wait.
    pub min: Duration,
    /// Longest wait.
    pub max: Duration,
}

impl Default for EmissionInterval {
    /// `5s..=15s`.
    fn default() -> Self {
        Self {
            min: Duration::from_secs(5),
            max: Duration::from_secs(15),
        }
    }
}

impl EmissionInterval {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Draws the next wait.
    pub fn sample(&self, dice: &Dice) -> Duration {
        dice.between(self.min, self.max)
    }

    /// Rejects empty, inverted or unbounded ranges.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.min.is_zero() {
            return Err(FeedError::invalid("interval.min", "must be greater than zero"));
        }
        if self.max < self.min {
            return Err(FeedError::invalid(
                "interval.max",
                format!("{:?} is shorter than min {:?}", self.max, self.min),
            ));
        }
        if self.max > MAX_DELAY {
            return Err(FeedError::invalid(
                "interval.max",
                format!("{:?} exceeds {:?}", self.max, MAX_DELAY),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_valid() {
        assert!(EmissionInterval::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = EmissionInterval::new(Duration::from_secs(10), Duration::from_secs(1))
            .validate()
            .unwrap_err();
        assert_eq!(err.as_label(), "feed_invalid_config");
    }

    #[test]
    fn test_zero_min_rejected() {
        assert!(
            EmissionInterval::new(Duration::ZERO, Duration::from_secs(1))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_unbounded_max_rejected() {
        let err = EmissionInterval::new(Duration::from_secs(1), Duration::MAX)
            .validate()
            .unwrap_err();
        match err {
            FeedError::InvalidConfig { field, .. } => assert_eq!(field, "interval.max"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_fixed_range_always_returns_min() {
        let every = EmissionInterval::new(Duration::from_secs(3), Duration::from_secs(3));
        let dice = Dice::default();
        for _ in 0..10 {
            assert_eq!(every.sample(&dice), Duration::from_secs(3));
        }
    }
}
