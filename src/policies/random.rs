//! # Injectable randomness.
//!
//! Every probabilistic decision in the feed (emission delays, emission and
//! escalation rolls, message picks, connection checks) goes through a
//! [`RandomSource`]. The feed shares one source via [`Dice`].
//!
//! - [`ThreadRandom`] — `rand::rng()` (default)
//! - [`SeededRandom`] — reproducible `StdRng` stream
//! - [`ScriptedRandom`] — replays a fixed list of rolls (tests, demos)

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform rolls in `[0, 1)`.
pub trait RandomSource: Send + 'static {
    /// Returns the next roll. Values outside `[0, 1]` are clamped by [`Dice`].
    fn unit(&mut self) -> f64;
}

/// Thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn unit(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Deterministic generator seeded once.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed sequence of rolls, then repeats a tail value forever.
///
/// The default tail is `0.999`, which never passes a low-probability threshold.
///
/// ```rust
/// use feedvisor::{RandomSource, ScriptedRandom};
///
/// let mut r = ScriptedRandom::new([0.01, 0.5]).then(0.25);
/// assert_eq!(r.unit(), 0.01);
/// assert_eq!(r.unit(), 0.5);
/// assert_eq!(r.unit(), 0.25);
/// assert_eq!(r.unit(), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    rolls: VecDeque<f64>,
    tail: f64,
}

impl ScriptedRandom {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            tail: 0.999,
        }
    }

    /// Sets the value returned once the script is exhausted.
    pub fn then(mut self, tail: f64) -> Self {
        self.tail = tail;
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.tail)
    }
}

/// Shared, cloneable handle to a single [`RandomSource`].
#[derive(Clone)]
pub struct Dice {
    inner: Arc<Mutex<Box<dyn RandomSource>>>,
}

impl std::fmt::Debug for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dice").finish_non_exhaustive()
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new(ThreadRandom)
    }
}

impl Dice {
    pub fn new(source: impl RandomSource) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn RandomSource>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    /// Next roll, clamped into `[0, 1]` (non-finite values become `0`).
    pub fn roll(&self) -> f64 {
        let v = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unit();
        if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// `true` with probability `p`.
    pub fn chance(&self, p: f64) -> bool {
        self.roll() < p
    }

    /// Uniform index in `[0, len)`; `0` when `len == 0`.
    pub fn index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.roll() * len as f64) as usize).min(len - 1)
    }

    /// Uniform duration in `[lo, hi]`; `lo` when the range is empty.
    ///
    /// Never panics, even for spans close to `Duration::MAX`.
    pub fn between(&self, lo: Duration, hi: Duration) -> Duration {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo;
        let offset = Duration::try_from_secs_f64(span.as_secs_f64() * self.roll()).unwrap_or(span);
        lo.saturating_add(offset.min(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_clamps_out_of_range_values() {
        let dice = Dice::new(ScriptedRandom::new([-1.0, 7.0, f64::NAN]));
        assert_eq!(dice.roll(), 0.0);
        assert_eq!(dice.roll(), 1.0);
        assert_eq!(dice.roll(), 0.0);
    }

    #[test]
    fn test_index_stays_in_bounds() {
        let dice = Dice::new(ScriptedRandom::new([0.0, 0.5, 1.0]));
        assert_eq!(dice.index(4), 0);
        assert_eq!(dice.index(4), 2);
        assert_eq!(dice.index(4), 3);
        assert_eq!(dice.index(0), 0);
    }

    #[test]
    fn test_between_bounds() {
        let dice = Dice::new(SeededRandom::new(7));
        let lo = Duration::from_secs(5);
        let hi = Duration::from_secs(15);
        for _ in 0..200 {
            let d = dice.between(lo, hi);
            assert!(d >= lo && d <= hi, "{d:?} outside [{lo:?}, {hi:?}]");
        }
        assert_eq!(dice.between(hi, lo), hi);
    }

    #[test]
    fn test_between_survives_huge_spans() {
        let dice = Dice::new(ScriptedRandom::new([1.0, 0.999_999, 0.0]));
        assert_eq!(dice.between(Duration::ZERO, Duration::MAX), Duration::MAX);
        assert!(dice.between(Duration::from_secs(1), Duration::MAX) >= Duration::from_secs(1));
        assert_eq!(
            dice.between(Duration::from_secs(1), Duration::MAX),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_seeded_streams_repeat() {
        let a = Dice::new(SeededRandom::new(42));
        let b = Dice::new(SeededRandom::new(42));
        for _ in 0..16 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_clones_share_one_stream() {
        let a = Dice::new(ScriptedRandom::new([0.1, 0.2]));
        let b = a.clone();
        assert_eq!(a.roll(), 0.1);
        assert_eq!(b.roll(), 0.2);
    }
}
