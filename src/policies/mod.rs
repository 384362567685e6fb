//! Simulation policies.
//!
//! This module groups the knobs that control **when** the feed emits and
//! **how** the simulated connection behaves.
//!
//! ## Contents
//! - [`RandomSource`], [`Dice`] injectable randomness shared by the whole feed
//! - [`EmissionInterval`] uniform wait between scheduled emission attempts
//! - [`EmissionOdds`] emission and severity-escalation probabilities
//! - [`ConnectionOdds`] disconnect / quality bands for periodic checks
//!
//! ## Defaults
//! - `EmissionInterval::default()` → 5s..=15s.
//! - `EmissionOdds::default()` → emit 0.4, escalate 0.1.
//! - `ConnectionOdds::default()` → disconnect 0.02, poor 0.005, degrade 0.01.
//! - `Dice::default()` → `ThreadRandom`.

mod interval;
mod odds;
mod random;

pub use interval::{EmissionInterval, MAX_DELAY};
pub use odds::{CheckOutcome, ConnectionOdds, EmissionOdds};
pub use random::{Dice, RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
