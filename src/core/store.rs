//! # Rolling update log.
//!
//! [`UpdateLog`] keeps the most recent updates, newest first, bounded to a fixed
//! capacity. Insertion order defines the order; entries are never re-sorted.
//!
//! ## Rules
//! - `push` inserts at the front; when full, the oldest entry is evicted (FIFO)
//! - `clear` empties the log but keeps `last_update`
//! - readers get owned snapshots

use std::collections::VecDeque;
use std::time::SystemTime;

use crate::events::Update;

/// Bounded newest-first list of updates.
#[derive(Debug, Clone)]
pub struct UpdateLog {
    capacity: usize,
    entries: VecDeque<Update>,
    last_update: Option<SystemTime>,
}

impl UpdateLog {
    /// Creates an empty log (`capacity` clamped to a minimum of 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            last_update: None,
        }
    }

    /// Records an update; returns the evicted entry when the log was full.
    pub fn push(&mut self, update: Update) -> Option<Update> {
        self.last_update = Some(update.timestamp);
        self.entries.push_front(update);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Owned copy of the entries, newest first.
    pub fn snapshot(&self) -> Vec<Update> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Update> {
        self.entries.front()
    }

    /// Timestamp of the most recently recorded update, even if since cleared.
    pub fn last_update(&self) -> Option<SystemTime> {
        self.last_update
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
