//! Pending transitions keyed by the time left until they mature.
//!
//! Each entry holds the number of infected humans that turn into zombies
//! once their remaining time reaches zero. Entries sharing the exact same
//! remaining time are merged into one.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QueueError {
    #[error("delay must be a non-negative, finite number (got {0})")]
    InvalidDelay(f64),
}

/// Remaining time of a queue entry. Ordered with `f64::total_cmp`; only
/// finite values are ever stored and `-0.0` is normalised to `0.0`.
#[derive(Debug, Clone, Copy)]
struct Remaining(f64);

impl Remaining {
    fn new(value: f64) -> Self {
        Self(value + 0.0)
    }
}

impl PartialEq for Remaining {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Remaining {}

impl PartialOrd for Remaining {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Remaining {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DelayQueue {
    entries: BTreeMap<Remaining, u64>,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` transitions maturing after `delay`. Counts already
    /// pending at the same delay are summed; a zero count is ignored.
    pub fn schedule(&mut self, delay: f64, count: u64) -> Result<(), QueueError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(QueueError::InvalidDelay(delay));
        }
        if count == 0 {
            return Ok(());
        }
        *self.entries.entry(Remaining::new(delay)).or_insert(0) += count;
        Ok(())
    }

    /// Moves every entry `elapsed` closer to maturity and returns the total
    /// count of entries whose remaining time dropped to zero or below.
    pub fn advance(&mut self, elapsed: f64) -> u64 {
        let mut matured = 0;
        let mut pending = BTreeMap::new();
        for (remaining, count) in std::mem::take(&mut self.entries) {
            let left = remaining.0 - elapsed;
            if left <= 0.0 {
                matured += count;
            } else {
                *pending.entry(Remaining::new(left)).or_insert(0) += count;
            }
        }
        self.entries = pending;
        matured
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct maturity times.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all pending counts.
    pub fn pending_total(&self) -> u64 {
        self.entries.values().sum()
    }

    pub fn next_maturity(&self) -> Option<f64> {
        self.entries.keys().next().map(|remaining| remaining.0)
    }

    /// Entries as `(remaining, count)`, soonest first.
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.entries
            .iter()
            .map(|(remaining, count)| (remaining.0, *count))
    }
}
