//! Timestamp-ordered checkpoint trace.
//!
//! Invariant: stored timestamps are strictly increasing. A write at the
//! latest stored timestamp overwrites that entry's value instead of
//! appending a duplicate (last-write-wins for same-tick writes).

use crate::error::{CheckpointError, CheckpointResult};
use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, U256};

/// A single timestamped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub timestamp: Timestamp,
    pub value: U256,
}

/// Append-only history of a `U256` value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    checkpoints: Vec<Checkpoint>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` at `timestamp`.
    ///
    /// Appends when `timestamp` is greater than the latest stored timestamp,
    /// overwrites the latest entry when equal, and fails with
    /// [`CheckpointError::InvalidOrdering`] when lower.
    pub fn push(&mut self, timestamp: Timestamp, value: U256) -> CheckpointResult<()> {
        if let Some(last) = self.checkpoints.last_mut() {
            if timestamp < last.timestamp {
                return Err(CheckpointError::InvalidOrdering {
                    attempted: timestamp,
                    latest: last.timestamp,
                });
            }
            if timestamp == last.timestamp {
                last.value = value;
                return Ok(());
            }
        }
        self.checkpoints.push(Checkpoint { timestamp, value });
        Ok(())
    }

    /// Latest stored value, or zero if the trace is empty.
    pub fn latest(&self) -> U256 {
        self.checkpoints
            .last()
            .map(|c| c.value)
            .unwrap_or_else(U256::zero)
    }

    /// Latest `(timestamp, value)` pair, or `None` if nothing was ever
    /// stored. Use this when "never set" must be distinguished from
    /// "set to 0".
    pub fn latest_checkpoint(&self) -> Option<(Timestamp, U256)> {
        self.checkpoints.last().map(|c| (c.timestamp, c.value))
    }

    /// Value of the last entry with timestamp ≤ `timestamp`, or zero if no
    /// such entry exists. O(log n) binary search.
    pub fn upper_lookup(&self, timestamp: Timestamp) -> U256 {
        match self.upper_index(timestamp) {
            Some(idx) => self.checkpoints[idx].value,
            None => U256::zero(),
        }
    }

    /// Hinted variant of [`Trace::upper_lookup`].
    ///
    /// `hint` names the index of the last entry with timestamp ≤
    /// `timestamp`. A correct hint answers in O(1); an incorrect or stale
    /// hint is discarded and the binary search runs instead, so the result
    /// is identical either way.
    pub fn upper_lookup_recent(&self, timestamp: Timestamp, hint: Option<usize>) -> U256 {
        if let Some(idx) = hint {
            if self.hint_is_valid(timestamp, idx) {
                return self.checkpoints[idx].value;
            }
        }
        self.upper_lookup(timestamp)
    }

    /// Index of the last entry with timestamp ≤ `timestamp`, usable as a
    /// hint in later lookups at the same instant.
    pub fn upper_hint(&self, timestamp: Timestamp) -> Option<usize> {
        self.upper_index(timestamp)
    }

    /// Number of stored checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoint at a position, if in bounds.
    pub fn checkpoint_at(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    fn hint_is_valid(&self, timestamp: Timestamp, idx: usize) -> bool {
        if idx >= self.checkpoints.len() || self.checkpoints[idx].timestamp > timestamp {
            return false;
        }
        match self.checkpoints.get(idx + 1) {
            Some(next) => next.timestamp > timestamp,
            None => true,
        }
    }

    fn upper_index(&self, timestamp: Timestamp) -> Option<usize> {
        let after = self
            .checkpoints
            .partition_point(|c| c.timestamp <= timestamp);
        after.checked_sub(1)
    }
}
