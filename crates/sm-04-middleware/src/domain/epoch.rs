//! Epoch arithmetic.
//!
//! Epochs are contiguous, non-overlapping integers starting at 0, derived
//! from timestamps, never stored.

use crate::error::{MiddlewareError, MiddlewareResult};
use serde::{Deserialize, Serialize};
use shared_types::{Epoch, Timestamp};

/// Pure mapping between timestamps and epoch indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochSchedule {
    /// Timestamp of the start of epoch 0.
    pub start_time: Timestamp,
    /// Epoch length in seconds. Must be non-zero.
    pub epoch_duration: Timestamp,
}

impl EpochSchedule {
    pub fn new(start_time: Timestamp, epoch_duration: Timestamp) -> Self {
        Self {
            start_time,
            epoch_duration,
        }
    }

    /// Start timestamp of an epoch.
    pub fn epoch_start_ts(&self, epoch: Epoch) -> Timestamp {
        self.start_time + epoch * self.epoch_duration
    }

    /// Epoch containing a timestamp.
    pub fn epoch_at_ts(&self, timestamp: Timestamp) -> MiddlewareResult<Epoch> {
        if timestamp < self.start_time {
            return Err(MiddlewareError::TimestampBeforeStart {
                timestamp,
                start_time: self.start_time,
            });
        }
        Ok((timestamp - self.start_time) / self.epoch_duration)
    }
}
