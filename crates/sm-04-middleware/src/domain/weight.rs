//! Stake ↔ weight conversion.
//!
//! The external validator-set manager accounts in `u64` weight units; the
//! core accounts in `U256` stake. Conversions round down.

use serde::{Deserialize, Serialize};
use shared_types::U256;

/// Fixed scale factor between stake and manager weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightScaler {
    /// Stake units per single unit of weight. Must be non-zero.
    pub stake_per_weight: U256,
}

impl WeightScaler {
    pub fn new(stake_per_weight: U256) -> Self {
        Self {
            stake_per_weight: stake_per_weight.max(U256::one()),
        }
    }

    /// Convert stake to manager weight, rounding down and saturating at
    /// `u64::MAX`.
    pub fn stake_to_weight(&self, stake: U256) -> u64 {
        let weight = stake / self.stake_per_weight;
        if weight > U256::from(u64::MAX) {
            u64::MAX
        } else {
            weight.as_u64()
        }
    }

    /// Convert manager weight back to stake.
    pub fn weight_to_stake(&self, weight: u64) -> U256 {
        U256::from(weight) * self.stake_per_weight
    }
}
