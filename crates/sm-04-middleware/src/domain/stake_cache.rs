//! Per-epoch memoized stake aggregates.
//!
//! Absence means "not yet computed", never "zero". Presence is an explicit
//! map entry, not a sentinel value. Each entry is written at most once.

use serde::{Deserialize, Serialize};
use shared_types::{AssetClassId, Epoch, OperatorId, U256, ValidationId};
use std::collections::HashMap;

/// Write-once-per-epoch stake caches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpochStakeCache {
    class_totals: HashMap<(Epoch, AssetClassId), U256>,
    operator_stakes: HashMap<(Epoch, AssetClassId, OperatorId), U256>,
    node_stakes: HashMap<(Epoch, ValidationId), U256>,
}

impl EpochStakeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached class total, if computed.
    pub fn class_total(&self, epoch: Epoch, asset_class: AssetClassId) -> Option<U256> {
        self.class_totals.get(&(epoch, asset_class)).copied()
    }

    /// Cached operator stake, if computed.
    pub fn operator_stake(
        &self,
        epoch: Epoch,
        asset_class: AssetClassId,
        operator: OperatorId,
    ) -> Option<U256> {
        self.operator_stakes
            .get(&(epoch, asset_class, operator))
            .copied()
    }

    /// Cached node stake, if computed.
    pub fn node_stake(&self, epoch: Epoch, validation_id: ValidationId) -> Option<U256> {
        self.node_stakes.get(&(epoch, validation_id)).copied()
    }

    /// Store a class total unless one is already present. Returns the value
    /// that ends up cached.
    pub fn cache_class_total(
        &mut self,
        epoch: Epoch,
        asset_class: AssetClassId,
        total: U256,
    ) -> U256 {
        *self.class_totals.entry((epoch, asset_class)).or_insert(total)
    }

    /// Store an operator stake unless one is already present.
    pub fn cache_operator_stake(
        &mut self,
        epoch: Epoch,
        asset_class: AssetClassId,
        operator: OperatorId,
        stake: U256,
    ) -> U256 {
        *self
            .operator_stakes
            .entry((epoch, asset_class, operator))
            .or_insert(stake)
    }

    /// Store a node stake unless one is already present.
    pub fn cache_node_stake(
        &mut self,
        epoch: Epoch,
        validation_id: ValidationId,
        stake: U256,
    ) -> U256 {
        *self.node_stakes.entry((epoch, validation_id)).or_insert(stake)
    }
}
