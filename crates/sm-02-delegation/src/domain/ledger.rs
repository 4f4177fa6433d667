//! Checkpointed share ledger for one vault.
//!
//! Keys:
//! - `(l1, asset_class)` → max limit (plain ceiling), limit trace, total
//!   shares trace
//! - `(l1, asset_class, operator)` → operator shares trace
//!
//! Invariant: the total-shares trace always equals the sum of every operator
//! trace for the pair, at every stored timestamp. The total is maintained
//! incrementally (`total - old + new`) on each share update.

use crate::error::{DelegationError, DelegationResult};
use primitive_types::U512;
use serde::{Deserialize, Serialize};
use shared_types::{AssetClassId, L1Id, OperatorId, Timestamp, U256};
use sm_01_checkpoints::Trace;
use std::collections::HashMap;

type PairKey = (L1Id, AssetClassId);
type OperatorKey = (L1Id, AssetClassId, OperatorId);

/// Checkpoint position hints for a historical stake query.
///
/// Each hint names the index of the relevant checkpoint at the queried
/// instant. Hints are advisory: a stale or wrong hint costs a binary search,
/// never a wrong answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StakeHints {
    pub active_stake_hint: Option<usize>,
    pub l1_limit_hint: Option<usize>,
    pub operator_shares_hint: Option<usize>,
    pub total_shares_hint: Option<usize>,
    pub vault_opt_in_hint: Option<usize>,
    pub l1_opt_in_hint: Option<usize>,
}

/// Proportional operator stake with conservative floor rounding.
///
/// Returns `shares * min(vault_stake, l1_limit) / total_shares`, or zero
/// when no shares exist. Floor division means the stakes of all operators
/// of a pair can sum to at most the pool, never above it.
pub fn proportional_stake(
    shares: U256,
    total_shares: U256,
    vault_stake: U256,
    l1_limit: U256,
) -> U256 {
    if total_shares.is_zero() {
        return U256::zero();
    }
    let pool = vault_stake.min(l1_limit);
    let scaled = shares.full_mul(pool) / U512::from(total_shares);
    // shares never exceed the pair's total, so the quotient fits
    U256::try_from(scaled).unwrap_or(U256::MAX)
}

/// Delegation state for one vault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareLedger {
    max_l1_limits: HashMap<PairKey, U256>,
    l1_limits: HashMap<PairKey, Trace>,
    total_shares: HashMap<PairKey, Trace>,
    operator_shares: HashMap<OperatorKey, Trace>,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ceiling an L1 allows for its own delegation.
    ///
    /// Lowering the ceiling below the currently configured limit clamps the
    /// limit down by pushing a checkpoint, so effective delegation can only
    /// ever decrease here, never silently increase.
    pub fn set_max_l1_limit(
        &mut self,
        l1: L1Id,
        asset_class: AssetClassId,
        amount: U256,
        now: Timestamp,
    ) -> DelegationResult<()> {
        let key = (l1, asset_class);
        if self.max_l1_limits.get(&key) == Some(&amount) {
            return Err(DelegationError::AlreadySet);
        }
        self.max_l1_limits.insert(key, amount);

        if let Some(limit_trace) = self.l1_limits.get_mut(&key) {
            if limit_trace.latest() > amount {
                limit_trace.push(now, amount)?;
            }
        }
        Ok(())
    }

    /// Set the effective delegation limit for a pair.
    pub fn set_l1_limit(
        &mut self,
        l1: L1Id,
        asset_class: AssetClassId,
        amount: U256,
        now: Timestamp,
    ) -> DelegationResult<()> {
        let key = (l1, asset_class);
        let max = *self
            .max_l1_limits
            .get(&key)
            .ok_or(DelegationError::MaxL1LimitNotSet)?;
        if amount > max {
            return Err(DelegationError::ExceedsMaxL1Limit { amount, max });
        }
        let trace = self.l1_limits.entry(key).or_default();
        if trace.latest() == amount && !trace.is_empty() {
            return Err(DelegationError::AlreadySet);
        }
        trace.push(now, amount)?;
        Ok(())
    }

    /// Set an operator's shares, updating the pair total in the same tick.
    pub fn set_operator_shares(
        &mut self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        shares: U256,
        now: Timestamp,
    ) -> DelegationResult<()> {
        let pair = (l1, asset_class);
        let trace = self
            .operator_shares
            .entry((l1, asset_class, operator))
            .or_default();
        let old = trace.latest();
        if old == shares {
            return Err(DelegationError::AlreadySet);
        }
        trace.push(now, shares)?;

        let total_trace = self.total_shares.entry(pair).or_default();
        let total = total_trace.latest() - old + shares;
        total_trace.push(now, total)?;
        Ok(())
    }

    /// Ceiling for a pair, `None` if the L1 never configured one.
    pub fn max_l1_limit(&self, l1: L1Id, asset_class: AssetClassId) -> Option<U256> {
        self.max_l1_limits.get(&(l1, asset_class)).copied()
    }

    /// Current effective limit for a pair.
    pub fn l1_limit(&self, l1: L1Id, asset_class: AssetClassId) -> U256 {
        self.l1_limits
            .get(&(l1, asset_class))
            .map(Trace::latest)
            .unwrap_or_else(U256::zero)
    }

    /// Effective limit for a pair at a past instant.
    pub fn l1_limit_at(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        timestamp: Timestamp,
        hint: Option<usize>,
    ) -> U256 {
        self.l1_limits
            .get(&(l1, asset_class))
            .map(|t| t.upper_lookup_recent(timestamp, hint))
            .unwrap_or_else(U256::zero)
    }

    /// Current shares of one operator.
    pub fn operator_shares(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
    ) -> U256 {
        self.operator_shares
            .get(&(l1, asset_class, operator))
            .map(Trace::latest)
            .unwrap_or_else(U256::zero)
    }

    /// Shares of one operator at a past instant.
    pub fn operator_shares_at(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
        hint: Option<usize>,
    ) -> U256 {
        self.operator_shares
            .get(&(l1, asset_class, operator))
            .map(|t| t.upper_lookup_recent(timestamp, hint))
            .unwrap_or_else(U256::zero)
    }

    /// Current total shares of a pair.
    pub fn total_operator_shares(&self, l1: L1Id, asset_class: AssetClassId) -> U256 {
        self.total_shares
            .get(&(l1, asset_class))
            .map(Trace::latest)
            .unwrap_or_else(U256::zero)
    }

    /// Total shares of a pair at a past instant.
    pub fn total_operator_shares_at(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        timestamp: Timestamp,
        hint: Option<usize>,
    ) -> U256 {
        self.total_shares
            .get(&(l1, asset_class))
            .map(|t| t.upper_lookup_recent(timestamp, hint))
            .unwrap_or_else(U256::zero)
    }

    /// Build lookup hints for a later historical query at `timestamp`.
    pub fn hints_at(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
    ) -> StakeHints {
        StakeHints {
            active_stake_hint: None,
            l1_limit_hint: self
                .l1_limits
                .get(&(l1, asset_class))
                .and_then(|t| t.upper_hint(timestamp)),
            operator_shares_hint: self
                .operator_shares
                .get(&(l1, asset_class, operator))
                .and_then(|t| t.upper_hint(timestamp)),
            total_shares_hint: self
                .total_shares
                .get(&(l1, asset_class))
                .and_then(|t| t.upper_hint(timestamp)),
            vault_opt_in_hint: None,
            l1_opt_in_hint: None,
        }
    }
}
