//! Delegator service - authorization and stake computation over the ledger.

use crate::domain::{proportional_stake, ShareLedger, StakeHints};
use crate::error::{DelegationError, DelegationResult};
use crate::ports::{OptInRegistry, SlashHook, TimeSource, VaultStakeSource};
use parking_lot::RwLock;
use shared_types::{fmt_address, Address, AssetClassId, L1Id, OperatorId, Timestamp, U256, VaultId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Static configuration of one delegator instance.
#[derive(Debug, Clone)]
pub struct DelegatorConfig {
    /// The vault this delegator is bound to (1:1).
    pub vault: VaultId,
    /// Addresses allowed to call [`Delegator::set_l1_limit`].
    pub limit_setters: HashSet<Address>,
    /// Addresses allowed to call [`Delegator::set_operator_l1_shares`].
    pub share_setters: HashSet<Address>,
}

/// Delegator
///
/// Owns the [`ShareLedger`] for one vault and converts stored shares plus
/// the vault's live balance and the per-L1 limit into effective operator
/// stake. Operators that are not opted in to both the vault and the L1 have
/// stake zero regardless of shares.
pub struct Delegator<V, O, T>
where
    V: VaultStakeSource,
    O: OptInRegistry,
    T: TimeSource,
{
    vault_source: Arc<V>,
    operator_vault_opt_in: Arc<O>,
    operator_l1_opt_in: Arc<O>,
    time_source: Arc<T>,
    slash_hook: Option<Arc<dyn SlashHook>>,
    ledger: RwLock<ShareLedger>,
    config: DelegatorConfig,
}

impl<V, O, T> Delegator<V, O, T>
where
    V: VaultStakeSource,
    O: OptInRegistry,
    T: TimeSource,
{
    /// Create a new Delegator
    pub fn new(
        vault_source: Arc<V>,
        operator_vault_opt_in: Arc<O>,
        operator_l1_opt_in: Arc<O>,
        time_source: Arc<T>,
        config: DelegatorConfig,
    ) -> Self {
        Self {
            vault_source,
            operator_vault_opt_in,
            operator_l1_opt_in,
            time_source,
            slash_hook: None,
            ledger: RwLock::new(ShareLedger::new()),
            config,
        }
    }

    /// Attach an optional slash-notification hook.
    pub fn with_slash_hook(mut self, hook: Arc<dyn SlashHook>) -> Self {
        self.slash_hook = Some(hook);
        self
    }

    // === WRITE PATH ===

    /// Set the ceiling for a pair. Callable only by the L1 itself.
    pub fn set_max_l1_limit(
        &self,
        caller: Address,
        l1: L1Id,
        asset_class: AssetClassId,
        amount: U256,
    ) -> DelegationResult<()> {
        if caller != l1 {
            return Err(DelegationError::Unauthorized);
        }
        let now = self.time_source.now();
        self.ledger
            .write()
            .set_max_l1_limit(l1, asset_class, amount, now)?;
        debug!(l1 = %fmt_address(&l1), asset_class, %amount, "max L1 limit set");
        Ok(())
    }

    /// Set the effective limit for a pair. Requires the limit-setter role.
    pub fn set_l1_limit(
        &self,
        caller: Address,
        l1: L1Id,
        asset_class: AssetClassId,
        amount: U256,
    ) -> DelegationResult<()> {
        if !self.config.limit_setters.contains(&caller) {
            return Err(DelegationError::Unauthorized);
        }
        let now = self.time_source.now();
        self.ledger
            .write()
            .set_l1_limit(l1, asset_class, amount, now)?;
        debug!(l1 = %fmt_address(&l1), asset_class, %amount, "L1 limit set");
        Ok(())
    }

    /// Set an operator's shares. Requires the shares-setter role.
    pub fn set_operator_l1_shares(
        &self,
        caller: Address,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        shares: U256,
    ) -> DelegationResult<()> {
        if !self.config.share_setters.contains(&caller) {
            return Err(DelegationError::Unauthorized);
        }
        let now = self.time_source.now();
        self.ledger
            .write()
            .set_operator_shares(l1, asset_class, operator, shares, now)?;
        debug!(
            l1 = %fmt_address(&l1),
            asset_class,
            operator = %fmt_address(&operator),
            %shares,
            "operator shares set"
        );
        Ok(())
    }

    // === READ PATH ===

    /// Current effective stake of an operator.
    pub fn stake(&self, l1: L1Id, asset_class: AssetClassId, operator: OperatorId) -> U256 {
        if !self.operator_vault_opt_in.is_opted_in(operator, self.config.vault)
            || !self.operator_l1_opt_in.is_opted_in(operator, l1)
        {
            return U256::zero();
        }
        let ledger = self.ledger.read();
        proportional_stake(
            ledger.operator_shares(l1, asset_class, operator),
            ledger.total_operator_shares(l1, asset_class),
            self.vault_source.active_stake(),
            ledger.l1_limit(l1, asset_class),
        )
    }

    /// Effective stake of an operator at a past instant.
    pub fn stake_at(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
        hints: &StakeHints,
    ) -> U256 {
        if !self.operator_vault_opt_in.is_opted_in_at(
            operator,
            self.config.vault,
            timestamp,
            hints.vault_opt_in_hint,
        ) || !self
            .operator_l1_opt_in
            .is_opted_in_at(operator, l1, timestamp, hints.l1_opt_in_hint)
        {
            return U256::zero();
        }
        let ledger = self.ledger.read();
        proportional_stake(
            ledger.operator_shares_at(l1, asset_class, operator, timestamp, hints.operator_shares_hint),
            ledger.total_operator_shares_at(l1, asset_class, timestamp, hints.total_shares_hint),
            self.vault_source
                .active_stake_at(timestamp, hints.active_stake_hint),
            ledger.l1_limit_at(l1, asset_class, timestamp, hints.l1_limit_hint),
        )
    }

    /// Current effective limit for a pair.
    pub fn l1_limit(&self, l1: L1Id, asset_class: AssetClassId) -> U256 {
        self.ledger.read().l1_limit(l1, asset_class)
    }

    /// Effective limit for a pair at a past instant.
    pub fn l1_limit_at(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        timestamp: Timestamp,
        hint: Option<usize>,
    ) -> U256 {
        self.ledger.read().l1_limit_at(l1, asset_class, timestamp, hint)
    }

    /// Current shares of an operator.
    pub fn operator_l1_shares(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
    ) -> U256 {
        self.ledger.read().operator_shares(l1, asset_class, operator)
    }

    /// Current total shares of a pair.
    pub fn total_operator_l1_shares(&self, l1: L1Id, asset_class: AssetClassId) -> U256 {
        self.ledger.read().total_operator_shares(l1, asset_class)
    }

    /// Build checkpoint hints for later `stake_at` queries at `timestamp`.
    pub fn hints_at(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
    ) -> StakeHints {
        self.ledger.read().hints_at(l1, asset_class, operator, timestamp)
    }

    // === SLASH PATH ===

    /// Notify the optional hook of a slash.
    ///
    /// The hook is not on the critical path: its failure is logged and
    /// swallowed so the slash itself can never be blocked.
    pub fn on_slash(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        amount: U256,
        capture_timestamp: Timestamp,
    ) {
        if let Some(hook) = &self.slash_hook {
            if let Err(err) = hook.on_slash(l1, asset_class, operator, amount, capture_timestamp) {
                warn!(
                    l1 = %fmt_address(&l1),
                    operator = %fmt_address(&operator),
                    %amount,
                    %err,
                    "slash hook failed; continuing"
                );
            }
        }
    }
}
