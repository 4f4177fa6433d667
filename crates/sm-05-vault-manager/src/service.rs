//! Vault Manager service - registration, grace periods, slash fan-out.

use crate::error::{VaultManagerError, VaultManagerResult};
use crate::ports::{DelegatorGateway, TimeSource, VaultGateway, VaultSlashError};
use parking_lot::RwLock;
use primitive_types::U512;
use serde::{Deserialize, Serialize};
use shared_types::{fmt_address, AssetClassId, Epoch, OperatorId, Timestamp, U256, VaultId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Static configuration of the vault manager.
#[derive(Debug, Clone)]
pub struct VaultManagerConfig {
    /// How long after an epoch a slash may still be requested, in seconds.
    pub slashing_window: Timestamp,
    /// The L1's epoch length in seconds, used for the vault removal delay.
    pub epoch_duration: Timestamp,
    /// How many epochs a disabled vault stays removable-but-slashable.
    pub vault_removal_epoch_delay: Epoch,
}

/// Registration record for one vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultRecord {
    pub vault: VaultId,
    pub asset_class: AssetClassId,
    pub max_l1_limit: U256,
    pub enabled_at: Timestamp,
    pub disabled_at: Option<Timestamp>,
}

impl VaultRecord {
    /// A vault counts toward stake while it is not disabled.
    pub fn is_active(&self) -> bool {
        self.disabled_at.is_none()
    }
}

/// Outcome of slashing one vault during a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultSlashOutcome {
    pub vault: VaultId,
    pub requested: U256,
    pub result: Result<(), VaultSlashError>,
}

/// Result of a slash fan-out across all vaults of a class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlashFanOut {
    pub outcomes: Vec<VaultSlashOutcome>,
}

impl SlashFanOut {
    /// Total amount successfully slashed.
    pub fn slashed(&self) -> U256 {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .fold(U256::zero(), |acc, o| acc + o.requested)
    }

    /// Number of vaults whose slash failed.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Vault Manager / Slash Router
pub struct VaultManager<G, D, T>
where
    G: VaultGateway,
    D: DelegatorGateway,
    T: TimeSource,
{
    vault_gateway: Arc<G>,
    delegator_gateway: Arc<D>,
    time_source: Arc<T>,
    vaults: RwLock<HashMap<VaultId, VaultRecord>>,
    /// Registration order, for deterministic iteration.
    order: RwLock<Vec<VaultId>>,
    config: VaultManagerConfig,
}

impl<G, D, T> VaultManager<G, D, T>
where
    G: VaultGateway,
    D: DelegatorGateway,
    T: TimeSource,
{
    /// Create a new VaultManager
    pub fn new(
        vault_gateway: Arc<G>,
        delegator_gateway: Arc<D>,
        time_source: Arc<T>,
        config: VaultManagerConfig,
    ) -> Self {
        Self {
            vault_gateway,
            delegator_gateway,
            time_source,
            vaults: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            config,
        }
    }

    // === REGISTRATION ===

    /// Register a vault against an asset class.
    pub fn register_vault(
        &self,
        vault: VaultId,
        asset_class: AssetClassId,
        max_l1_limit: U256,
    ) -> VaultManagerResult<()> {
        if max_l1_limit.is_zero() {
            return Err(VaultManagerError::ZeroMaxL1Limit);
        }
        if self.vaults.read().contains_key(&vault) {
            return Err(VaultManagerError::VaultAlreadyRegistered);
        }
        let vault_epoch_duration = self.vault_gateway.epoch_duration(vault);
        if vault_epoch_duration < self.config.slashing_window {
            return Err(VaultManagerError::VaultEpochTooShort {
                vault_epoch_duration,
                slashing_window: self.config.slashing_window,
            });
        }

        let now = self.time_source.now();
        self.vaults.write().insert(
            vault,
            VaultRecord {
                vault,
                asset_class,
                max_l1_limit,
                enabled_at: now,
                disabled_at: None,
            },
        );
        self.order.write().push(vault);
        info!(vault = %fmt_address(&vault), asset_class, "vault registered");
        Ok(())
    }

    /// Disable a vault, starting its removal grace timer.
    pub fn disable_vault(&self, vault: VaultId) -> VaultManagerResult<()> {
        let mut vaults = self.vaults.write();
        let record = vaults
            .get_mut(&vault)
            .ok_or(VaultManagerError::VaultNotRegistered)?;
        record.disabled_at = Some(self.time_source.now());
        debug!(vault = %fmt_address(&vault), "vault disabled");
        Ok(())
    }

    /// Re-enable a disabled vault, cancelling its removal timer.
    pub fn enable_vault(&self, vault: VaultId) -> VaultManagerResult<()> {
        let mut vaults = self.vaults.write();
        let record = vaults
            .get_mut(&vault)
            .ok_or(VaultManagerError::VaultNotRegistered)?;
        record.disabled_at = None;
        record.enabled_at = self.time_source.now();
        debug!(vault = %fmt_address(&vault), "vault enabled");
        Ok(())
    }

    /// Remove a disabled vault once its grace period has elapsed.
    ///
    /// The delay keeps a vault slashable for epochs it was active in.
    pub fn remove_vault(&self, vault: VaultId) -> VaultManagerResult<()> {
        let now = self.time_source.now();
        let grace = self.config.epoch_duration * self.config.vault_removal_epoch_delay;
        {
            let vaults = self.vaults.read();
            let record = vaults
                .get(&vault)
                .ok_or(VaultManagerError::VaultNotRegistered)?;
            let disabled_at = record
                .disabled_at
                .ok_or(VaultManagerError::VaultNotDisabled)?;
            let elapsed = now.saturating_sub(disabled_at);
            if elapsed < grace {
                return Err(VaultManagerError::VaultGracePeriodNotPassed {
                    remaining: grace - elapsed,
                });
            }
        }
        self.vaults.write().remove(&vault);
        self.order.write().retain(|v| *v != vault);
        info!(vault = %fmt_address(&vault), "vault removed");
        Ok(())
    }

    // === READS ===

    /// Record for one vault.
    pub fn vault(&self, vault: VaultId) -> Option<VaultRecord> {
        self.vaults.read().get(&vault).cloned()
    }

    /// Active (not disabled) vaults, in registration order.
    pub fn active_vaults(&self) -> Vec<VaultId> {
        let vaults = self.vaults.read();
        self.order
            .read()
            .iter()
            .filter(|v| vaults.get(*v).map(VaultRecord::is_active).unwrap_or(false))
            .copied()
            .collect()
    }

    /// Active vaults registered against one class, in registration order.
    pub fn vaults_for_class(&self, asset_class: AssetClassId) -> Vec<VaultId> {
        let vaults = self.vaults.read();
        self.order
            .read()
            .iter()
            .filter(|v| {
                vaults
                    .get(*v)
                    .map(|r| r.is_active() && r.asset_class == asset_class)
                    .unwrap_or(false)
            })
            .copied()
            .collect()
    }

    /// Operator stake summed across the class's active vaults at an instant.
    pub fn operator_stake_at(
        &self,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
    ) -> U256 {
        self.vaults_for_class(asset_class)
            .into_iter()
            .map(|vault| {
                self.delegator_gateway
                    .operator_stake_at(vault, asset_class, operator, timestamp)
            })
            .fold(U256::zero(), |acc, s| acc + s)
    }

    // === SLASH FAN-OUT ===

    /// Slash an operator across every vault of a class, proportionally to
    /// each vault's share of the operator's stake at `epoch_start_ts`.
    ///
    /// Each vault is slashed independently; a failing vault is logged and
    /// skipped so it cannot shield the rest of the collateral.
    pub fn slash_vaults(
        &self,
        total_operator_stake: U256,
        amount: U256,
        asset_class: AssetClassId,
        operator: OperatorId,
        epoch_start_ts: Timestamp,
    ) -> VaultManagerResult<SlashFanOut> {
        if total_operator_stake.is_zero() {
            return Err(VaultManagerError::ZeroTotalStake);
        }

        let mut fan_out = SlashFanOut::default();
        for vault in self.vaults_for_class(asset_class) {
            let vault_stake = self.delegator_gateway.operator_stake_at(
                vault,
                asset_class,
                operator,
                epoch_start_ts,
            );
            if vault_stake.is_zero() {
                continue;
            }
            let scaled = amount.full_mul(vault_stake) / U512::from(total_operator_stake);
            // vault_stake never exceeds the operator total, so the quotient fits
            let vault_amount = U256::try_from(scaled).unwrap_or(U256::MAX);
            if vault_amount.is_zero() {
                continue;
            }

            let result = self.delegator_gateway.slash(
                vault,
                asset_class,
                operator,
                vault_amount,
                epoch_start_ts,
            );
            if let Err(err) = &result {
                warn!(
                    vault = %fmt_address(&vault),
                    operator = %fmt_address(&operator),
                    amount = %vault_amount,
                    %err,
                    "vault slash failed; continuing fan-out"
                );
            } else {
                debug!(
                    vault = %fmt_address(&vault),
                    operator = %fmt_address(&operator),
                    amount = %vault_amount,
                    "vault slashed"
                );
            }
            fan_out.outcomes.push(VaultSlashOutcome {
                vault,
                requested: vault_amount,
                result,
            });
        }
        Ok(fan_out)
    }
}
