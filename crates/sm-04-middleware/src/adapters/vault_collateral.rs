//! Vault-manager-backed collateral adapter.

use crate::ports::{CollateralError, CollateralSource};
use shared_types::{AssetClassId, OperatorId, Timestamp, U256};
use sm_05_vault_manager::{DelegatorGateway, VaultGateway, VaultManager};
use std::sync::Arc;

/// Adapts a [`VaultManager`] to the aggregated collateral port.
pub struct VaultCollateralSource<G, D, T>
where
    G: VaultGateway,
    D: DelegatorGateway,
    T: sm_05_vault_manager::TimeSource,
{
    manager: Arc<VaultManager<G, D, T>>,
}

impl<G, D, T> VaultCollateralSource<G, D, T>
where
    G: VaultGateway,
    D: DelegatorGateway,
    T: sm_05_vault_manager::TimeSource,
{
    pub fn new(manager: Arc<VaultManager<G, D, T>>) -> Self {
        Self { manager }
    }
}

impl<G, D, T> CollateralSource for VaultCollateralSource<G, D, T>
where
    G: VaultGateway,
    D: DelegatorGateway,
    T: sm_05_vault_manager::TimeSource,
{
    fn operator_stake_at(
        &self,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
    ) -> U256 {
        self.manager
            .operator_stake_at(asset_class, operator, timestamp)
    }

    fn slash(
        &self,
        total_operator_stake: U256,
        amount: U256,
        asset_class: AssetClassId,
        operator: OperatorId,
        epoch_start_ts: Timestamp,
    ) -> Result<U256, CollateralError> {
        self.manager
            .slash_vaults(
                total_operator_stake,
                amount,
                asset_class,
                operator,
                epoch_start_ts,
            )
            .map(|fan_out| fan_out.slashed())
            .map_err(|err| CollateralError(err.to_string()))
    }
}
