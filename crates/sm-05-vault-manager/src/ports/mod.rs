//! Outbound ports: vault metadata and per-vault delegator access.

use shared_types::{AssetClassId, OperatorId, Timestamp, U256, VaultId};

/// Read access to vault metadata.
pub trait VaultGateway: Send + Sync {
    /// The vault's own accounting epoch length in seconds. A vault must stay
    /// live at least as long as a slash can be requested against it.
    fn epoch_duration(&self, vault: VaultId) -> Timestamp;
}

/// Error returned when a vault rejects or fails a slash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Vault slash failed: {0}")]
pub struct VaultSlashError(pub String);

/// Access to the delegator instance bound to each vault.
pub trait DelegatorGateway: Send + Sync {
    /// Operator stake provided through one vault at a past instant.
    fn operator_stake_at(
        &self,
        vault: VaultId,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
    ) -> U256;

    /// Reduce the vault's bookkeeping by a slashed amount.
    fn slash(
        &self,
        vault: VaultId,
        asset_class: AssetClassId,
        operator: OperatorId,
        amount: U256,
        capture_timestamp: Timestamp,
    ) -> Result<(), VaultSlashError>;
}

/// Clock abstraction so tests can control grace-period timing.
pub trait TimeSource: Send + Sync {
    /// Get current unix timestamp in seconds
    fn now(&self) -> Timestamp;
}
