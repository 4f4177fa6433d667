//! Error types for the Vault Manager.

use shared_types::Timestamp;

/// Vault Manager error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaultManagerError {
    #[error("Max L1 limit must be non-zero")]
    ZeroMaxL1Limit,

    #[error("Vault already registered")]
    VaultAlreadyRegistered,

    #[error("Vault not registered")]
    VaultNotRegistered,

    #[error("Vault epoch {vault_epoch_duration}s shorter than slashing window {slashing_window}s")]
    VaultEpochTooShort {
        vault_epoch_duration: Timestamp,
        slashing_window: Timestamp,
    },

    #[error("Vault is not disabled")]
    VaultNotDisabled,

    #[error("Vault grace period not passed: {remaining}s remaining")]
    VaultGracePeriodNotPassed { remaining: Timestamp },

    #[error("Total operator stake is zero")]
    ZeroTotalStake,
}

/// Result type for vault-manager operations
pub type VaultManagerResult<T> = Result<T, VaultManagerError>;
