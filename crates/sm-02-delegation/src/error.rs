//! Error types for the delegation subsystem.

use shared_types::U256;
use sm_01_checkpoints::CheckpointError;

/// Delegation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelegationError {
    #[error("Caller lacks the required role or identity")]
    Unauthorized,

    #[error("Max L1 limit was never configured for this pair")]
    MaxL1LimitNotSet,

    #[error("Limit {amount} exceeds max L1 limit {max}")]
    ExceedsMaxL1Limit { amount: U256, max: U256 },

    #[error("Value unchanged")]
    AlreadySet,

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Result type for delegation operations
pub type DelegationResult<T> = Result<T, DelegationError>;
