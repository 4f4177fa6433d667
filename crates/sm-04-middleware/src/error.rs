//! Error types for the Node & Epoch State Machine.

use shared_types::{AssetClassId, Epoch, NodeId, Timestamp, U256, ValidationId};

/// Middleware error types
///
/// Grouped by kind: authorization, invariant, capacity, state-machine,
/// temporal. Every failure aborts the whole call with no partial writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MiddlewareError {
    // --- operators ---
    #[error("Operator already registered")]
    OperatorAlreadyRegistered,

    #[error("Operator not registered")]
    OperatorNotRegistered,

    #[error("Operator is disabled")]
    OperatorDisabled,

    #[error("Operator is not disabled")]
    OperatorNotDisabled,

    #[error("Operator grace period not passed: {remaining}s remaining")]
    OperatorGracePeriodNotPassed { remaining: Timestamp },

    #[error("Operator still has nodes")]
    OperatorHasNodes,

    // --- nodes ---
    #[error("Node already exists: {0}")]
    NodeAlreadyExists(NodeId),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node not owned by caller: {0}")]
    NodeNotOwned(NodeId),

    #[error("Node not active: {0}")]
    NodeNotActive(NodeId),

    #[error("Node has a pending stake update: {0}")]
    NodePendingUpdate(NodeId),

    #[error("Node is pending removal: {0}")]
    NodePendingRemoval(NodeId),

    // --- capacity ---
    #[error("Not enough free stake: requested {requested}, available {available}")]
    NotEnoughFreeStake { requested: U256, available: U256 },

    #[error("Stake too low: requested {requested}, min {min}")]
    StakeTooLow { requested: U256, min: U256 },

    #[error("Stake too high: requested {requested}, max {max}")]
    StakeTooHigh { requested: U256, max: U256 },

    #[error("Security module capacity not enough: need {required_weight}, remaining {remaining}")]
    SecurityModuleCapacityNotEnough { required_weight: u64, remaining: u64 },

    #[error("Slash amount {amount} exceeds cached operator stake {available}")]
    TooBigSlashAmount { amount: U256, available: U256 },

    // --- temporal ---
    #[error("Epoch {epoch} not finalized, current epoch is {current}")]
    EpochNotFinalized { epoch: Epoch, current: Epoch },

    #[error("Invalid epoch {epoch}, current epoch is {current}")]
    InvalidEpoch { epoch: Epoch, current: Epoch },

    #[error("Timestamp {timestamp} precedes schedule start {start_time}")]
    TimestampBeforeStart {
        timestamp: Timestamp,
        start_time: Timestamp,
    },

    #[error("Operator already rebalanced in epoch {epoch}")]
    AlreadyRebalanced { epoch: Epoch },

    #[error("Stake not cached for epoch {epoch}, asset class {asset_class}")]
    StakeNotCached {
        epoch: Epoch,
        asset_class: AssetClassId,
    },

    // --- collaborators ---
    #[error("No confirmation pending for validation id {0}")]
    UnknownConfirmation(ValidationId),

    #[error("Asset class not found: {0}")]
    AssetClassNotFound(AssetClassId),

    #[error("Validator-set manager error: {0}")]
    Manager(String),

    #[error("Collateral error: {0}")]
    Collateral(String),
}

/// Result type for middleware operations
pub type MiddlewareResult<T> = Result<T, MiddlewareError>;
