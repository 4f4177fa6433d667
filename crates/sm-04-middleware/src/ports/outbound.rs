//! Driven ports: the collaborators the state machine writes to and reads.
//!
//! The validator-set manager is the consensus-layer authority on validator
//! weight. Every state-changing request against it is two-phase: an
//! `initiate_*` call emits a message into the manager's log, and the matching
//! `complete_*` call presents the message's index once the underlying
//! network confirms it. The manager answers with the validation id the
//! message concerned; the core only then advances local node state.

use shared_types::{
    AssetClassId, BlsPublicKey, NodeId, OperatorId, Timestamp, U256, ValidationId,
};

/// Index into the validator-set manager's message log.
pub type MessageIndex = u32;

/// A validator registration request.
#[derive(Debug, Clone)]
pub struct ValidatorRegistration {
    pub node_id: NodeId,
    pub bls_key: BlsPublicKey,
    /// Deadline by which the underlying network must confirm registration.
    pub registration_expiry: Timestamp,
    pub owner: OperatorId,
    pub weight: u64,
}

/// Error raised by the external validator-set manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidatorSetManagerError(pub String);

/// The external validator-set manager.
pub trait ValidatorSetManager: Send + Sync {
    /// Request registration of a new validator. Returns the validation id
    /// the manager assigned; confirmation arrives later by message index.
    fn initiate_validator_registration(
        &self,
        request: ValidatorRegistration,
    ) -> Result<ValidationId, ValidatorSetManagerError>;

    /// Request a weight change for a registered validator.
    fn initiate_validator_weight_update(
        &self,
        validation_id: ValidationId,
        new_weight: u64,
    ) -> Result<(), ValidatorSetManagerError>;

    /// Request removal (weight to zero and deregistration).
    fn initiate_validator_removal(
        &self,
        validation_id: ValidationId,
    ) -> Result<(), ValidatorSetManagerError>;

    /// Finalize a pending registration by its message index. Returns the
    /// validation id the confirmed message concerned.
    fn complete_validator_registration(
        &self,
        message_index: MessageIndex,
    ) -> Result<ValidationId, ValidatorSetManagerError>;

    /// Finalize a pending weight update by its message index.
    fn complete_validator_weight_update(
        &self,
        message_index: MessageIndex,
    ) -> Result<ValidationId, ValidatorSetManagerError>;

    /// Finalize a pending removal by its message index.
    fn complete_validator_removal(
        &self,
        message_index: MessageIndex,
    ) -> Result<ValidationId, ValidatorSetManagerError>;

    /// Authoritative weight of a validator (zero if unknown).
    fn validator_weight(&self, validation_id: ValidationId) -> u64;

    /// Weight the manager can still accept before hitting its capacity.
    fn remaining_weight_capacity(&self) -> u64;
}

/// Error raised by the collateral layer during reads or slashing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CollateralError(pub String);

/// Aggregated collateral view across the L1's registered vaults.
///
/// Implemented by the Vault Manager adapter; the middleware never talks to
/// individual vaults.
pub trait CollateralSource: Send + Sync {
    /// Operator stake in a class, summed across active vaults, at an
    /// instant.
    fn operator_stake_at(
        &self,
        asset_class: AssetClassId,
        operator: OperatorId,
        timestamp: Timestamp,
    ) -> U256;

    /// Fan a slash out across the class's vaults. Returns the total amount
    /// actually slashed (per-vault failures reduce it, they do not abort).
    fn slash(
        &self,
        total_operator_stake: U256,
        amount: U256,
        asset_class: AssetClassId,
        operator: OperatorId,
        epoch_start_ts: Timestamp,
    ) -> Result<U256, CollateralError>;
}

/// Read access to the asset-class registry.
pub trait AssetClassSource: Send + Sync {
    /// All registered class ids, ascending.
    fn class_ids(&self) -> Vec<AssetClassId>;

    /// Whether a class id is registered.
    fn contains(&self, asset_class: AssetClassId) -> bool;

    /// Min/max validator stake for a class (max zero = unbounded).
    fn stake_bounds(&self, asset_class: AssetClassId) -> Option<(U256, U256)>;
}

/// Clock abstraction so tests can control epoch timing.
pub trait TimeSource: Send + Sync {
    /// Get current unix timestamp in seconds
    fn now(&self) -> Timestamp;
}
