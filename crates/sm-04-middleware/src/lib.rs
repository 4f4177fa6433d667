//! # sm-04-middleware
//!
//! Node & Epoch State Machine for StakeMesh.
//!
//! ## Architecture
//!
//! One [`service::MiddlewareService`] instance serves one L1. It owns every
//! operator and node record for that L1 and binds, at construction, to
//! exactly one collateral layer (Vault Manager), one asset-class registry
//! and one external validator-set manager: injected references, never
//! ambient singletons.
//!
//! ### Two-Phase Node Lifecycle
//!
//! ```text
//! None → PendingAdded → Active
//! Active → PendingStakeUpdate → Active
//! Active → PendingRemoved → Removed
//! ```
//!
//! Every `initiate` is a local call that emits a request into the external
//! validator-set manager's message log; the matching `complete_*` presents
//! the message index once the underlying network confirms it. A pending
//! request that is never confirmed leaves its node pending indefinitely;
//! there is no timeout escape hatch, and recovery is re-registration under a
//! fresh identifier.
//!
//! ### Epoch Stake Caches
//!
//! Node, operator and class-total stake are memoized at most once per
//! epoch. Absence means "not yet computed", never "zero".
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sm_04_middleware::{MiddlewareService, MiddlewareConfig};
//!
//! let service = MiddlewareService::new(
//!     manager,
//!     collateral,
//!     asset_classes,
//!     time_source,
//!     config,
//! );
//!
//! let vid = service.add_node(operator, node_id, bls_key, expiry, None)?;
//! // ... external confirmation arrives ...
//! service.complete_validator_registration(message_index)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::{ManualClock, MockValidatorSetManager, RegistryAssetClassSource, VaultCollateralSource};
pub use domain::{EpochSchedule, EpochStakeCache, Node, NodeStatus, OperatorRecord, WeightScaler};
pub use error::{MiddlewareError, MiddlewareResult};
pub use ports::{
    AssetClassSource, CollateralError, CollateralSource, MessageIndex, TimeSource,
    ValidatorRegistration, ValidatorSetManager, ValidatorSetManagerError,
};
pub use service::{MiddlewareConfig, MiddlewareService, RebalanceReport};
