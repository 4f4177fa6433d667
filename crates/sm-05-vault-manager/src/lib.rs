//! # sm-05-vault-manager
//!
//! Vault Manager and Slash Router for StakeMesh.
//!
//! Registers collateral vaults against asset classes (with a max delegation
//! limit and a liveness admission check against the slashing window) and
//! fans slash instructions out across vaults proportionally to each vault's
//! share of an operator's stake. A failure in one vault never blocks the
//! slashing of the others.

pub mod adapters;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{VaultManagerError, VaultManagerResult};
pub use ports::{DelegatorGateway, TimeSource, VaultGateway, VaultSlashError};
pub use service::{SlashFanOut, VaultManager, VaultManagerConfig, VaultRecord, VaultSlashOutcome};
