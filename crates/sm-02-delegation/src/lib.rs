//! # sm-02-delegation
//!
//! Share Ledger and Delegator for StakeMesh.
//!
//! ## Architecture
//!
//! A [`domain::ShareLedger`] stores the checkpointed delegation state for one
//! vault: per-(L1, asset-class) limits and total shares, and per-operator
//! share traces. The [`service::Delegator`] wraps the ledger with role and
//! opt-in authorization and converts shares into effective operator stake:
//!
//! ```text
//! stake = shares * min(vault_active_stake, l1_limit) / total_shares
//! ```
//!
//! both "now" and at any past timestamp (with optional checkpoint hints).
//!
//! External collaborators (the vault's balance bookkeeping and the two
//! opt-in services) are consumed through the traits in [`ports`].

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{proportional_stake, ShareLedger, StakeHints};
pub use error::{DelegationError, DelegationResult};
pub use ports::{OptInRegistry, SlashHook, SlashHookError, TimeSource, VaultStakeSource};
pub use service::{Delegator, DelegatorConfig};
