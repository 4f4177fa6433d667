//! # Core Domain Identifiers
//!
//! Defines the identifier and numeric types used by every StakeMesh crate.
//!
//! ## Clusters
//!
//! - **Participants**: `L1Id`, `OperatorId`, `VaultId`, `AssetId`
//! - **Nodes**: `NodeId`, `ValidationId`, `BlsPublicKey`
//! - **Accounting**: `U256`, `Timestamp`, `Epoch`, `AssetClassId`

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

/// A 20-byte ledger address.
///
/// All participant identifiers (L1s, operators, vaults, collateral assets)
/// are addresses.
pub type Address = [u8; 20];

/// Identifier of an L1 network sourcing security from the system.
pub type L1Id = Address;

/// Identifier of an operator running validating nodes.
pub type OperatorId = Address;

/// Identifier of a collateral vault.
pub type VaultId = Address;

/// Identifier of a collateral token.
pub type AssetId = Address;

/// The zero address, used as the "unset" sentinel for participant ids.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// A 48-byte BLS public key identifying a validating node's signing identity.
pub type BlsPublicKey = [u8; 48];

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Epoch index, derived from a timestamp and the epoch schedule.
pub type Epoch = u64;

/// Identifier of an asset class (a named risk bucket of collateral tokens).
pub type AssetClassId = u64;

/// Unique identifier for a validating node, chosen by its operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub [u8; 32]);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Opaque handle the external validator-set manager assigns to a registered
/// validator. All weight updates and removals reference it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ValidationId(pub [u8; 32]);

impl fmt::Display for ValidationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Render an address as 0x-prefixed hex for log output.
pub fn fmt_address(addr: &Address) -> String {
    format!("0x{}", hex::encode(addr))
}
