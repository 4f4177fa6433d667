//! Error types for the Asset-Class Registry.

use shared_types::{AssetClassId, U256};

/// Asset-Class Registry error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetClassError {
    #[error("Asset class already registered: {0}")]
    AlreadyRegistered(AssetClassId),

    #[error("Asset class not found: {0}")]
    ClassNotFound(AssetClassId),

    #[error("Asset identifier is zero")]
    ZeroAsset,

    #[error("Invalid stake bounds: min {min} > max {max}")]
    InvalidStakeBounds { min: U256, max: U256 },

    #[error("Unbounded max stake is reserved for the primary asset class")]
    UnboundedMaxReserved,

    #[error("Asset already registered in class {0}")]
    AssetAlreadyRegistered(AssetClassId),

    #[error("Asset not found in class {0}")]
    AssetNotFound(AssetClassId),

    #[error("Asset is the primary asset of the primary asset class")]
    AssetIsPrimaryAssetClass,

    #[error("Assets still exist in class: {remaining} remaining")]
    AssetsStillExist { remaining: usize },
}

/// Result type for registry operations
pub type AssetClassResult<T> = Result<T, AssetClassError>;
