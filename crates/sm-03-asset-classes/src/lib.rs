//! # sm-03-asset-classes
//!
//! Asset-Class Registry for StakeMesh.
//!
//! An asset class is a named bucket of fungible collateral tokens sharing one
//! stake-bound policy. Exactly one class is the primary ("native") class; its
//! min/max validator stake bound node-level stake directly, and its primary
//! asset can never be removed.
//!
//! The registry is a plain owned collection: the middleware holds it behind
//! an injected reference and consults it for class membership and bounds.

pub mod error;
pub mod registry;

pub use error::{AssetClassError, AssetClassResult};
pub use registry::{AssetClass, AssetClassRegistry, PRIMARY_ASSET_CLASS};
