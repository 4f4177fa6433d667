//! Ports of the Node & Epoch State Machine.

pub mod outbound;

pub use outbound::{
    AssetClassSource, CollateralError, CollateralSource, MessageIndex, TimeSource,
    ValidatorRegistration, ValidatorSetManager, ValidatorSetManagerError,
};
