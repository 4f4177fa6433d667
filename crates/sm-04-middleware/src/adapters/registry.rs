//! Asset-class registry adapter.

use crate::ports::AssetClassSource;
use parking_lot::RwLock;
use shared_types::{AssetClassId, U256};
use sm_03_asset_classes::AssetClassRegistry;

/// Adapts an owned [`AssetClassRegistry`] to the read port the state
/// machine consumes.
#[derive(Default)]
pub struct RegistryAssetClassSource {
    registry: RwLock<AssetClassRegistry>,
}

impl RegistryAssetClassSource {
    pub fn new(registry: AssetClassRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
        }
    }

    /// Mutate the underlying registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&mut AssetClassRegistry) -> R) -> R {
        f(&mut self.registry.write())
    }
}

impl AssetClassSource for RegistryAssetClassSource {
    fn class_ids(&self) -> Vec<AssetClassId> {
        self.registry.read().asset_class_ids()
    }

    fn contains(&self, asset_class: AssetClassId) -> bool {
        self.registry.read().contains(asset_class)
    }

    fn stake_bounds(&self, asset_class: AssetClassId) -> Option<(U256, U256)> {
        self.registry.read().stake_bounds(asset_class).ok()
    }
}
