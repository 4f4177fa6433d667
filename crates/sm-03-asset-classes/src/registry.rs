//! Registry of asset classes and their member collateral tokens.

use crate::error::{AssetClassError, AssetClassResult};
use serde::{Deserialize, Serialize};
use shared_types::{fmt_address, AssetClassId, AssetId, U256, ZERO_ADDRESS};
use std::collections::HashMap;
use tracing::debug;

/// Class id of the primary ("native") asset class.
pub const PRIMARY_ASSET_CLASS: AssetClassId = 1;

/// A named bucket of collateral tokens sharing one stake-bound policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetClass {
    pub class_id: AssetClassId,
    /// Minimum stake a validating node backed by this class must carry.
    pub min_validator_stake: U256,
    /// Maximum stake per node. Zero means unbounded and is reserved for the
    /// primary class.
    pub max_validator_stake: U256,
    /// First asset registered; immutable for the lifetime of the class.
    pub primary_asset: AssetId,
    assets: Vec<AssetId>,
    pub active: bool,
}

impl AssetClass {
    fn new(
        class_id: AssetClassId,
        min_validator_stake: U256,
        max_validator_stake: U256,
        initial_asset: AssetId,
    ) -> Self {
        Self {
            class_id,
            min_validator_stake,
            max_validator_stake,
            primary_asset: initial_asset,
            assets: vec![initial_asset],
            active: true,
        }
    }

    /// Member assets, in registration order.
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Number of member assets.
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Check membership of a collateral token.
    pub fn contains_asset(&self, asset: &AssetId) -> bool {
        self.assets.contains(asset)
    }
}

/// Registry of all asset classes for one L1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetClassRegistry {
    classes: HashMap<AssetClassId, AssetClass>,
}

impl AssetClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new asset class with its stake-bound policy.
    pub fn add_asset_class(
        &mut self,
        class_id: AssetClassId,
        min_validator_stake: U256,
        max_validator_stake: U256,
        initial_asset: AssetId,
    ) -> AssetClassResult<()> {
        if self.classes.contains_key(&class_id) {
            return Err(AssetClassError::AlreadyRegistered(class_id));
        }
        if initial_asset == ZERO_ADDRESS {
            return Err(AssetClassError::ZeroAsset);
        }
        if max_validator_stake.is_zero() {
            // Zero max = unbounded, allowed only on the primary class.
            if class_id != PRIMARY_ASSET_CLASS {
                return Err(AssetClassError::UnboundedMaxReserved);
            }
        } else if min_validator_stake > max_validator_stake {
            return Err(AssetClassError::InvalidStakeBounds {
                min: min_validator_stake,
                max: max_validator_stake,
            });
        }

        debug!(
            class_id,
            asset = %fmt_address(&initial_asset),
            "asset class registered"
        );
        self.classes.insert(
            class_id,
            AssetClass::new(
                class_id,
                min_validator_stake,
                max_validator_stake,
                initial_asset,
            ),
        );
        Ok(())
    }

    /// Add a collateral token to an existing class.
    pub fn add_asset_to_class(
        &mut self,
        class_id: AssetClassId,
        asset: AssetId,
    ) -> AssetClassResult<()> {
        if asset == ZERO_ADDRESS {
            return Err(AssetClassError::ZeroAsset);
        }
        let class = self
            .classes
            .get_mut(&class_id)
            .ok_or(AssetClassError::ClassNotFound(class_id))?;
        if class.assets.contains(&asset) {
            return Err(AssetClassError::AssetAlreadyRegistered(class_id));
        }
        class.assets.push(asset);
        debug!(class_id, asset = %fmt_address(&asset), "asset added to class");
        Ok(())
    }

    /// Remove a collateral token from a class.
    ///
    /// The primary class's primary asset is never removable.
    pub fn remove_asset_from_class(
        &mut self,
        class_id: AssetClassId,
        asset: AssetId,
    ) -> AssetClassResult<()> {
        let class = self
            .classes
            .get_mut(&class_id)
            .ok_or(AssetClassError::ClassNotFound(class_id))?;
        if class_id == PRIMARY_ASSET_CLASS && asset == class.primary_asset {
            return Err(AssetClassError::AssetIsPrimaryAssetClass);
        }
        let position = class
            .assets
            .iter()
            .position(|a| *a == asset)
            .ok_or(AssetClassError::AssetNotFound(class_id))?;
        class.assets.remove(position);
        debug!(class_id, asset = %fmt_address(&asset), "asset removed from class");
        Ok(())
    }

    /// Delete a class. The class must be emptied of assets first so no
    /// stake accounting is orphaned.
    pub fn remove_asset_class(&mut self, class_id: AssetClassId) -> AssetClassResult<()> {
        let class = self
            .classes
            .get(&class_id)
            .ok_or(AssetClassError::ClassNotFound(class_id))?;
        if !class.assets.is_empty() {
            return Err(AssetClassError::AssetsStillExist {
                remaining: class.assets.len(),
            });
        }
        self.classes.remove(&class_id);
        debug!(class_id, "asset class removed");
        Ok(())
    }

    /// Update a class's stake-bound policy.
    pub fn set_stake_bounds(
        &mut self,
        class_id: AssetClassId,
        min_validator_stake: U256,
        max_validator_stake: U256,
    ) -> AssetClassResult<()> {
        if max_validator_stake.is_zero() {
            if class_id != PRIMARY_ASSET_CLASS {
                return Err(AssetClassError::UnboundedMaxReserved);
            }
        } else if min_validator_stake > max_validator_stake {
            return Err(AssetClassError::InvalidStakeBounds {
                min: min_validator_stake,
                max: max_validator_stake,
            });
        }
        let class = self
            .classes
            .get_mut(&class_id)
            .ok_or(AssetClassError::ClassNotFound(class_id))?;
        class.min_validator_stake = min_validator_stake;
        class.max_validator_stake = max_validator_stake;
        Ok(())
    }

    /// Flip a class's active flag.
    pub fn set_active(&mut self, class_id: AssetClassId, active: bool) -> AssetClassResult<()> {
        let class = self
            .classes
            .get_mut(&class_id)
            .ok_or(AssetClassError::ClassNotFound(class_id))?;
        class.active = active;
        Ok(())
    }

    /// Check if a class id is registered.
    pub fn contains(&self, class_id: AssetClassId) -> bool {
        self.classes.contains_key(&class_id)
    }

    /// Get a class by id.
    pub fn class(&self, class_id: AssetClassId) -> Option<&AssetClass> {
        self.classes.get(&class_id)
    }

    /// All registered class ids, ascending.
    pub fn asset_class_ids(&self) -> Vec<AssetClassId> {
        let mut ids: Vec<AssetClassId> = self.classes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Check membership of a token in a class.
    pub fn is_asset_in_class(&self, class_id: AssetClassId, asset: &AssetId) -> bool {
        self.classes
            .get(&class_id)
            .map(|c| c.contains_asset(asset))
            .unwrap_or(false)
    }

    /// Min/max validator stake for a class.
    pub fn stake_bounds(&self, class_id: AssetClassId) -> AssetClassResult<(U256, U256)> {
        self.classes
            .get(&class_id)
            .map(|c| (c.min_validator_stake, c.max_validator_stake))
            .ok_or(AssetClassError::ClassNotFound(class_id))
    }
}
