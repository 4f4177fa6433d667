//! In-memory implementations of the vault-manager ports.

use crate::ports::{DelegatorGateway, TimeSource, VaultGateway, VaultSlashError};
use parking_lot::RwLock;
use shared_types::{AssetClassId, OperatorId, Timestamp, U256, VaultId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Vault metadata stub with a configurable per-vault epoch duration.
pub struct InMemoryVaultGateway {
    default_epoch_duration: Timestamp,
    epoch_durations: RwLock<HashMap<VaultId, Timestamp>>,
}

impl InMemoryVaultGateway {
    pub fn new(default_epoch_duration: Timestamp) -> Self {
        Self {
            default_epoch_duration,
            epoch_durations: RwLock::new(HashMap::new()),
        }
    }

    pub fn set_epoch_duration(&self, vault: VaultId, duration: Timestamp) {
        self.epoch_durations.write().insert(vault, duration);
    }
}

impl VaultGateway for InMemoryVaultGateway {
    fn epoch_duration(&self, vault: VaultId) -> Timestamp {
        self.epoch_durations
            .read()
            .get(&vault)
            .copied()
            .unwrap_or(self.default_epoch_duration)
    }
}

/// Delegator stub holding a flat per-vault operator stake and recording
/// slashes.
#[derive(Default)]
pub struct InMemoryDelegatorGateway {
    stakes: RwLock<HashMap<(VaultId, OperatorId), U256>>,
    slashed: RwLock<HashMap<(VaultId, OperatorId), U256>>,
    failing: RwLock<HashSet<VaultId>>,
}

impl InMemoryDelegatorGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stake(&self, vault: VaultId, operator: OperatorId, stake: U256) {
        self.stakes.write().insert((vault, operator), stake);
    }

    pub fn set_failing(&self, vault: VaultId, failing: bool) {
        if failing {
            self.failing.write().insert(vault);
        } else {
            self.failing.write().remove(&vault);
        }
    }

    pub fn slashed(&self, vault: VaultId, operator: OperatorId) -> U256 {
        self.slashed
            .read()
            .get(&(vault, operator))
            .copied()
            .unwrap_or_else(U256::zero)
    }
}

impl DelegatorGateway for InMemoryDelegatorGateway {
    fn operator_stake_at(
        &self,
        vault: VaultId,
        _asset_class: AssetClassId,
        operator: OperatorId,
        _timestamp: Timestamp,
    ) -> U256 {
        self.stakes
            .read()
            .get(&(vault, operator))
            .copied()
            .unwrap_or_else(U256::zero)
    }

    fn slash(
        &self,
        vault: VaultId,
        _asset_class: AssetClassId,
        operator: OperatorId,
        amount: U256,
        _capture_timestamp: Timestamp,
    ) -> Result<(), VaultSlashError> {
        if self.failing.read().contains(&vault) {
            return Err(VaultSlashError("vault configured to fail".into()));
        }
        let mut slashed = self.slashed.write();
        let entry = slashed.entry((vault, operator)).or_insert_with(U256::zero);
        *entry += amount;
        Ok(())
    }
}

/// Manually advanced clock.
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
