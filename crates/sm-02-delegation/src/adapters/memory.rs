//! In-memory implementations of the delegation ports.
//!
//! These back the unit and integration suites and any wiring that does not
//! talk to a real vault or opt-in service.

use crate::ports::{OptInRegistry, SlashHook, SlashHookError, TimeSource, VaultStakeSource};
use parking_lot::RwLock;
use shared_types::{Address, AssetClassId, L1Id, OperatorId, Timestamp, U256};
use sm_01_checkpoints::Trace;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Vault stub with a checkpointed active-stake history.
#[derive(Default)]
pub struct StaticVault {
    history: RwLock<Trace>,
}

impl StaticVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the vault's active stake as of `timestamp`.
    pub fn set_active_stake(&self, timestamp: Timestamp, amount: U256) {
        self.history
            .write()
            .push(timestamp, amount)
            .expect("monotonic test timestamps");
    }
}

impl VaultStakeSource for StaticVault {
    fn active_stake(&self) -> U256 {
        self.history.read().latest()
    }

    fn active_stake_at(&self, timestamp: Timestamp, hint: Option<usize>) -> U256 {
        self.history.read().upper_lookup_recent(timestamp, hint)
    }
}

/// Opt-in service stub storing opt-in status as a 0/1 trace per pair.
#[derive(Default)]
pub struct InMemoryOptInRegistry {
    entries: RwLock<HashMap<(Address, Address), Trace>>,
}

impl InMemoryOptInRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_opted_in(&self, who: Address, target: Address, timestamp: Timestamp, opted: bool) {
        self.entries
            .write()
            .entry((who, target))
            .or_default()
            .push(timestamp, if opted { U256::one() } else { U256::zero() })
            .expect("monotonic test timestamps");
    }
}

impl OptInRegistry for InMemoryOptInRegistry {
    fn is_opted_in(&self, who: Address, target: Address) -> bool {
        self.entries
            .read()
            .get(&(who, target))
            .map(|t| !t.latest().is_zero())
            .unwrap_or(false)
    }

    fn is_opted_in_at(
        &self,
        who: Address,
        target: Address,
        timestamp: Timestamp,
        hint: Option<usize>,
    ) -> bool {
        self.entries
            .read()
            .get(&(who, target))
            .map(|t| !t.upper_lookup_recent(timestamp, hint).is_zero())
            .unwrap_or(false)
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

/// Slash hook that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingSlashHook {
    calls: RwLock<Vec<(OperatorId, U256)>>,
    failing: RwLock<bool>,
}

impl RecordingSlashHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.write() = failing;
    }

    pub fn calls(&self) -> usize {
        self.calls.read().len()
    }

    pub fn last_call(&self) -> Option<(OperatorId, U256)> {
        self.calls.read().last().copied()
    }
}

impl SlashHook for RecordingSlashHook {
    fn on_slash(
        &self,
        _l1: L1Id,
        _asset_class: AssetClassId,
        operator: OperatorId,
        amount: U256,
        _capture_timestamp: Timestamp,
    ) -> Result<(), SlashHookError> {
        self.calls.write().push((operator, amount));
        if *self.failing.read() {
            return Err(SlashHookError("hook configured to fail".into()));
        }
        Ok(())
    }
}
