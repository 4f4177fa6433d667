//! Outbound ports: the external collaborators the delegator reads.
//!
//! The vault's deposit/withdraw bookkeeping and the two opt-in services are
//! separate systems; the delegator only ever consumes the narrow read
//! surfaces below. All calls are synchronous; execution is serialized by
//! the surrounding ledger.

use shared_types::{Address, AssetClassId, L1Id, OperatorId, Timestamp, U256};

/// Read access to the vault's active collateral balance.
pub trait VaultStakeSource: Send + Sync {
    /// Currently active stake in the vault.
    fn active_stake(&self) -> U256;

    /// Active stake at a past instant, with an optional checkpoint hint.
    fn active_stake_at(&self, timestamp: Timestamp, hint: Option<usize>) -> U256;
}

/// Read access to a signature-based opt-in service.
///
/// Two instances back every delegator: operator↔vault and operator↔L1.
pub trait OptInRegistry: Send + Sync {
    /// Whether `who` is currently opted in to `target`.
    fn is_opted_in(&self, who: Address, target: Address) -> bool;

    /// Whether `who` was opted in to `target` at a past instant.
    fn is_opted_in_at(
        &self,
        who: Address,
        target: Address,
        timestamp: Timestamp,
        hint: Option<usize>,
    ) -> bool;
}

/// Error returned by a slash-notification hook.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Slash hook failed: {0}")]
pub struct SlashHookError(pub String);

/// Optional third-party notification target for slashes.
///
/// The hook is best-effort: the delegator logs and swallows its failures so
/// a hook bug can never block a legitimate slash.
pub trait SlashHook: Send + Sync {
    fn on_slash(
        &self,
        l1: L1Id,
        asset_class: AssetClassId,
        operator: OperatorId,
        amount: U256,
        capture_timestamp: Timestamp,
    ) -> Result<(), SlashHookError>;
}

/// Clock abstraction so tests can control checkpoint timestamps.
pub trait TimeSource: Send + Sync {
    /// Get current unix timestamp in seconds
    fn now(&self) -> Timestamp;
}

/// Default time source using system time
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
