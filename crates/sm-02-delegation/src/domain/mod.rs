//! Domain layer: checkpointed share ledger and stake arithmetic.

pub mod ledger;

pub use ledger::{proportional_stake, ShareLedger, StakeHints};
