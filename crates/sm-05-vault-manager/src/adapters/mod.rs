//! In-memory adapters for the vault-manager ports.

pub mod memory;

pub use memory::{InMemoryDelegatorGateway, InMemoryVaultGateway, ManualClock};
