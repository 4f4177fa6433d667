//! # StakeMesh Test Suite
//!
//! Unified test crate containing cross-crate integration flows:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── delegation_flow.rs   # vault → delegator share/limit scenarios
//!     ├── node_lifecycle.rs    # middleware ↔ validator-set manager choreography
//!     └── slashing_flow.rs     # epoch caching and slash fan-out
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sm-tests
//! ```

pub mod integration;

/// Install a fmt subscriber once, honouring `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();
}
