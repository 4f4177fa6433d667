//! # Shared Types Crate
//!
//! This crate contains the domain identifiers and numeric primitives shared
//! across the StakeMesh component crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate identifier types are defined
//!   here.
//! - **Opaque Identity**: L1s, operators, vaults and collateral assets are
//!   addressed by opaque 20-byte identifiers; nodes and external validation
//!   records by opaque 32-byte identifiers. No crate interprets their content.

pub mod entities;

pub use entities::*;
