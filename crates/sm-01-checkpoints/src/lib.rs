//! # sm-01-checkpoints
//!
//! Checkpoint Store for StakeMesh.
//!
//! ## Architecture
//!
//! An append-only, timestamp-ordered history of a `U256` value. Every
//! balance, share count and limit in the system is stored as a [`Trace`] so
//! that any value can be queried at an arbitrary past instant.
//!
//! Lookups accept an optional position hint: a caller that remembers where a
//! previous lookup landed gets O(1) amortized access instead of the O(log n)
//! binary search. A wrong hint is detected and ignored, never trusted.
//!
//! ## Usage
//!
//! ```rust
//! use sm_01_checkpoints::Trace;
//! use shared_types::U256;
//!
//! let mut trace = Trace::new();
//! trace.push(100, U256::from(5)).unwrap();
//! trace.push(200, U256::from(9)).unwrap();
//!
//! assert_eq!(trace.upper_lookup_recent(150, None), U256::from(5));
//! assert_eq!(trace.latest(), U256::from(9));
//! ```

pub mod error;
pub mod trace;

pub use error::{CheckpointError, CheckpointResult};
pub use trace::{Checkpoint, Trace};
