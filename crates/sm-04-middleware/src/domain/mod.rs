//! Domain layer: epoch arithmetic, node records, caches, weight scaling.

pub mod epoch;
pub mod node;
pub mod operator;
pub mod stake_cache;
pub mod weight;

pub use epoch::EpochSchedule;
pub use node::{Node, NodeStatus};
pub use operator::OperatorRecord;
pub use stake_cache::EpochStakeCache;
pub use weight::WeightScaler;
