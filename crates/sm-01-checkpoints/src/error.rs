//! Error types for the Checkpoint Store.

use shared_types::Timestamp;

/// Checkpoint Store error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckpointError {
    #[error("Invalid ordering: attempted timestamp {attempted} < latest {latest}")]
    InvalidOrdering {
        attempted: Timestamp,
        latest: Timestamp,
    },
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;
