//! Node records and lifecycle states.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::{BlsPublicKey, NodeId, OperatorId, Timestamp, U256, ValidationId};

/// Lifecycle state of a validating node.
///
/// ```text
/// None → PendingAdded → Active
/// Active → PendingStakeUpdate → Active
/// Active → PendingRemoved → Removed
/// ```
///
/// Forward transitions are local calls; each pending state resolves only
/// when a confirmation from the external validator-set manager is presented.
/// At most one pending change per node at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    PendingAdded,
    Active,
    PendingStakeUpdate,
    PendingRemoved,
    Removed,
}

/// A validating node owned by an operator.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    pub operator: OperatorId,
    #[serde_as(as = "Bytes")]
    pub bls_key: BlsPublicKey,
    /// Handle assigned by the external validator-set manager at
    /// registration; all later weight updates and removals reference it.
    pub validation_id: ValidationId,
    pub status: NodeStatus,
    /// Stake currently targeted at this node. Authoritative weight lives in
    /// the external manager; this is the local accounting view.
    pub stake: U256,
    pub registered_at: Timestamp,
}

impl Node {
    /// Whether the node can accept a new state-changing request.
    pub fn is_active(&self) -> bool {
        self.status == NodeStatus::Active
    }

    /// Whether a confirmation from the manager is outstanding.
    pub fn has_pending_change(&self) -> bool {
        matches!(
            self.status,
            NodeStatus::PendingAdded | NodeStatus::PendingStakeUpdate | NodeStatus::PendingRemoved
        )
    }
}
