//! Operator records.

use serde::{Deserialize, Serialize};
use shared_types::{Epoch, NodeId, OperatorId, Timestamp};

/// Registration record of an operator within one L1's middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub operator: OperatorId,
    pub registered_at: Timestamp,
    pub enabled: bool,
    /// Set when the operator is disabled; starts the removal grace timer.
    pub disabled_at: Option<Timestamp>,
    /// Node ids currently attached to this operator. An id leaves this list
    /// exactly once, when its removal is confirmed.
    pub nodes: Vec<NodeId>,
    /// Last epoch in which `force_update_nodes` ran for this operator.
    pub last_rebalance_epoch: Option<Epoch>,
}

impl OperatorRecord {
    pub fn new(operator: OperatorId, registered_at: Timestamp) -> Self {
        Self {
            operator,
            registered_at,
            enabled: true,
            disabled_at: None,
            nodes: Vec::new(),
            last_rebalance_epoch: None,
        }
    }
}
