//! Middleware Service - operator/node lifecycle and epoch stake accounting.

use crate::domain::{
    EpochSchedule, EpochStakeCache, Node, NodeStatus, OperatorRecord, WeightScaler,
};
use crate::error::{MiddlewareError, MiddlewareResult};
use crate::ports::{
    AssetClassSource, CollateralSource, MessageIndex, TimeSource, ValidatorRegistration,
    ValidatorSetManager,
};
use parking_lot::RwLock;
use shared_types::{
    fmt_address, AssetClassId, BlsPublicKey, Epoch, L1Id, NodeId, OperatorId, Timestamp, U256,
    ValidationId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Static configuration of one middleware instance.
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    /// The L1 this middleware instance serves.
    pub l1: L1Id,
    pub schedule: EpochSchedule,
    /// How long a disabled operator stays removable-but-slashable.
    pub slashing_window: Timestamp,
    pub scaler: WeightScaler,
    /// Asset class whose bounds gate node-level stake.
    pub primary_asset_class: AssetClassId,
}

#[derive(Debug, Clone, Copy)]
enum PendingKind {
    Register,
    StakeUpdate { new_stake: U256 },
    Removal,
}

/// One outstanding two-phase operation, keyed by the manager's opaque
/// validation id.
#[derive(Debug, Clone, Copy)]
struct PendingAction {
    node_id: NodeId,
    kind: PendingKind,
}

#[derive(Default)]
struct MiddlewareState {
    operators: HashMap<OperatorId, OperatorRecord>,
    /// Registration order, for deterministic iteration.
    operator_order: Vec<OperatorId>,
    nodes: HashMap<NodeId, Node>,
    pending: HashMap<ValidationId, PendingAction>,
    cache: EpochStakeCache,
}

/// Result of a `force_update_nodes` pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebalanceReport {
    pub epoch: Epoch,
    /// Per-node stake target this pass aimed at.
    pub target_stake: U256,
    /// Nodes whose weight update was initiated.
    pub updated: Vec<NodeId>,
    /// Nodes left untouched because the per-call stake budget ran out.
    pub skipped: Vec<NodeId>,
    /// Stake that could not be placed on any existing node.
    pub leftover_stake: U256,
}

/// Node & Epoch State Machine
///
/// Owns all node and operator records for one L1 and references (never
/// owns) the collateral layer, the asset-class registry and the external
/// validator-set manager.
pub struct MiddlewareService<M, C, A, T>
where
    M: ValidatorSetManager,
    C: CollateralSource,
    A: AssetClassSource,
    T: TimeSource,
{
    manager: Arc<M>,
    collateral: Arc<C>,
    asset_classes: Arc<A>,
    time_source: Arc<T>,
    state: RwLock<MiddlewareState>,
    config: MiddlewareConfig,
}

impl<M, C, A, T> MiddlewareService<M, C, A, T>
where
    M: ValidatorSetManager,
    C: CollateralSource,
    A: AssetClassSource,
    T: TimeSource,
{
    /// Create a new MiddlewareService
    pub fn new(
        manager: Arc<M>,
        collateral: Arc<C>,
        asset_classes: Arc<A>,
        time_source: Arc<T>,
        config: MiddlewareConfig,
    ) -> Self {
        Self {
            manager,
            collateral,
            asset_classes,
            time_source,
            state: RwLock::new(MiddlewareState::default()),
            config,
        }
    }

    // === EPOCH ARITHMETIC ===

    /// Epoch containing the current instant.
    pub fn current_epoch(&self) -> MiddlewareResult<Epoch> {
        self.config.schedule.epoch_at_ts(self.time_source.now())
    }

    /// Start timestamp of an epoch.
    pub fn epoch_start_ts(&self, epoch: Epoch) -> Timestamp {
        self.config.schedule.epoch_start_ts(epoch)
    }

    // === OPERATOR LIFECYCLE ===

    /// Register an operator with this L1's middleware.
    pub fn register_operator(&self, operator: OperatorId) -> MiddlewareResult<()> {
        let now = self.time_source.now();
        let mut state = self.state.write();
        if state.operators.contains_key(&operator) {
            return Err(MiddlewareError::OperatorAlreadyRegistered);
        }
        state
            .operators
            .insert(operator, OperatorRecord::new(operator, now));
        state.operator_order.push(operator);
        info!(operator = %fmt_address(&operator), "operator registered");
        Ok(())
    }

    /// Disable an operator, starting its removal grace timer.
    pub fn disable_operator(&self, operator: OperatorId) -> MiddlewareResult<()> {
        let now = self.time_source.now();
        let mut state = self.state.write();
        let record = state
            .operators
            .get_mut(&operator)
            .ok_or(MiddlewareError::OperatorNotRegistered)?;
        record.enabled = false;
        record.disabled_at = Some(now);
        debug!(operator = %fmt_address(&operator), "operator disabled");
        Ok(())
    }

    /// Re-enable a disabled operator.
    pub fn enable_operator(&self, operator: OperatorId) -> MiddlewareResult<()> {
        let mut state = self.state.write();
        let record = state
            .operators
            .get_mut(&operator)
            .ok_or(MiddlewareError::OperatorNotRegistered)?;
        record.enabled = true;
        record.disabled_at = None;
        debug!(operator = %fmt_address(&operator), "operator enabled");
        Ok(())
    }

    /// Remove a disabled operator once the slashing window has elapsed.
    ///
    /// The window keeps the operator slashable for the epochs it was active
    /// in.
    pub fn remove_operator(&self, operator: OperatorId) -> MiddlewareResult<()> {
        let now = self.time_source.now();
        let mut state = self.state.write();
        let record = state
            .operators
            .get(&operator)
            .ok_or(MiddlewareError::OperatorNotRegistered)?;
        let disabled_at = record
            .disabled_at
            .ok_or(MiddlewareError::OperatorNotDisabled)?;
        let elapsed = now.saturating_sub(disabled_at);
        if elapsed < self.config.slashing_window {
            return Err(MiddlewareError::OperatorGracePeriodNotPassed {
                remaining: self.config.slashing_window - elapsed,
            });
        }
        if !record.nodes.is_empty() {
            return Err(MiddlewareError::OperatorHasNodes);
        }
        state.operators.remove(&operator);
        state.operator_order.retain(|o| *o != operator);
        info!(operator = %fmt_address(&operator), "operator removed");
        Ok(())
    }

    // === NODE LIFECYCLE ===

    /// Register a new validating node for an operator.
    ///
    /// `stake_request` of `None` targets all of the operator's free stake.
    /// On success the node is `PendingAdded` until the manager's
    /// confirmation is presented to
    /// [`MiddlewareService::complete_validator_registration`].
    pub fn add_node(
        &self,
        operator: OperatorId,
        node_id: NodeId,
        bls_key: BlsPublicKey,
        registration_expiry: Timestamp,
        stake_request: Option<U256>,
    ) -> MiddlewareResult<ValidationId> {
        let now = self.time_source.now();
        let mut state = self.state.write();
        let state = &mut *state;

        let record = state
            .operators
            .get_mut(&operator)
            .ok_or(MiddlewareError::OperatorNotRegistered)?;
        if !record.enabled {
            return Err(MiddlewareError::OperatorDisabled);
        }
        if state.nodes.contains_key(&node_id) {
            return Err(MiddlewareError::NodeAlreadyExists(node_id));
        }

        let class = self.config.primary_asset_class;
        let (min_stake, max_stake) = self
            .asset_classes
            .stake_bounds(class)
            .ok_or(MiddlewareError::AssetClassNotFound(class))?;

        let total = self.collateral.operator_stake_at(class, operator, now);
        let used = record
            .nodes
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .fold(U256::zero(), |acc, n| acc + n.stake);
        let free = total.saturating_sub(used);

        let requested = stake_request.unwrap_or(free);
        if requested > free {
            return Err(MiddlewareError::NotEnoughFreeStake {
                requested,
                available: free,
            });
        }
        if requested < min_stake {
            return Err(MiddlewareError::StakeTooLow {
                requested,
                min: min_stake,
            });
        }
        if !max_stake.is_zero() && requested > max_stake {
            return Err(MiddlewareError::StakeTooHigh {
                requested,
                max: max_stake,
            });
        }

        let weight = self.config.scaler.stake_to_weight(requested);
        let remaining = self.manager.remaining_weight_capacity();
        if weight > remaining {
            return Err(MiddlewareError::SecurityModuleCapacityNotEnough {
                required_weight: weight,
                remaining,
            });
        }

        let validation_id = self
            .manager
            .initiate_validator_registration(ValidatorRegistration {
                node_id,
                bls_key,
                registration_expiry,
                owner: operator,
                weight,
            })
            .map_err(|e| MiddlewareError::Manager(e.to_string()))?;

        state.nodes.insert(
            node_id,
            Node {
                node_id,
                operator,
                bls_key,
                validation_id,
                status: NodeStatus::PendingAdded,
                stake: requested,
                registered_at: now,
            },
        );
        record.nodes.push(node_id);
        state.pending.insert(
            validation_id,
            PendingAction {
                node_id,
                kind: PendingKind::Register,
            },
        );
        info!(
            operator = %fmt_address(&operator),
            node = %node_id,
            validation_id = %validation_id,
            stake = %requested,
            "node registration initiated"
        );
        Ok(validation_id)
    }

    /// Finalize a node registration confirmed by the manager.
    pub fn complete_validator_registration(
        &self,
        message_index: MessageIndex,
    ) -> MiddlewareResult<NodeId> {
        let validation_id = self
            .manager
            .complete_validator_registration(message_index)
            .map_err(|e| MiddlewareError::Manager(e.to_string()))?;

        let mut state = self.state.write();
        let action = state
            .pending
            .get(&validation_id)
            .ok_or(MiddlewareError::UnknownConfirmation(validation_id))?;
        if !matches!(action.kind, PendingKind::Register) {
            return Err(MiddlewareError::UnknownConfirmation(validation_id));
        }
        let node_id = action.node_id;
        state.pending.remove(&validation_id);

        let node = state
            .nodes
            .get_mut(&node_id)
            .ok_or(MiddlewareError::NodeNotFound(node_id))?;
        node.status = NodeStatus::Active;
        info!(node = %node_id, validation_id = %validation_id, "node active");
        Ok(node_id)
    }

    /// Request a stake (weight) change for an active node.
    pub fn initialize_validator_stake_update(
        &self,
        operator: OperatorId,
        node_id: NodeId,
        new_stake: U256,
    ) -> MiddlewareResult<()> {
        let now = self.time_source.now();
        let mut state = self.state.write();
        let state = &mut *state;

        let record = state
            .operators
            .get(&operator)
            .ok_or(MiddlewareError::OperatorNotRegistered)?;
        let node = state
            .nodes
            .get(&node_id)
            .ok_or(MiddlewareError::NodeNotFound(node_id))?;
        if node.operator != operator {
            return Err(MiddlewareError::NodeNotOwned(node_id));
        }
        Self::require_active(node)?;

        let class = self.config.primary_asset_class;
        let (min_stake, max_stake) = self
            .asset_classes
            .stake_bounds(class)
            .ok_or(MiddlewareError::AssetClassNotFound(class))?;

        let total = self.collateral.operator_stake_at(class, operator, now);
        let used = record
            .nodes
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .fold(U256::zero(), |acc, n| acc + n.stake);
        // The node's own current stake returns to the pool first.
        let available = total.saturating_sub(used) + node.stake;
        if new_stake > available {
            return Err(MiddlewareError::NotEnoughFreeStake {
                requested: new_stake,
                available,
            });
        }
        if new_stake < min_stake {
            return Err(MiddlewareError::StakeTooLow {
                requested: new_stake,
                min: min_stake,
            });
        }
        if !max_stake.is_zero() && new_stake > max_stake {
            return Err(MiddlewareError::StakeTooHigh {
                requested: new_stake,
                max: max_stake,
            });
        }

        let old_weight = self.config.scaler.stake_to_weight(node.stake);
        let new_weight = self.config.scaler.stake_to_weight(new_stake);
        if new_weight > old_weight {
            let growth = new_weight - old_weight;
            let remaining = self.manager.remaining_weight_capacity();
            if growth > remaining {
                return Err(MiddlewareError::SecurityModuleCapacityNotEnough {
                    required_weight: growth,
                    remaining,
                });
            }
        }

        let validation_id = node.validation_id;
        self.manager
            .initiate_validator_weight_update(validation_id, new_weight)
            .map_err(|e| MiddlewareError::Manager(e.to_string()))?;

        let node = state
            .nodes
            .get_mut(&node_id)
            .ok_or(MiddlewareError::NodeNotFound(node_id))?;
        node.status = NodeStatus::PendingStakeUpdate;
        state.pending.insert(
            validation_id,
            PendingAction {
                node_id,
                kind: PendingKind::StakeUpdate { new_stake },
            },
        );
        debug!(node = %node_id, stake = %new_stake, "stake update initiated");
        Ok(())
    }

    /// Finalize a stake update confirmed by the manager.
    pub fn complete_stake_update(&self, message_index: MessageIndex) -> MiddlewareResult<NodeId> {
        let validation_id = self
            .manager
            .complete_validator_weight_update(message_index)
            .map_err(|e| MiddlewareError::Manager(e.to_string()))?;

        let mut state = self.state.write();
        let action = state
            .pending
            .get(&validation_id)
            .ok_or(MiddlewareError::UnknownConfirmation(validation_id))?;
        let PendingKind::StakeUpdate { new_stake } = action.kind else {
            return Err(MiddlewareError::UnknownConfirmation(validation_id));
        };
        let node_id = action.node_id;
        state.pending.remove(&validation_id);

        let node = state
            .nodes
            .get_mut(&node_id)
            .ok_or(MiddlewareError::NodeNotFound(node_id))?;
        node.stake = new_stake;
        node.status = NodeStatus::Active;
        debug!(node = %node_id, stake = %new_stake, "stake update confirmed");
        Ok(node_id)
    }

    /// Request removal of a node. Takes effect in the node set only once
    /// confirmed.
    pub fn remove_node(&self, operator: OperatorId, node_id: NodeId) -> MiddlewareResult<()> {
        let mut state = self.state.write();
        if !state.operators.contains_key(&operator) {
            return Err(MiddlewareError::OperatorNotRegistered);
        }
        let node = state
            .nodes
            .get(&node_id)
            .ok_or(MiddlewareError::NodeNotFound(node_id))?;
        if node.operator != operator {
            return Err(MiddlewareError::NodeNotOwned(node_id));
        }
        Self::require_active(node)?;

        let validation_id = node.validation_id;
        self.manager
            .initiate_validator_removal(validation_id)
            .map_err(|e| MiddlewareError::Manager(e.to_string()))?;

        let node = state
            .nodes
            .get_mut(&node_id)
            .ok_or(MiddlewareError::NodeNotFound(node_id))?;
        node.status = NodeStatus::PendingRemoved;
        state.pending.insert(
            validation_id,
            PendingAction {
                node_id,
                kind: PendingKind::Removal,
            },
        );
        info!(node = %node_id, "node removal initiated");
        Ok(())
    }

    /// Finalize a node removal confirmed by the manager.
    ///
    /// Releases the node's slot in its operator's node list in the same
    /// call, so the list shrinks by exactly one regardless of whether the
    /// node was registered in the current epoch.
    pub fn complete_validator_removal(
        &self,
        message_index: MessageIndex,
    ) -> MiddlewareResult<NodeId> {
        let validation_id = self
            .manager
            .complete_validator_removal(message_index)
            .map_err(|e| MiddlewareError::Manager(e.to_string()))?;

        let mut state = self.state.write();
        let state = &mut *state;
        let action = state
            .pending
            .get(&validation_id)
            .ok_or(MiddlewareError::UnknownConfirmation(validation_id))?;
        if !matches!(action.kind, PendingKind::Removal) {
            return Err(MiddlewareError::UnknownConfirmation(validation_id));
        }
        let node_id = action.node_id;
        state.pending.remove(&validation_id);

        let node = state
            .nodes
            .get_mut(&node_id)
            .ok_or(MiddlewareError::NodeNotFound(node_id))?;
        node.status = NodeStatus::Removed;
        node.stake = U256::zero();
        if let Some(record) = state.operators.get_mut(&node.operator) {
            record.nodes.retain(|id| *id != node_id);
        }
        info!(node = %node_id, "node removed");
        Ok(node_id)
    }

    // === REBALANCING ===

    /// Retarget each of an operator's active nodes toward its fair share of
    /// the operator's available stake. Runs at most once per operator per
    /// epoch; `limit_stake` throttles the total stake movement of one call.
    pub fn force_update_nodes(
        &self,
        operator: OperatorId,
        limit_stake: U256,
    ) -> MiddlewareResult<RebalanceReport> {
        let now = self.time_source.now();
        let epoch = self.config.schedule.epoch_at_ts(now)?;
        let mut state = self.state.write();
        let state = &mut *state;

        let record = state
            .operators
            .get_mut(&operator)
            .ok_or(MiddlewareError::OperatorNotRegistered)?;
        if record.last_rebalance_epoch == Some(epoch) {
            return Err(MiddlewareError::AlreadyRebalanced { epoch });
        }

        let class = self.config.primary_asset_class;
        let (_, max_stake) = self
            .asset_classes
            .stake_bounds(class)
            .ok_or(MiddlewareError::AssetClassNotFound(class))?;
        let total = self.collateral.operator_stake_at(class, operator, now);

        let active: Vec<NodeId> = record
            .nodes
            .iter()
            .filter(|id| state.nodes.get(*id).map(Node::is_active).unwrap_or(false))
            .copied()
            .collect();

        record.last_rebalance_epoch = Some(epoch);

        if active.is_empty() {
            if !total.is_zero() {
                warn!(
                    operator = %fmt_address(&operator),
                    leftover = %total,
                    "operator has leftover stake and no active nodes"
                );
            }
            return Ok(RebalanceReport {
                epoch,
                target_stake: U256::zero(),
                updated: Vec::new(),
                skipped: Vec::new(),
                leftover_stake: total,
            });
        }

        let fair = total / U256::from(active.len() as u64);
        let target = if max_stake.is_zero() {
            fair
        } else {
            fair.min(max_stake)
        };
        let leftover = total.saturating_sub(target * U256::from(active.len() as u64));

        let mut budget = limit_stake;
        let mut updated = Vec::new();
        let mut skipped = Vec::new();
        let mut exhausted = false;
        for node_id in active {
            let node = state
                .nodes
                .get(&node_id)
                .ok_or(MiddlewareError::NodeNotFound(node_id))?;
            let delta = if node.stake > target {
                node.stake - target
            } else {
                target - node.stake
            };
            if delta.is_zero() {
                continue;
            }
            if exhausted || delta > budget {
                exhausted = true;
                skipped.push(node_id);
                continue;
            }
            budget -= delta;

            let validation_id = node.validation_id;
            let new_weight = self.config.scaler.stake_to_weight(target);
            self.manager
                .initiate_validator_weight_update(validation_id, new_weight)
                .map_err(|e| MiddlewareError::Manager(e.to_string()))?;
            let node = state
                .nodes
                .get_mut(&node_id)
                .ok_or(MiddlewareError::NodeNotFound(node_id))?;
            node.status = NodeStatus::PendingStakeUpdate;
            state.pending.insert(
                validation_id,
                PendingAction {
                    node_id,
                    kind: PendingKind::StakeUpdate { new_stake: target },
                },
            );
            updated.push(node_id);
        }

        if !leftover.is_zero() {
            warn!(
                operator = %fmt_address(&operator),
                leftover = %leftover,
                "operator has leftover stake"
            );
        }
        debug!(
            operator = %fmt_address(&operator),
            epoch,
            updated = updated.len(),
            skipped = skipped.len(),
            "node rebalance pass"
        );
        Ok(RebalanceReport {
            epoch,
            target_stake: target,
            updated,
            skipped,
            leftover_stake: leftover,
        })
    }

    // === EPOCH STAKE CACHES ===

    /// Compute and cache every operator's stake and the class total for an
    /// epoch. Idempotent: a cached epoch is returned as-is, never
    /// recomputed.
    pub fn calc_and_cache_stakes(
        &self,
        epoch: Epoch,
        asset_class: AssetClassId,
    ) -> MiddlewareResult<U256> {
        let current = self.current_epoch()?;
        if epoch > current {
            return Err(MiddlewareError::InvalidEpoch { epoch, current });
        }
        if !self.asset_classes.contains(asset_class) {
            return Err(MiddlewareError::AssetClassNotFound(asset_class));
        }

        let mut state = self.state.write();
        if let Some(total) = state.cache.class_total(epoch, asset_class) {
            return Ok(total);
        }

        let ts = self.config.schedule.epoch_start_ts(epoch);
        let operators = state.operator_order.clone();
        let mut total = U256::zero();
        for operator in operators {
            let stake = self.collateral.operator_stake_at(asset_class, operator, ts);
            state
                .cache
                .cache_operator_stake(epoch, asset_class, operator, stake);
            total += stake;
        }
        let total = state.cache.cache_class_total(epoch, asset_class, total);
        info!(epoch, asset_class, %total, "epoch stakes cached");
        Ok(total)
    }

    /// Cache each registered node's stake for an epoch, across all
    /// operators. Idempotent per (epoch, validation id).
    pub fn calc_and_cache_node_stakes(&self, epoch: Epoch) -> MiddlewareResult<()> {
        let current = self.current_epoch()?;
        if epoch > current {
            return Err(MiddlewareError::InvalidEpoch { epoch, current });
        }

        let mut state = self.state.write();
        let state = &mut *state;
        for operator in &state.operator_order {
            let Some(record) = state.operators.get(operator) else {
                continue;
            };
            for node_id in &record.nodes {
                if let Some(node) = state.nodes.get(node_id) {
                    if node.status != NodeStatus::Removed {
                        state
                            .cache
                            .cache_node_stake(epoch, node.validation_id, node.stake);
                    }
                }
            }
        }
        Ok(())
    }

    /// Cached class total for an epoch, if computed.
    pub fn total_stake_cached(&self, epoch: Epoch, asset_class: AssetClassId) -> Option<U256> {
        self.state.read().cache.class_total(epoch, asset_class)
    }

    /// Cached operator stake for an epoch, if computed.
    pub fn operator_stake_cached(
        &self,
        epoch: Epoch,
        asset_class: AssetClassId,
        operator: OperatorId,
    ) -> Option<U256> {
        self.state
            .read()
            .cache
            .operator_stake(epoch, asset_class, operator)
    }

    /// Cached node stake for an epoch, if computed.
    pub fn node_stake_cached(&self, epoch: Epoch, validation_id: ValidationId) -> Option<U256> {
        self.state.read().cache.node_stake(epoch, validation_id)
    }

    // === SLASHING ===

    /// Slash an operator for misbehavior in a finalized epoch.
    ///
    /// Bounded by the operator's cached stake for that epoch and fanned out
    /// proportionally across the class's vaults. Returns the amount
    /// actually slashed.
    pub fn slash(
        &self,
        epoch: Epoch,
        operator: OperatorId,
        amount: U256,
        asset_class: AssetClassId,
    ) -> MiddlewareResult<U256> {
        let current = self.current_epoch()?;
        if epoch >= current {
            return Err(MiddlewareError::EpochNotFinalized { epoch, current });
        }

        let available = self
            .state
            .read()
            .cache
            .operator_stake(epoch, asset_class, operator)
            .ok_or(MiddlewareError::StakeNotCached { epoch, asset_class })?;
        if amount > available {
            return Err(MiddlewareError::TooBigSlashAmount { amount, available });
        }

        let epoch_start = self.config.schedule.epoch_start_ts(epoch);
        let slashed = self
            .collateral
            .slash(available, amount, asset_class, operator, epoch_start)
            .map_err(|e| MiddlewareError::Collateral(e.to_string()))?;
        info!(
            operator = %fmt_address(&operator),
            epoch,
            asset_class,
            requested = %amount,
            %slashed,
            "operator slashed"
        );
        Ok(slashed)
    }

    // === READS ===

    /// Operator record, if registered.
    pub fn operator(&self, operator: OperatorId) -> Option<OperatorRecord> {
        self.state.read().operators.get(&operator).cloned()
    }

    /// Registered operators, in registration order.
    pub fn operators(&self) -> Vec<OperatorId> {
        self.state.read().operator_order.clone()
    }

    /// Node ids currently attached to an operator.
    pub fn operator_nodes(&self, operator: OperatorId) -> MiddlewareResult<Vec<NodeId>> {
        self.state
            .read()
            .operators
            .get(&operator)
            .map(|r| r.nodes.clone())
            .ok_or(MiddlewareError::OperatorNotRegistered)
    }

    /// Node record, if known (including `Removed` history records).
    pub fn node(&self, node_id: NodeId) -> Option<Node> {
        self.state.read().nodes.get(&node_id).cloned()
    }

    fn require_active(node: &Node) -> MiddlewareResult<()> {
        match node.status {
            NodeStatus::Active => Ok(()),
            NodeStatus::PendingRemoved => Err(MiddlewareError::NodePendingRemoval(node.node_id)),
            NodeStatus::PendingAdded | NodeStatus::PendingStakeUpdate => {
                Err(MiddlewareError::NodePendingUpdate(node.node_id))
            }
            NodeStatus::Removed => Err(MiddlewareError::NodeNotActive(node.node_id)),
        }
    }
}
