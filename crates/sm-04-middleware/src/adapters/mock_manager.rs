//! Scripted in-memory validator-set manager.
//!
//! Mirrors the two-phase shape of the real consensus-layer manager: every
//! `initiate_*` call appends a message to an internal log and nothing
//! changes in the validator set until the matching `complete_*` call
//! presents that message's index. Tests drive confirmations explicitly, in
//! any order, or never.

use crate::ports::{
    MessageIndex, ValidatorRegistration, ValidatorSetManager, ValidatorSetManagerError,
};
use parking_lot::RwLock;
use shared_types::ValidationId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum MessageKind {
    Register { weight: u64 },
    UpdateWeight { new_weight: u64 },
    Remove,
}

#[derive(Debug, Clone)]
struct LogMessage {
    validation_id: ValidationId,
    kind: MessageKind,
    completed: bool,
}

#[derive(Default)]
struct ManagerState {
    log: Vec<LogMessage>,
    /// Confirmed validators and their weights.
    validators: HashMap<ValidationId, u64>,
    /// Weight reserved by initiated-but-unconfirmed registrations.
    reserved: u64,
    next_validation_id: u64,
}

/// In-memory [`ValidatorSetManager`] with a bounded weight capacity.
pub struct MockValidatorSetManager {
    state: RwLock<ManagerState>,
    max_weight: u64,
}

impl MockValidatorSetManager {
    pub fn new(max_weight: u64) -> Self {
        Self {
            state: RwLock::new(ManagerState::default()),
            max_weight,
        }
    }

    /// Index of the most recently appended message.
    pub fn last_message_index(&self) -> Option<MessageIndex> {
        let len = self.state.read().log.len();
        len.checked_sub(1).map(|i| i as MessageIndex)
    }

    /// Number of messages ever appended.
    pub fn message_count(&self) -> usize {
        self.state.read().log.len()
    }

    /// Total confirmed weight.
    pub fn total_weight(&self) -> u64 {
        self.state.read().validators.values().sum()
    }

    fn fresh_validation_id(state: &mut ManagerState) -> ValidationId {
        state.next_validation_id += 1;
        let mut id = [0u8; 32];
        id[24..].copy_from_slice(&state.next_validation_id.to_be_bytes());
        ValidationId(id)
    }

    fn take_message(
        state: &mut ManagerState,
        message_index: MessageIndex,
    ) -> Result<(ValidationId, MessageKind), ValidatorSetManagerError> {
        let message = state
            .log
            .get_mut(message_index as usize)
            .ok_or_else(|| ValidatorSetManagerError("unknown message index".into()))?;
        if message.completed {
            return Err(ValidatorSetManagerError("message already completed".into()));
        }
        message.completed = true;
        Ok((message.validation_id, message.kind.clone()))
    }
}

impl ValidatorSetManager for MockValidatorSetManager {
    fn initiate_validator_registration(
        &self,
        request: ValidatorRegistration,
    ) -> Result<ValidationId, ValidatorSetManagerError> {
        let mut state = self.state.write();
        let confirmed: u64 = state.validators.values().sum();
        if request.weight > self.max_weight.saturating_sub(confirmed + state.reserved) {
            return Err(ValidatorSetManagerError("weight capacity exceeded".into()));
        }
        let validation_id = Self::fresh_validation_id(&mut state);
        state.reserved += request.weight;
        state.log.push(LogMessage {
            validation_id,
            kind: MessageKind::Register {
                weight: request.weight,
            },
            completed: false,
        });
        Ok(validation_id)
    }

    fn initiate_validator_weight_update(
        &self,
        validation_id: ValidationId,
        new_weight: u64,
    ) -> Result<(), ValidatorSetManagerError> {
        let mut state = self.state.write();
        if !state.validators.contains_key(&validation_id) {
            return Err(ValidatorSetManagerError("unknown validation id".into()));
        }
        state.log.push(LogMessage {
            validation_id,
            kind: MessageKind::UpdateWeight { new_weight },
            completed: false,
        });
        Ok(())
    }

    fn initiate_validator_removal(
        &self,
        validation_id: ValidationId,
    ) -> Result<(), ValidatorSetManagerError> {
        let mut state = self.state.write();
        if !state.validators.contains_key(&validation_id) {
            return Err(ValidatorSetManagerError("unknown validation id".into()));
        }
        state.log.push(LogMessage {
            validation_id,
            kind: MessageKind::Remove,
            completed: false,
        });
        Ok(())
    }

    fn complete_validator_registration(
        &self,
        message_index: MessageIndex,
    ) -> Result<ValidationId, ValidatorSetManagerError> {
        let mut state = self.state.write();
        let (validation_id, kind) = Self::take_message(&mut state, message_index)?;
        let MessageKind::Register { weight } = kind else {
            return Err(ValidatorSetManagerError("not a registration message".into()));
        };
        state.reserved = state.reserved.saturating_sub(weight);
        state.validators.insert(validation_id, weight);
        Ok(validation_id)
    }

    fn complete_validator_weight_update(
        &self,
        message_index: MessageIndex,
    ) -> Result<ValidationId, ValidatorSetManagerError> {
        let mut state = self.state.write();
        let (validation_id, kind) = Self::take_message(&mut state, message_index)?;
        let MessageKind::UpdateWeight { new_weight } = kind else {
            return Err(ValidatorSetManagerError("not a weight-update message".into()));
        };
        state.validators.insert(validation_id, new_weight);
        Ok(validation_id)
    }

    fn complete_validator_removal(
        &self,
        message_index: MessageIndex,
    ) -> Result<ValidationId, ValidatorSetManagerError> {
        let mut state = self.state.write();
        let (validation_id, kind) = Self::take_message(&mut state, message_index)?;
        let MessageKind::Remove = kind else {
            return Err(ValidatorSetManagerError("not a removal message".into()));
        };
        state.validators.remove(&validation_id);
        Ok(validation_id)
    }

    fn validator_weight(&self, validation_id: ValidationId) -> u64 {
        self.state
            .read()
            .validators
            .get(&validation_id)
            .copied()
            .unwrap_or(0)
    }

    fn remaining_weight_capacity(&self) -> u64 {
        let state = self.state.read();
        let confirmed: u64 = state.validators.values().sum();
        self.max_weight.saturating_sub(confirmed + state.reserved)
    }
}
