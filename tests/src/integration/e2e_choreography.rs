//! # End-to-End Choreography
//!
//! The full stack in one test bench: real per-vault [`Delegator`] instances
//! back the vault manager's gateway port, the vault manager backs the
//! middleware's collateral port, and the middleware reconciles against the
//! scripted validator-set manager.
//!
//! ```text
//! Middleware (sm-04) ──stake/slash──→ VaultManager (sm-05)
//!                                         │ per vault
//!                                         ↓
//!                                  Delegator (sm-02) ── Trace (sm-01)
//! ```

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use shared_types::{Address, AssetClassId, L1Id, NodeId, OperatorId, Timestamp, U256, VaultId};
    use sm_02_delegation::adapters::memory::{
        InMemoryOptInRegistry, RecordingSlashHook, StaticVault,
    };
    use sm_02_delegation::{Delegator, DelegatorConfig};
    use sm_03_asset_classes::{AssetClassRegistry, PRIMARY_ASSET_CLASS};
    use sm_04_middleware::{
        EpochSchedule, MiddlewareConfig, MiddlewareService, MockValidatorSetManager,
        RegistryAssetClassSource, ValidatorSetManager, VaultCollateralSource, WeightScaler,
    };
    use sm_05_vault_manager::adapters::memory::InMemoryVaultGateway;
    use sm_05_vault_manager::{
        DelegatorGateway, VaultManager, VaultManagerConfig, VaultSlashError,
    };

    const CLASS: AssetClassId = PRIMARY_ASSET_CLASS;

    #[derive(Default)]
    pub struct SharedClock(AtomicU64);

    impl SharedClock {
        fn new(start: Timestamp) -> Self {
            Self(AtomicU64::new(start))
        }

        fn advance(&self, seconds: u64) {
            self.0.fetch_add(seconds, Ordering::SeqCst);
        }
    }

    impl sm_02_delegation::TimeSource for SharedClock {
        fn now(&self) -> Timestamp {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl sm_04_middleware::TimeSource for SharedClock {
        fn now(&self) -> Timestamp {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl sm_05_vault_manager::TimeSource for SharedClock {
        fn now(&self) -> Timestamp {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn l1() -> L1Id {
        [0x11; 20]
    }

    fn curator() -> Address {
        [0xCC; 20]
    }

    fn operator(id: u8) -> OperatorId {
        [id; 20]
    }

    fn vault(id: u8) -> VaultId {
        [0xB0 | id; 20]
    }

    fn node_id(id: u8) -> NodeId {
        NodeId([id; 32])
    }

    type RealDelegator = Delegator<StaticVault, InMemoryOptInRegistry, SharedClock>;

    /// Gateway backed by one real delegator per vault.
    #[derive(Default)]
    struct DelegatorBackedGateway {
        delegators: HashMap<VaultId, RealDelegator>,
    }

    impl DelegatorGateway for DelegatorBackedGateway {
        fn operator_stake_at(
            &self,
            vault: VaultId,
            asset_class: AssetClassId,
            operator: OperatorId,
            timestamp: Timestamp,
        ) -> U256 {
            self.delegators
                .get(&vault)
                .map(|d| {
                    let hints = d.hints_at(l1(), asset_class, operator, timestamp);
                    d.stake_at(l1(), asset_class, operator, timestamp, &hints)
                })
                .unwrap_or_else(U256::zero)
        }

        fn slash(
            &self,
            vault: VaultId,
            asset_class: AssetClassId,
            operator: OperatorId,
            amount: U256,
            capture_timestamp: Timestamp,
        ) -> Result<(), VaultSlashError> {
            let delegator = self
                .delegators
                .get(&vault)
                .ok_or_else(|| VaultSlashError("vault has no delegator".into()))?;
            delegator.on_slash(l1(), asset_class, operator, amount, capture_timestamp);
            Ok(())
        }
    }

    /// Build one vault's delegator: `active` collateral, limit 600 shared by
    /// operator 1 (3 shares) and operator 2 (7 shares).
    fn build_delegator(
        vault_id: VaultId,
        active: u64,
        clock: Arc<SharedClock>,
        hook: Arc<RecordingSlashHook>,
    ) -> RealDelegator {
        let vault_source = Arc::new(StaticVault::new());
        vault_source.set_active_stake(1_000, U256::from(active));
        let vault_opt_in = Arc::new(InMemoryOptInRegistry::new());
        let l1_opt_in = Arc::new(InMemoryOptInRegistry::new());
        for op in [operator(1), operator(2)] {
            vault_opt_in.set_opted_in(op, vault_id, 1_000, true);
            l1_opt_in.set_opted_in(op, l1(), 1_000, true);
        }
        let delegator = Delegator::new(
            vault_source,
            vault_opt_in,
            l1_opt_in,
            clock,
            DelegatorConfig {
                vault: vault_id,
                limit_setters: HashSet::from([curator()]),
                share_setters: HashSet::from([curator()]),
            },
        )
        .with_slash_hook(hook);
        delegator
            .set_max_l1_limit(l1(), l1(), CLASS, U256::from(600))
            .unwrap();
        delegator
            .set_l1_limit(curator(), l1(), CLASS, U256::from(600))
            .unwrap();
        delegator
            .set_operator_l1_shares(curator(), l1(), CLASS, operator(1), U256::from(3))
            .unwrap();
        delegator
            .set_operator_l1_shares(curator(), l1(), CLASS, operator(2), U256::from(7))
            .unwrap();
        delegator
    }

    #[test]
    fn test_delegated_stake_flows_through_to_slash_hooks() {
        crate::init_tracing();
        let clock = Arc::new(SharedClock::new(1_000));
        let hook1 = Arc::new(RecordingSlashHook::new());
        let hook2 = Arc::new(RecordingSlashHook::new());

        // Vault 1 holds 1000 active stake, vault 2 holds 500; both capped
        // at a 600 limit with a 3:7 share split.
        let mut gateway = DelegatorBackedGateway::default();
        gateway.delegators.insert(
            vault(1),
            build_delegator(vault(1), 1_000, clock.clone(), hook1.clone()),
        );
        gateway.delegators.insert(
            vault(2),
            build_delegator(vault(2), 500, clock.clone(), hook2.clone()),
        );

        let vault_manager = Arc::new(VaultManager::new(
            Arc::new(InMemoryVaultGateway::new(1_000)),
            Arc::new(gateway),
            clock.clone(),
            VaultManagerConfig {
                slashing_window: 150,
                epoch_duration: 100,
                vault_removal_epoch_delay: 2,
            },
        ));
        vault_manager
            .register_vault(vault(1), CLASS, U256::from(10_000))
            .unwrap();
        vault_manager
            .register_vault(vault(2), CLASS, U256::from(10_000))
            .unwrap();

        let mut registry = AssetClassRegistry::new();
        registry
            .add_asset_class(CLASS, U256::from(10), U256::from(10_000), [0xA5; 20])
            .unwrap();
        let manager = Arc::new(MockValidatorSetManager::new(100_000));
        let middleware = MiddlewareService::new(
            manager.clone(),
            Arc::new(VaultCollateralSource::new(vault_manager)),
            Arc::new(RegistryAssetClassSource::new(registry)),
            clock.clone(),
            MiddlewareConfig {
                l1: l1(),
                schedule: EpochSchedule::new(1_000, 100),
                slashing_window: 150,
                scaler: WeightScaler::new(U256::one()),
                primary_asset_class: CLASS,
            },
        );

        // Operator 1's cross-vault stake: vault 1 gives 600*3/10 = 180,
        // vault 2 gives min(500, 600)*3/10 = 150. Total 330.
        middleware.register_operator(operator(1)).unwrap();
        let vid = middleware
            .add_node(operator(1), node_id(1), [1; 48], 5_000, None)
            .unwrap();
        assert_eq!(middleware.node(node_id(1)).unwrap().stake, U256::from(330));
        middleware
            .complete_validator_registration(manager.last_message_index().unwrap())
            .unwrap();
        assert_eq!(manager.validator_weight(vid), 330);

        // Cache epoch 0, finalize it, then slash 110 (a third of 330)
        let total = middleware.calc_and_cache_stakes(0, CLASS).unwrap();
        assert_eq!(total, U256::from(330));
        clock.advance(100);
        let slashed = middleware
            .slash(0, operator(1), U256::from(110), CLASS)
            .unwrap();

        // 110 * 180/330 = 60 to vault 1, 110 * 150/330 = 50 to vault 2
        assert_eq!(slashed, U256::from(110));
        assert_eq!(hook1.calls(), 1);
        assert_eq!(hook1.last_call().unwrap(), (operator(1), U256::from(60)));
        assert_eq!(hook2.calls(), 1);
        assert_eq!(hook2.last_call().unwrap(), (operator(1), U256::from(50)));
    }
}
