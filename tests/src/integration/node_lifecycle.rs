//! # Node Lifecycle Integration Tests
//!
//! Drives the full choreography: vault manager collateral feeds the
//! middleware, which reconciles node registrations, stake updates and
//! removals against the scripted validator-set manager.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use shared_types::{AssetClassId, NodeId, OperatorId, Timestamp, U256, VaultId};
    use sm_03_asset_classes::{AssetClassRegistry, PRIMARY_ASSET_CLASS};
    use sm_04_middleware::{
        EpochSchedule, MiddlewareConfig, MiddlewareService, MockValidatorSetManager, NodeStatus,
        RegistryAssetClassSource, ValidatorSetManager, VaultCollateralSource, WeightScaler,
    };
    use sm_05_vault_manager::adapters::memory::{InMemoryDelegatorGateway, InMemoryVaultGateway};
    use sm_05_vault_manager::{VaultManager, VaultManagerConfig};

    const CLASS: AssetClassId = PRIMARY_ASSET_CLASS;

    /// One clock shared by every component.
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

    fn operator(id: u8) -> OperatorId {
        [id; 20]
    }

    fn vault(id: u8) -> VaultId {
        [0xB0 | id; 20]
    }

    fn node_id(id: u8) -> NodeId {
        NodeId([id; 32])
    }

    type Middleware = MiddlewareService<
        MockValidatorSetManager,
        VaultCollateralSource<InMemoryVaultGateway, InMemoryDelegatorGateway, SharedClock>,
        RegistryAssetClassSource,
        SharedClock,
    >;

    struct Harness {
        middleware: Middleware,
        manager: Arc<MockValidatorSetManager>,
        delegators: Arc<InMemoryDelegatorGateway>,
        vault_manager:
            Arc<VaultManager<InMemoryVaultGateway, InMemoryDelegatorGateway, SharedClock>>,
        clock: Arc<SharedClock>,
    }

    /// Full stack: one registered vault, epoch length 100s from t=1000.
    fn harness() -> Harness {
        crate::init_tracing();
        let clock = Arc::new(SharedClock::new(1_000));
        let vault_gateway = Arc::new(InMemoryVaultGateway::new(1_000));
        let delegators = Arc::new(InMemoryDelegatorGateway::new());
        let vault_manager = Arc::new(VaultManager::new(
            vault_gateway,
            delegators.clone(),
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

        let mut registry = AssetClassRegistry::new();
        registry
            .add_asset_class(CLASS, U256::from(100), U256::from(500), [0xA5; 20])
            .unwrap();

        let manager = Arc::new(MockValidatorSetManager::new(100_000));
        let middleware = MiddlewareService::new(
            manager.clone(),
            Arc::new(VaultCollateralSource::new(vault_manager.clone())),
            Arc::new(RegistryAssetClassSource::new(registry)),
            clock.clone(),
            MiddlewareConfig {
                l1: [0x11; 20],
                schedule: EpochSchedule::new(1_000, 100),
                slashing_window: 150,
                scaler: WeightScaler::new(U256::one()),
                primary_asset_class: CLASS,
            },
        );
        Harness {
            middleware,
            manager,
            delegators,
            vault_manager,
            clock,
        }
    }

    #[test]
    fn test_registration_choreography() {
        let h = harness();
        h.delegators
            .set_stake(vault(1), operator(1), U256::from(400));
        h.middleware.register_operator(operator(1)).unwrap();

        let vid = h
            .middleware
            .add_node(operator(1), node_id(1), [1; 48], 5_000, None)
            .unwrap();
        assert_eq!(
            h.middleware.node(node_id(1)).unwrap().status,
            NodeStatus::PendingAdded
        );

        // The relayer observes the manager's message and confirms it
        let idx = h.manager.last_message_index().unwrap();
        h.middleware.complete_validator_registration(idx).unwrap();

        let node = h.middleware.node(node_id(1)).unwrap();
        assert_eq!(node.status, NodeStatus::Active);
        assert_eq!(node.stake, U256::from(400));
        assert_eq!(h.manager.validator_weight(vid), 400);
    }

    #[test]
    fn test_unconfirmed_node_stays_pending() {
        let h = harness();
        h.delegators
            .set_stake(vault(1), operator(1), U256::from(400));
        h.middleware.register_operator(operator(1)).unwrap();
        h.middleware
            .add_node(operator(1), node_id(1), [1; 48], 5_000, None)
            .unwrap();

        // No confirmation ever arrives; epochs keep passing
        h.clock.advance(1_000);

        let node = h.middleware.node(node_id(1)).unwrap();
        assert_eq!(node.status, NodeStatus::PendingAdded);
        // A pending node rejects further requests
        assert!(h
            .middleware
            .initialize_validator_stake_update(operator(1), node_id(1), U256::from(200))
            .is_err());
    }

    #[test]
    fn test_stake_follows_vault_collateral() {
        let h = harness();
        // Stake spread over two vaults of the same class
        h.vault_manager
            .register_vault(vault(2), CLASS, U256::from(10_000))
            .unwrap();
        h.delegators
            .set_stake(vault(1), operator(1), U256::from(250));
        h.delegators
            .set_stake(vault(2), operator(1), U256::from(150));
        h.middleware.register_operator(operator(1)).unwrap();

        // Node takes the operator's whole 400 cross-vault stake
        h.middleware
            .add_node(operator(1), node_id(1), [1; 48], 5_000, None)
            .unwrap();
        let node = h.middleware.node(node_id(1)).unwrap();
        assert_eq!(node.stake, U256::from(400));
    }

    #[test]
    fn test_rebalance_after_collateral_change() {
        let h = harness();
        h.delegators
            .set_stake(vault(1), operator(1), U256::from(400));
        h.middleware.register_operator(operator(1)).unwrap();
        h.middleware
            .add_node(
                operator(1),
                node_id(1),
                [1; 48],
                5_000,
                Some(U256::from(400)),
            )
            .unwrap();
        h.middleware
            .complete_validator_registration(h.manager.last_message_index().unwrap())
            .unwrap();

        // Collateral drops; the node is overweight until rebalanced
        h.delegators
            .set_stake(vault(1), operator(1), U256::from(200));
        let report = h
            .middleware
            .force_update_nodes(operator(1), U256::from(10_000))
            .unwrap();
        assert_eq!(report.target_stake, U256::from(200));
        assert_eq!(report.updated, vec![node_id(1)]);

        h.middleware
            .complete_stake_update(h.manager.last_message_index().unwrap())
            .unwrap();
        assert_eq!(h.middleware.node(node_id(1)).unwrap().stake, U256::from(200));
    }

    #[test]
    fn test_full_lifecycle_to_removal() {
        let h = harness();
        h.delegators
            .set_stake(vault(1), operator(1), U256::from(400));
        h.middleware.register_operator(operator(1)).unwrap();
        h.middleware
            .add_node(operator(1), node_id(1), [1; 48], 5_000, None)
            .unwrap();
        h.middleware
            .complete_validator_registration(h.manager.last_message_index().unwrap())
            .unwrap();

        h.middleware.remove_node(operator(1), node_id(1)).unwrap();
        h.middleware
            .complete_validator_removal(h.manager.last_message_index().unwrap())
            .unwrap();

        assert!(h.middleware.operator_nodes(operator(1)).unwrap().is_empty());
        assert_eq!(h.manager.total_weight(), 0);

        // With no nodes left the operator can retire after the window
        h.middleware.disable_operator(operator(1)).unwrap();
        h.clock.advance(150);
        h.middleware.remove_operator(operator(1)).unwrap();
        assert!(h.middleware.operator(operator(1)).is_none());
    }
}
