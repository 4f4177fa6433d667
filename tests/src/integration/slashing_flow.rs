//! # Slashing Flow Integration Tests
//!
//! Exercises the epoch-cache → slash → vault fan-out path: stakes cached at
//! the epoch start, slash bounded by the cache, amounts split across vaults
//! proportionally, failing vaults skipped.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use shared_types::{AssetClassId, OperatorId, Timestamp, U256, VaultId};
    use sm_03_asset_classes::{AssetClassRegistry, PRIMARY_ASSET_CLASS};
    use sm_04_middleware::{
        EpochSchedule, MiddlewareConfig, MiddlewareError, MiddlewareService,
        MockValidatorSetManager, RegistryAssetClassSource, VaultCollateralSource, WeightScaler,
    };
    use sm_05_vault_manager::adapters::memory::{InMemoryDelegatorGateway, InMemoryVaultGateway};
    use sm_05_vault_manager::{VaultManager, VaultManagerConfig};

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

    type Middleware = MiddlewareService<
        MockValidatorSetManager,
        VaultCollateralSource<InMemoryVaultGateway, InMemoryDelegatorGateway, SharedClock>,
        RegistryAssetClassSource,
        SharedClock,
    >;

    struct Harness {
        middleware: Middleware,
        delegators: Arc<InMemoryDelegatorGateway>,
        clock: Arc<SharedClock>,
    }

    /// Two vaults holding 300/200 of operator 1's stake, epoch length 100s.
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
        vault_manager
            .register_vault(vault(2), CLASS, U256::from(10_000))
            .unwrap();
        delegators.set_stake(vault(1), operator(1), U256::from(300));
        delegators.set_stake(vault(2), operator(1), U256::from(200));

        let mut registry = AssetClassRegistry::new();
        registry
            .add_asset_class(CLASS, U256::from(100), U256::from(500), [0xA5; 20])
            .unwrap();

        let middleware = MiddlewareService::new(
            Arc::new(MockValidatorSetManager::new(100_000)),
            Arc::new(VaultCollateralSource::new(vault_manager)),
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
            delegators,
            clock,
        }
    }

    #[test]
    fn test_slash_fans_out_proportionally() {
        let h = harness();
        h.middleware.register_operator(operator(1)).unwrap();

        // Cache epoch 0 (500 total), then finalize it
        let total = h.middleware.calc_and_cache_stakes(0, CLASS).unwrap();
        assert_eq!(total, U256::from(500));
        h.clock.advance(100);

        let slashed = h
            .middleware
            .slash(0, operator(1), U256::from(100), CLASS)
            .unwrap();

        assert_eq!(slashed, U256::from(100));
        // 100 * 300/500 and 100 * 200/500
        assert_eq!(
            h.delegators.slashed(vault(1), operator(1)),
            U256::from(60)
        );
        assert_eq!(
            h.delegators.slashed(vault(2), operator(1)),
            U256::from(40)
        );
    }

    #[test]
    fn test_slash_skips_failing_vault() {
        let h = harness();
        h.middleware.register_operator(operator(1)).unwrap();
        h.middleware.calc_and_cache_stakes(0, CLASS).unwrap();
        h.clock.advance(100);
        h.delegators.set_failing(vault(1), true);

        let slashed = h
            .middleware
            .slash(0, operator(1), U256::from(100), CLASS)
            .unwrap();

        // Only the healthy vault's portion lands
        assert_eq!(slashed, U256::from(40));
        assert_eq!(h.delegators.slashed(vault(1), operator(1)), U256::zero());
        assert_eq!(h.delegators.slashed(vault(2), operator(1)), U256::from(40));
    }

    #[test]
    fn test_slash_uses_epoch_start_stakes() {
        let h = harness();
        h.middleware.register_operator(operator(1)).unwrap();
        h.middleware.calc_and_cache_stakes(0, CLASS).unwrap();
        h.clock.advance(100);

        // The operator's live stake grows after the epoch being slashed
        h.delegators.set_stake(vault(1), operator(1), U256::from(9_000));

        // The cap is still the cached 500
        assert_eq!(
            h.middleware.slash(0, operator(1), U256::from(501), CLASS),
            Err(MiddlewareError::TooBigSlashAmount {
                amount: U256::from(501),
                available: U256::from(500),
            })
        );
    }

    #[test]
    fn test_cached_totals_stable_across_epochs() {
        let h = harness();
        h.middleware.register_operator(operator(1)).unwrap();
        h.middleware.calc_and_cache_stakes(0, CLASS).unwrap();

        h.clock.advance(100);
        h.delegators.set_stake(vault(1), operator(1), U256::from(700));
        let epoch1 = h.middleware.calc_and_cache_stakes(1, CLASS).unwrap();

        assert_eq!(epoch1, U256::from(900));
        assert_eq!(
            h.middleware.total_stake_cached(0, CLASS),
            Some(U256::from(500))
        );
        assert_eq!(
            h.middleware.total_stake_cached(1, CLASS),
            Some(U256::from(900))
        );
    }
}
