//! # Delegation Flow Integration Tests
//!
//! Exercises the vault → delegator path end to end: limits, share splits,
//! historical queries, and the share-conservation invariant under randomized
//! update sequences.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use shared_types::{Address, AssetClassId, L1Id, OperatorId, U256, VaultId};
    use sm_02_delegation::adapters::memory::{
        InMemoryOptInRegistry, ManualClock, StaticVault,
    };
    use sm_02_delegation::{Delegator, DelegatorConfig};

    const CLASS: AssetClassId = 1;

    fn l1() -> L1Id {
        [0x11; 20]
    }

    fn vault() -> VaultId {
        [0x22; 20]
    }

    fn curator() -> Address {
        [0xCC; 20]
    }

    fn operator(id: u8) -> OperatorId {
        [id; 20]
    }

    struct Harness {
        delegator: Delegator<StaticVault, InMemoryOptInRegistry, ManualClock>,
        vault_source: Arc<StaticVault>,
        clock: Arc<ManualClock>,
    }

    /// Vault with 1000 active stake at t=1000, operators 1..=count opted in.
    fn harness(operator_count: u8) -> Harness {
        crate::init_tracing();
        let vault_source = Arc::new(StaticVault::new());
        let vault_opt_in = Arc::new(InMemoryOptInRegistry::new());
        let l1_opt_in = Arc::new(InMemoryOptInRegistry::new());
        let clock = Arc::new(ManualClock::new(1_000));

        vault_source.set_active_stake(1_000, U256::from(1_000));
        for id in 1..=operator_count {
            vault_opt_in.set_opted_in(operator(id), vault(), 1_000, true);
            l1_opt_in.set_opted_in(operator(id), l1(), 1_000, true);
        }

        let delegator = Delegator::new(
            vault_source.clone(),
            vault_opt_in,
            l1_opt_in,
            clock.clone(),
            DelegatorConfig {
                vault: vault(),
                limit_setters: HashSet::from([curator()]),
                share_setters: HashSet::from([curator()]),
            },
        );
        Harness {
            delegator,
            vault_source,
            clock,
        }
    }

    #[test]
    fn test_delegation_scenario_with_history() {
        let h = harness(2);

        h.delegator
            .set_max_l1_limit(l1(), l1(), CLASS, U256::from(600))
            .unwrap();
        h.delegator
            .set_l1_limit(curator(), l1(), CLASS, U256::from(600))
            .unwrap();
        h.delegator
            .set_operator_l1_shares(curator(), l1(), CLASS, operator(1), U256::from(3))
            .unwrap();
        h.delegator
            .set_operator_l1_shares(curator(), l1(), CLASS, operator(2), U256::from(7))
            .unwrap();

        assert_eq!(h.delegator.stake(l1(), CLASS, operator(1)), U256::from(180));
        assert_eq!(h.delegator.stake(l1(), CLASS, operator(2)), U256::from(420));

        // Later, the limit drops to 100
        h.clock.set(2_000);
        h.delegator
            .set_l1_limit(curator(), l1(), CLASS, U256::from(100))
            .unwrap();

        assert_eq!(h.delegator.stake(l1(), CLASS, operator(1)), U256::from(30));
        assert_eq!(h.delegator.stake(l1(), CLASS, operator(2)), U256::from(70));

        // Point-in-time queries at the earlier instant are unchanged
        for (op, expected) in [(operator(1), 180u64), (operator(2), 420)] {
            let hints = h.delegator.hints_at(l1(), CLASS, op, 1_500);
            assert_eq!(
                h.delegator.stake_at(l1(), CLASS, op, 1_500, &hints),
                U256::from(expected)
            );
        }
    }

    #[test]
    fn test_max_limit_clamp_down_visible_in_history() {
        let h = harness(1);
        h.delegator
            .set_max_l1_limit(l1(), l1(), CLASS, U256::from(600))
            .unwrap();
        h.delegator
            .set_l1_limit(curator(), l1(), CLASS, U256::from(500))
            .unwrap();

        h.clock.set(3_000);
        h.delegator
            .set_max_l1_limit(l1(), l1(), CLASS, U256::from(200))
            .unwrap();

        assert_eq!(h.delegator.l1_limit(l1(), CLASS), U256::from(200));
        assert_eq!(
            h.delegator.l1_limit_at(l1(), CLASS, 2_000, None),
            U256::from(500)
        );
        // The ceiling now rejects anything above itself
        assert!(h
            .delegator
            .set_l1_limit(curator(), l1(), CLASS, U256::from(300))
            .is_err());
    }

    #[test]
    fn test_share_conservation_under_random_updates() {
        let h = harness(4);
        h.delegator
            .set_max_l1_limit(l1(), l1(), CLASS, U256::from(800))
            .unwrap();
        h.delegator
            .set_l1_limit(curator(), l1(), CLASS, U256::from(800))
            .unwrap();

        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let ops: Vec<OperatorId> = (1..=4).map(operator).collect();
        let mut rng = StdRng::seed_from_u64(0x5EED);

        let mut sample_points = Vec::new();
        for step in 0..50u64 {
            let ts = 1_001 + step * 10;
            h.clock.set(ts);
            let op = ops[rng.gen_range(0..ops.len())];
            let shares = U256::from(rng.gen_range(0..1_000u64));
            // Unchanged values are rejected; skip those
            let _ = h
                .delegator
                .set_operator_l1_shares(curator(), l1(), CLASS, op, shares);
            sample_points.push(ts);
        }

        // At every sampled instant the operators' stakes never sum past
        // the pool, floor rounding included.
        let pool = U256::from(800);
        for ts in sample_points {
            let mut stake_sum = U256::zero();
            for op in &ops {
                let hints = h.delegator.hints_at(l1(), CLASS, *op, ts);
                stake_sum += h.delegator.stake_at(l1(), CLASS, *op, ts, &hints);
            }
            assert!(stake_sum <= pool, "stake sum exceeds pool at ts {ts}");
        }

        // Current totals also conserve
        let current_sum: U256 = ops
            .iter()
            .map(|op| h.delegator.operator_l1_shares(l1(), CLASS, *op))
            .fold(U256::zero(), |acc, s| acc + s);
        assert_eq!(
            h.delegator.total_operator_l1_shares(l1(), CLASS),
            current_sum
        );
    }

    #[test]
    fn test_vault_balance_drop_reduces_stakes() {
        let h = harness(2);
        h.delegator
            .set_max_l1_limit(l1(), l1(), CLASS, U256::from(600))
            .unwrap();
        h.delegator
            .set_l1_limit(curator(), l1(), CLASS, U256::from(600))
            .unwrap();
        h.delegator
            .set_operator_l1_shares(curator(), l1(), CLASS, operator(1), U256::from(1))
            .unwrap();
        h.delegator
            .set_operator_l1_shares(curator(), l1(), CLASS, operator(2), U256::from(1))
            .unwrap();

        // Withdrawals shrink the vault below the limit
        h.vault_source.set_active_stake(2_000, U256::from(400));
        h.clock.set(2_000);

        assert_eq!(h.delegator.stake(l1(), CLASS, operator(1)), U256::from(200));
        assert_eq!(h.delegator.stake(l1(), CLASS, operator(2)), U256::from(200));
    }
}
