//! Property-based tests for resource market pricing.
//!
//! Properties tested:
//! 1. The quoted limit is exactly `min(supply - 1, block_limit)`
//! 2. Cost never falls as supply falls
//! 3. Consumption within the quote never underflows or degenerates the supply
//! 4. Two engines fed the same blocks stay bit-identical
//! 5. Snapshots resume bit-identically

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        resource_market::{Markets, MarketsConfig, ResourceKind, ResourceMarket},
    };

    fn kind_strategy() -> impl Strategy<Value = ResourceKind> {
        prop_oneof![
            Just(ResourceKind::DiskStorage),
            Just(ResourceKind::NetworkBandwidth),
            Just(ResourceKind::ComputeBandwidth),
        ]
    }

    fn market_with_supply(kind: ResourceKind, supply: u64) -> ResourceMarket {
        let cfg = MarketsConfig::default();
        ResourceMarket::with_supply(cfg.resource(kind), &cfg.protocol, supply).unwrap()
    }

    fn steady_state(kind: ResourceKind) -> u64 {
        let cfg = MarketsConfig::default();
        ResourceMarket::new(cfg.resource(kind), &cfg.protocol)
            .unwrap()
            .resource_supply()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Limit boundedness
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn limit_is_min_of_supply_and_cap(kind in kind_strategy(), supply in 2u64..=u64::MAX / 2) {
            let market = market_with_supply(kind, supply);
            match market.calculate_limit() {
                Ok(quote) => {
                    prop_assert!(quote.limit >= 1);
                    prop_assert!(quote.limit <= market.block_limit());
                    prop_assert_eq!(quote.limit, (supply - 1).min(market.block_limit()));
                    prop_assert!(quote.cost >= 1);
                    prop_assert!(quote.cost <= market.k());
                }
                Err(err) => prop_assert!(false, "supply {} failed to quote: {:?}", supply, err),
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Cost rises as supply falls
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn cost_monotonic_in_supply(
            kind in kind_strategy(),
            numerator in 1u64..=64,
            gap in 0u64..=1_000_000_000,
        ) {
            // Both supplies sit at or above 1/64 of steady state, where every quote
            // uses the full block limit and fits in u64.
            let low = steady_state(kind) / 16 * numerator / 4;
            let high = low + gap;
            let cost_low = market_with_supply(kind, low).calculate_limit().unwrap();
            let cost_high = market_with_supply(kind, high).calculate_limit().unwrap();
            prop_assert_eq!(cost_low.limit, cost_high.limit);
            prop_assert!(
                cost_low.cost >= cost_high.cost,
                "supply {} costs {} but supply {} costs {}",
                low, cost_low.cost, high, cost_high.cost
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Supply positivity under quote-bounded consumption
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn bounded_consumption_keeps_supply_positive(
            kind in kind_strategy(),
            supply in 2u64..=1_000_000_000_000_000,
            fraction in 0u64..=1_000,
        ) {
            let mut market = market_with_supply(kind, supply);
            let limit = (supply - 1).min(market.block_limit());
            let consumed = limit / 1_000 * fraction + limit % 1_000 * fraction / 1_000;
            prop_assert!(consumed <= limit);
            market.update(consumed).unwrap();
            prop_assert!(market.resource_supply() > 1);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4–5. Determinism and snapshot continuity
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn engines_agree_block_by_block(
            blocks in prop::collection::vec((0u64..=1_000, 0u64..=1_000, 0u64..=1_000), 1..200),
            split in 0usize..200,
        ) {
            let cfg = MarketsConfig::default();
            let mut a = Markets::new(&cfg).unwrap();
            let mut b = Markets::new(&cfg).unwrap();
            let split = split.min(blocks.len());

            for (i, &(d, n, c)) in blocks.iter().enumerate() {
                if i == split {
                    // b continues from a persisted copy of itself.
                    b = Markets::restore(&cfg, &b.snapshot()).unwrap();
                }
                let limits = a.resource_limits().unwrap();
                prop_assert_eq!(limits, b.resource_limits().unwrap());

                // Scale the per-mille draws onto the quoted limits.
                let disk = limits.disk_storage.limit / 1_000 * d;
                let network = limits.network_bandwidth.limit / 1_000 * n;
                let compute = limits.compute_bandwidth.limit / 1_000 * c;
                a.consume_block_resources(disk, network, compute).unwrap();
                b.consume_block_resources(disk, network, compute).unwrap();
                prop_assert_eq!(a.snapshot(), b.snapshot());
            }
            prop_assert_eq!(a.height(), blocks.len() as u64);
        }
    }
}
