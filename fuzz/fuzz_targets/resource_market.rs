//! Fuzz the resource markets with random parameters, supplies and blocks.
//!
//! Goals:
//! - Find panics, overflows, underflows, or division-by-zero.
//! - Verify every successful quote satisfies `limit = min(supply - 1, block_limit)`.
//! - Verify failed updates leave the supply untouched.
//! - Verify two engines fed the same blocks stay identical.

#![no_main]

use {
    arbitrary::{Arbitrary, Unstructured},
    libfuzzer_sys::fuzz_target,
    resource_market::{
        MarketError, Markets, MarketsConfig, ProtocolParams, ResourceKind, ResourceMarket,
        ResourceParams,
    },
};

/// Fuzz input: random market parameters and a block sequence.
#[derive(Debug)]
struct FuzzInput {
    // Protocol
    token_supply: u64,
    decay_window_blocks: u64,
    decay_constant: u64,
    one_minus_decay_constant: u64,
    print_rate_premium: u64,
    print_rate_precision: u64,

    // Single market
    block_budget: u64,
    block_limit: u64,
    resource_supply: u64,

    // Block sequence, as per-mille of the quoted limit (may exceed 1000)
    blocks: Vec<(u16, u16, u16)>,
}

impl<'a> Arbitrary<'a> for FuzzInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = u.int_in_range(1..=50)?;
        let mut blocks = Vec::with_capacity(len);
        for _ in 0..len {
            blocks.push((u.arbitrary()?, u.arbitrary()?, u.arbitrary()?));
        }
        Ok(FuzzInput {
            token_supply: u.arbitrary()?,
            decay_window_blocks: u.arbitrary()?,
            decay_constant: u.arbitrary()?,
            one_minus_decay_constant: u.arbitrary()?,
            print_rate_premium: u.arbitrary()?,
            print_rate_precision: u.arbitrary()?,
            block_budget: u.arbitrary()?,
            block_limit: u.arbitrary()?,
            resource_supply: u.arbitrary()?,
            blocks,
        })
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let input: FuzzInput = match u.arbitrary() {
        Ok(i) => i,
        Err(_) => return,
    };

    let protocol = ProtocolParams {
        token_supply: input.token_supply,
        decay_window_blocks: input.decay_window_blocks,
        blocks_per_day: input.decay_window_blocks.max(1),
        decay_constant: input.decay_constant,
        one_minus_decay_constant: input.one_minus_decay_constant,
        print_rate_premium: input.print_rate_premium,
        print_rate_precision: input.print_rate_precision,
    };
    let params = ResourceParams::new(input.block_budget, input.block_limit);

    // ── Test 1: construction must not panic; failures are config errors ──

    let mut market = match ResourceMarket::with_supply(&params, &protocol, input.resource_supply) {
        Ok(m) => m,
        Err(err) => {
            assert!(
                matches!(err, MarketError::InvalidConfig { .. } | MarketError::Overflow),
                "unexpected construction error {err:?}"
            );
            return;
        }
    };

    // ── Test 2: quotes and updates on a single market ──

    for &(per_mille, _, _) in &input.blocks {
        let supply = market.resource_supply();
        let consumed = match market.calculate_limit() {
            Ok(quote) => {
                assert_eq!(quote.limit, supply.saturating_sub(1).min(market.block_limit()));
                assert!(quote.limit >= 1);
                assert!(quote.cost >= 1 && quote.cost <= market.k());
                (quote.limit / 1_000).saturating_mul(u64::from(per_mille))
            }
            Err(MarketError::DegenerateSupply { resource_supply }) => {
                assert!(resource_supply <= 1);
                u64::from(per_mille)
            }
            Err(other) => panic!("unexpected quote error {other:?}"),
        };

        match market.update(consumed) {
            Ok(()) => {}
            Err(MarketError::SupplyUnderflow { resource_supply, .. }) => {
                assert_eq!(resource_supply, supply);
                assert_eq!(market.resource_supply(), supply, "failed update moved supply");
                return;
            }
            Err(MarketError::Overflow) => {
                assert_eq!(market.resource_supply(), supply, "failed update moved supply");
                return;
            }
            Err(other) => panic!("unexpected update error {other:?}"),
        }
    }

    // ── Test 3: three-market determinism ──

    let config = MarketsConfig {
        protocol,
        disk_storage: params,
        network_bandwidth: params,
        compute_bandwidth: params,
    };
    let (mut a, mut b) = match (Markets::new(&config), Markets::new(&config)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return,
    };
    for &(d, n, c) in &input.blocks {
        let limits = a.resource_limits();
        assert_eq!(limits, b.resource_limits());
        let Ok(limits) = limits else { return };

        let disk = (limits.quote(ResourceKind::DiskStorage).limit / 1_000).saturating_mul(u64::from(d));
        let network = (limits.quote(ResourceKind::NetworkBandwidth).limit / 1_000).saturating_mul(u64::from(n));
        let compute = (limits.quote(ResourceKind::ComputeBandwidth).limit / 1_000).saturating_mul(u64::from(c));

        let ra = a.consume_block_resources(disk, network, compute);
        let rb = b.consume_block_resources(disk, network, compute);
        assert_eq!(ra, rb);
        assert_eq!(a.snapshot(), b.snapshot());
        if ra.is_err() {
            return;
        }
    }
});
