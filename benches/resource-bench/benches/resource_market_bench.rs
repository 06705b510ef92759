//! Resource market benchmarks.
//!
//! Measures:
//! - Quote throughput for a single market and for all three
//! - Per-block update throughput
//! - Multi-block simulation under sustained spending

use {
    criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput},
    resource_bench::helpers::{random_consumption, reference_markets},
    resource_market::{budget, MarketsConfig, ResourceKind, ResourceMarket},
    std::hint::black_box,
};

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

fn bench_quotes(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_market/quote");
    group.throughput(Throughput::Elements(1));

    let cfg = MarketsConfig::default();
    for kind in ResourceKind::ALL {
        let market = ResourceMarket::new(cfg.resource(kind), &cfg.protocol).unwrap();
        group.bench_function(kind.to_string(), |b| {
            b.iter(|| black_box(&market).calculate_limit())
        });
    }

    let markets = reference_markets();
    group.bench_function("all_markets", |b| {
        b.iter(|| black_box(&markets).resource_limits())
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Block updates
// ---------------------------------------------------------------------------

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_market/update");
    group.throughput(Throughput::Elements(1));

    let cfg = MarketsConfig::default();
    let market = ResourceMarket::new(&cfg.compute_bandwidth, &cfg.protocol).unwrap();
    group.bench_function("next_supply", |b| {
        b.iter(|| black_box(&market).next_supply(black_box(57_500_000)))
    });

    group.bench_function("consume_block_resources", |b| {
        let mut markets = reference_markets();
        b.iter(|| {
            // Budget-level consumption holds the markets near steady state.
            markets
                .consume_block_resources(39_600, 262_144, 57_500_000)
                .unwrap()
        })
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Multi-block simulation
// ---------------------------------------------------------------------------

fn bench_random_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_market/random_blocks");

    let genesis = reference_markets();
    let limits = genesis.resource_limits().unwrap();

    for &n_blocks in &[100usize, 1_000, 10_000] {
        let blocks = random_consumption(42, &limits, n_blocks);
        group.throughput(Throughput::Elements(n_blocks as u64));
        group.bench_with_input(BenchmarkId::new("blocks", n_blocks), &blocks, |b, blocks| {
            b.iter(|| {
                let mut markets = genesis.clone();
                for &(disk, network, compute) in blocks {
                    // Draws are sized against genesis limits; stop once the supply
                    // can no longer absorb them.
                    if markets.consume_block_resources(disk, network, compute).is_err() {
                        break;
                    }
                }
                markets
            });
        });
    }
    group.finish();
}

fn bench_sustained_spending(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_market/sustained_spending");
    group.sample_size(20);

    let cfg = MarketsConfig::default();
    let rc = budget::rc_per_block(&cfg.protocol, 2_500).unwrap();

    for &n_blocks in &[100u64, 1_000] {
        group.throughput(Throughput::Elements(n_blocks));
        group.bench_with_input(BenchmarkId::new("blocks", n_blocks), &n_blocks, |b, &n| {
            b.iter(|| {
                let mut markets = reference_markets();
                for _ in 0..n {
                    let limits = markets.resource_limits().unwrap();
                    let [disk, network, compute] = budget::split_evenly(&limits, rc);
                    markets.consume_block_resources(disk, network, compute).unwrap();
                }
                markets
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_quotes,
    bench_update,
    bench_random_blocks,
    bench_sustained_spending,
);
criterion_main!(benches);
