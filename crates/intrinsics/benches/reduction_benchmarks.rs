//! Criterion comparison of every reduction strategy on session-sized regions.
//!
//! The built-in session measures one call per variant; this bench gives the
//! statistically sound numbers for the same operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use intrinsics::{
    available_strategies, copy_region, generate_byte_region, generate_integer_region,
    session_rng, REGION_SIZE,
};

const SEED: u64 = 0x1D7_0003;

fn bench_integer_reductions(c: &mut Criterion) {
    let (mut rng, _) = session_rng(Some(SEED));
    let region = generate_integer_region(&mut rng, REGION_SIZE).unwrap();
    let probe = region.last_value().unwrap();
    let strategies = available_strategies();

    let mut group = c.benchmark_group("integer_reductions");
    group.throughput(Throughput::Elements(REGION_SIZE as u64));

    for strategy in &strategies {
        group.bench_with_input(
            BenchmarkId::new("minimum", strategy.label()),
            &region,
            |b, region| b.iter(|| black_box(strategy.minimum(black_box(region)))),
        );
        group.bench_with_input(
            BenchmarkId::new("maximum", strategy.label()),
            &region,
            |b, region| b.iter(|| black_box(strategy.maximum(black_box(region)))),
        );
        group.bench_with_input(
            BenchmarkId::new("sum", strategy.label()),
            &region,
            |b, region| b.iter(|| black_box(strategy.sum(black_box(region)))),
        );
        group.bench_with_input(
            BenchmarkId::new("count", strategy.label()),
            &region,
            |b, region| b.iter(|| black_box(strategy.count(black_box(region), probe))),
        );
    }

    group.finish();
}

fn bench_byte_compare(c: &mut Criterion) {
    let (mut rng, _) = session_rng(Some(SEED));
    let original = generate_byte_region(&mut rng, REGION_SIZE).unwrap();
    let copy = copy_region(&original).unwrap();
    let strategies = available_strategies();

    let mut group = c.benchmark_group("byte_compare");
    group.throughput(Throughput::Bytes(REGION_SIZE as u64));

    for strategy in &strategies {
        group.bench_function(BenchmarkId::new("compare", strategy.label()), |b| {
            b.iter(|| black_box(strategy.compare(black_box(&original), black_box(&copy))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_integer_reductions, bench_byte_compare);
criterion_main!(benches);
