use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use strata::order::{AccumulatorTreeCounter, CrossingCounter, InsertionSortCounter};

/// Deterministic bipartite edge list between layers of `upper` and `lower` vertices.
fn layer_pair(upper: usize, lower: usize, edges: usize) -> Vec<(usize, usize)> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move |bound: usize| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((state >> 33) as usize) % bound
    };
    (0..edges).map(|_| (next(upper), next(lower))).collect()
}

fn bench_cross_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_count");

    let cases = [
        ("sparse_50", 50usize, 50usize, 80usize),
        ("dense_100", 100usize, 100usize, 1_000usize),
        ("wide_500", 500usize, 500usize, 4_000usize),
    ];

    for (name, upper, lower, edges) in cases {
        let pairs = layer_pair(upper, lower, edges);
        group.bench_with_input(
            BenchmarkId::new("insertion_sort", name),
            &pairs,
            |b, pairs| b.iter(|| InsertionSortCounter.count(black_box(pairs))),
        );
        group.bench_with_input(
            BenchmarkId::new("accumulator_tree", name),
            &pairs,
            |b, pairs| b.iter(|| AccumulatorTreeCounter.count(black_box(pairs))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_cross_count);
criterion_main!(benches);
