//! Benchmarks for the sampling and iterative estimators.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linkrank::{iterate_rank, sample_rank_with_config, LinkGraph, SampleConfig};
use rand::prelude::*;
use rand::SeedableRng;
use std::hint::black_box;

/// Directed ring: every node links to its successor.
fn ring(n: usize) -> LinkGraph<usize> {
    LinkGraph::from_links((0..n).map(|i| (i, vec![(i + 1) % n]))).unwrap()
}

/// Preferential attachment (Barabási–Albert style), directed from new node to old.
///
/// Gives a heavy-tailed in-degree distribution closer to a real link graph than a
/// ring. Node 0 starts dangling.
fn preferential(n: usize, m: usize, seed: u64) -> LinkGraph<usize> {
    assert!(n > m && m >= 1);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut links: Vec<(usize, Vec<usize>)> = vec![(0, Vec::new())];
    let mut targets: Vec<usize> = vec![0]; // node ids repeated by in-degree + 1
    for v in 1..n {
        let mut chosen: Vec<usize> = Vec::with_capacity(m);
        let want = m.min(v);
        while chosen.len() < want {
            let u = targets[rng.random_range(0..targets.len())];
            if !chosen.contains(&u) {
                chosen.push(u);
            }
        }
        targets.extend(chosen.iter().copied());
        targets.push(v);
        links.push((v, chosen));
    }
    LinkGraph::from_links(links).unwrap()
}

fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimators");

    for n in [100usize, 1_000] {
        let graphs = [("ring", ring(n)), ("pa_m3", preferential(n, 3, 123))];

        for (name, g) in graphs {
            group.bench_with_input(BenchmarkId::new(format!("{name}/iterate"), n), &n, |b, _| {
                b.iter(|| black_box(iterate_rank(black_box(&g), 0.85).unwrap()))
            });

            let cfg = SampleConfig {
                samples: 10_000,
                ..SampleConfig::default()
            };
            group.bench_with_input(BenchmarkId::new(format!("{name}/sample"), n), &n, |b, _| {
                b.iter(|| black_box(sample_rank_with_config(black_box(&g), cfg).unwrap()))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_estimators);
criterion_main!(benches);
