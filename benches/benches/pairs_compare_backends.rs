// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_pairs::{FlatVec, HashGrid, PairIndex, Point2D, QuadTree, within_radius};

const H: f64 = 1.0;

struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Uniform points in a square of side `extent` centered on the origin.
fn gen_uniform(count: usize, extent: f64) -> Vec<Point2D> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            Point2D::new(
                (rng.next_f64() - 0.5) * extent,
                (rng.next_f64() - 0.5) * extent,
            )
        })
        .collect()
}

/// Uniform points plus one far outlier, which forces the quadtree to grow deep.
fn gen_uniform_with_outlier(count: usize, extent: f64) -> Vec<Point2D> {
    let mut out = gen_uniform(count - 1, extent);
    out.insert(0, Point2D::new(10_000_000.0, 0.0));
    out
}

fn gen_clustered(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Point2D> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    for _ in 0..n_clusters {
        let cx = (rng.next_f64() - 0.5) * 1000.0;
        let cy = (rng.next_f64() - 0.5) * 1000.0;
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Point2D::new(cx + dx, cy + dy));
        }
    }
    out
}

fn fill<I: PairIndex<u32>>(index: &mut I, points: &[Point2D]) {
    for (i, p) in points.iter().enumerate() {
        index.insert(i as u32, *p);
    }
}

/// Enumerate once and count true neighbor pairs, like a density pass would.
fn count_neighbors<I: PairIndex<u32>>(index: &I, points: &[Point2D]) -> usize {
    let mut hits = 0;
    index.enumerate_pairs(|a, b| {
        if a != b && within_radius(points[a as usize], points[b as usize], H) {
            hits += 1;
        }
    });
    hits
}

fn bench_workload<I: PairIndex<u32>>(
    c: &mut Criterion,
    group_name: &str,
    make: impl Fn() -> I + Copy,
    workloads: &[(&str, Vec<Point2D>)],
) {
    let mut group = c.benchmark_group(group_name);
    for (name, points) in workloads {
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("insert_{name}"), |b| {
            b.iter_batched(
                make,
                |mut index| {
                    fill(&mut index, points);
                    black_box(index.len());
                },
                BatchSize::SmallInput,
            )
        });
        let mut built = make();
        fill(&mut built, points);
        group.bench_function(format!("enumerate_{name}"), |b| {
            b.iter(|| black_box(count_neighbors(&built, points)))
        });
    }
    group.finish();
}

fn workloads() -> Vec<(&'static str, Vec<Point2D>)> {
    vec![
        ("uniform_10k", gen_uniform(10_000, 100.0)),
        ("uniform_outlier_10k", gen_uniform_with_outlier(10_000, 100.0)),
        ("clustered_10k", gen_clustered(20, 500, 20.0)),
    ]
}

fn bench_quadtree(c: &mut Criterion) {
    bench_workload(c, "quadtree", || QuadTree::<u32>::new(H), &workloads());
}

fn bench_grid(c: &mut Criterion) {
    bench_workload(c, "hash_grid", || HashGrid::<u32>::new(H), &workloads());
}

fn bench_flatvec(c: &mut Criterion) {
    let small = vec![
        ("uniform_1k", gen_uniform(1_000, 30.0)),
        ("clustered_1k", gen_clustered(4, 250, 10.0)),
    ];
    bench_workload(c, "flatvec", || FlatVec::<u32>::new(H), &small);
    bench_workload(c, "quadtree_small", || QuadTree::<u32>::new(H), &small);
}

criterion_group!(benches, bench_quadtree, bench_grid, bench_flatvec);
criterion_main!(benches);
