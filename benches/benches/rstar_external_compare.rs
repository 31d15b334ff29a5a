// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_pairs::{Point2D, QuadTree, within_radius};

use rstar::RTree;
use rstar::primitives::GeomWithData;

const H: f64 = 1.0;

struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        ((x >> 11) as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_uniform(count: usize, extent: f64) -> Vec<Point2D> {
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    (0..count)
        .map(|_| {
            Point2D::new(
                (rng.next_f64() - 0.5) * extent,
                (rng.next_f64() - 0.5) * extent,
            )
        })
        .collect()
}

fn to_rstar_points(v: &[Point2D]) -> Vec<GeomWithData<[f64; 2], u32>> {
    v.iter()
        .enumerate()
        .map(|(i, p)| GeomWithData::new([p.x, p.y], i as u32))
        .collect()
}

fn bench_neighbor_pairs_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_pairs_external_compare");
    for &n in &[4_096usize, 16_384] {
        let extent = (n as f64).sqrt();
        let points = gen_uniform(n, extent);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("understory_build_enumerate_n{n}"), |b| {
            b.iter_batched(
                || QuadTree::<u32>::new(H),
                |mut tree| {
                    for (i, p) in points.iter().enumerate() {
                        tree.insert(i as u32, *p);
                    }
                    let mut hits = 0_usize;
                    tree.enumerate_pairs(|a, b| {
                        if a != b
                            && within_radius(points[a as usize], points[b as usize], H)
                        {
                            hits += 1;
                        }
                    });
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        // One radius query per point; each pair shows up twice, so only count `a < b`.
        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_points(&points),
                |entries| {
                    let tree = RTree::bulk_load(entries);
                    let mut hits = 0_usize;
                    for (i, p) in points.iter().enumerate() {
                        for other in tree.locate_within_distance([p.x, p.y], H * H) {
                            if (i as u32) < other.data {
                                hits += 1;
                            }
                        }
                    }
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_neighbor_pairs_external_compare);
criterion_main!(benches);
