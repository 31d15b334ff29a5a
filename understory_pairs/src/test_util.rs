// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for unit tests.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::types::Point2D;

/// Small xorshift generator so tests stay deterministic without extra dependencies.
pub(crate) struct Rng(u64);

impl Rng {
    pub(crate) fn new(seed: u64) -> Self {
        // Xorshift never leaves the all-zero state.
        Self((seed ^ 0x9E37_79B9_7F4A_7C15).max(1))
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub(crate) fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1_u64 << 53) as f64)
    }

    /// Uniform in `[lo, hi)`.
    pub(crate) fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Test slices are far shorter than u32::MAX."
    )]
    pub(crate) fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next_u64() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

/// `n` points uniform in `[-extent, extent)²`.
pub(crate) fn random_points(seed: u64, n: usize, extent: f64) -> Vec<Point2D> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| Point2D::new(rng.range(-extent, extent), rng.range(-extent, extent)))
        .collect()
}

/// Grid points `(origin + i * spacing, origin + j * spacing)` for `i` in `-cols..cols`
/// and `j` in `-rows..rows`.
pub(crate) fn lattice(origin: f64, spacing: f64, cols: i32, rows: i32) -> Vec<Point2D> {
    let mut out = Vec::new();
    for j in -rows..rows {
        for i in -cols..cols {
            out.push(Point2D::new(
                origin + f64::from(i) * spacing,
                origin + f64::from(j) * spacing,
            ));
        }
    }
    out
}

/// Every strict pair `a < b` within `radius`, by exhaustive search.
pub(crate) fn brute_force_neighbors(points: &[Point2D], radius: f64) -> BTreeSet<(usize, usize)> {
    let r2 = radius * radius;
    let mut out = BTreeSet::new();
    for (a, pa) in points.iter().enumerate() {
        for (b, pb) in points.iter().enumerate().skip(a + 1) {
            if pa.distance_sq(*pb) <= r2 {
                out.insert((a, b));
            }
        }
    }
    out
}

/// Order a pair as `(min, max)`.
pub(crate) fn normalized<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}
