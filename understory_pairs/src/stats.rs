// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow-phase helpers and candidate accounting.

use crate::types::Point2D;

/// Whether `a` and `b` are within `radius` of each other (inclusive).
#[inline]
pub fn within_radius(a: Point2D, b: Point2D, radius: f64) -> bool {
    a.distance_sq(b) <= radius * radius
}

/// Counts of what a pair enumeration reported.
///
/// Thread one through the enumeration callback to measure how selective a backend is:
///
/// ```rust
/// use understory_pairs::{PairStats, Point2D, QuadTree};
///
/// let points = [Point2D::new(0.0, 0.0), Point2D::new(0.5, 0.0), Point2D::new(1.9, 0.0)];
/// let mut tree = QuadTree::new(1.0);
/// for (i, p) in points.iter().enumerate() {
///     tree.insert(i, *p);
/// }
///
/// let mut stats = PairStats::default();
/// tree.enumerate_pairs(|a, b| {
///     stats.record(points[a], points[b], a == b, 1.0);
/// });
/// assert_eq!(stats.self_pairs, 3);
/// assert_eq!(stats.neighbors, 1);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PairStats {
    /// Distinct-payload pairs reported.
    pub candidates: usize,
    /// Distinct-payload pairs that were actually within the radius.
    pub neighbors: usize,
    /// Payloads reported paired with themselves.
    pub self_pairs: usize,
}

impl PairStats {
    /// Account for one reported pair. Returns whether it is a true neighbor pair.
    pub fn record(&mut self, a: Point2D, b: Point2D, is_self: bool, radius: f64) -> bool {
        if is_self {
            self.self_pairs += 1;
            return false;
        }
        self.candidates += 1;
        let hit = within_radius(a, b, radius);
        if hit {
            self.neighbors += 1;
        }
        hit
    }

    /// Fraction of distinct-payload candidates that were neighbors.
    ///
    /// `1.0` when there were no such candidates.
    pub fn hit_ratio(&self) -> f64 {
        if self.candidates == 0 {
            1.0
        } else {
            self.neighbors as f64 / self.candidates as f64
        }
    }

    /// Add another set of counts to this one.
    pub fn merge(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.neighbors += other.neighbors;
        self.self_pairs += other.self_pairs;
    }
}
