// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with an all-pairs scan. Small and simple; good for tiny sets
//! and as a reference for the other backends.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::backend::PairIndex;
use crate::types::Point2D;

/// Flat vector backend with an all-pairs scan.
///
/// Reports exactly the pairs within the radius (plus self-pairs), in insertion order.
/// Enumeration is quadratic in the number of points.
pub struct FlatVec<P: Copy> {
    radius: f64,
    entries: Vec<(P, Point2D)>,
}

impl<P: Copy> FlatVec<P> {
    /// Create an empty backend for interaction radius `radius`.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not finite and strictly positive.
    pub fn new(radius: f64) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "interaction radius must be finite and positive, got {radius}"
        );
        Self {
            radius,
            entries: Vec::new(),
        }
    }

    /// Stored payloads and positions in insertion order.
    pub fn entries(&self) -> &[(P, Point2D)] {
        &self.entries
    }
}

impl<P: Copy> Debug for FlatVec<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("radius", &self.radius)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<P: Copy> PairIndex<P> for FlatVec<P> {
    fn radius(&self) -> f64 {
        self.radius
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, payload: P, position: Point2D) {
        self.entries.push((payload, position));
    }

    fn try_enumerate_pairs<B, F>(&self, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(P, P) -> ControlFlow<B>,
    {
        let r2 = self.radius * self.radius;
        for (i, &(a, pa)) in self.entries.iter().enumerate() {
            f(a, a)?;
            for &(b, pb) in &self.entries[i + 1..] {
                if pa.distance_sq(pb) <= r2 {
                    f(a, b)?;
                }
            }
        }
        ControlFlow::Continue(())
    }
}
