// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for neighbor-pair enumeration.

use core::ops::ControlFlow;

use crate::types::Point2D;

/// Pair-enumeration backend abstraction.
///
/// Every implementation reports each unordered pair of payloads within
/// [`radius`](Self::radius) of each other exactly once, plus each payload paired with
/// itself once. How many farther pairs slip through depends on the backend.
pub trait PairIndex<P: Copy> {
    /// Interaction radius the index was built for.
    fn radius(&self) -> f64;

    /// Number of inserted points.
    fn len(&self) -> usize;

    /// Whether no point has been inserted.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every point.
    fn clear(&mut self);

    /// Insert a payload at `position`.
    fn insert(&mut self, payload: P, position: Point2D);

    /// Visit candidate pairs until `f` breaks.
    fn try_enumerate_pairs<B, F>(&self, f: F) -> ControlFlow<B>
    where
        F: FnMut(P, P) -> ControlFlow<B>;

    /// Visit every candidate pair.
    fn enumerate_pairs<F>(&self, mut f: F)
    where
        F: FnMut(P, P),
    {
        let _ = self.try_enumerate_pairs(|a, b| {
            f(a, b);
            ControlFlow::<()>::Continue(())
        });
    }
}
