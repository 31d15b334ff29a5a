// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adjacency-pruned dual traversal that drives [`QuadTree::enumerate_pairs`].
//!
//! Instead of running one range query per point, the traversal walks pairs of
//! neighboring subtrees together. A 2×2 block of sibling quadrants is laid out as
//!
//! ```text
//!  n2 | n3
//! ----+----
//!  n0 | n1
//! ```
//!
//! and every pair of cells in it is adjacent in exactly one way: side by side
//! (`n0|n1`, `n2|n3`), stacked (`n0/n2`, `n1/n3`) or diagonally through the shared
//! corner (`n0/n3` rising, `n2\n1` falling). Two adjacent nodes only share the
//! children along their common edge or corner, so each orientation has its own
//! helper that pairs exactly those children and nothing else. Each leaf pair is
//! therefore reached along a single path, which is what keeps every candidate pair
//! unique.
//!
//! Pairs of subtrees whose occupied bounds, grown by the radius, do not overlap are
//! pruned before descending.
//!
//! Depth counts down to the leaves: nodes at depth `1` are leaves.
//!
//! [`QuadTree::enumerate_pairs`]: crate::QuadTree::enumerate_pairs

use core::ops::ControlFlow;

use crate::arena::{Arena, NodeId};

type Quad = [Option<NodeId>; 4];

pub(crate) struct Traversal<'a, P, F> {
    arena: &'a Arena<P>,
    radius: f64,
    visit: F,
}

impl<'a, P, F, B> Traversal<'a, P, F>
where
    P: Copy,
    F: FnMut(P, P) -> ControlFlow<B>,
{
    pub(crate) fn new(arena: &'a Arena<P>, radius: f64, visit: F) -> Self {
        Self {
            arena,
            radius,
            visit,
        }
    }

    #[inline]
    fn children(&self, id: NodeId) -> Quad {
        self.arena[id].children
    }

    /// Whether any point under `a` may be within the radius of any point under `b`.
    #[inline]
    fn admissible(&self, a: NodeId, b: NodeId) -> bool {
        match (self.arena[a].bounds, self.arena[b].bounds) {
            (Some(ba), Some(bb)) => ba.touches(&bb, self.radius),
            _ => false,
        }
    }

    /// Report a pair of nodes at a depth where they should have been leaves.
    #[cold]
    fn depth_exhausted(&self, helper: &str, a: NodeId, b: NodeId) {
        debug_assert!(
            false,
            "{helper} reached depth 0 for nodes {a:?} and {b:?}; tree height bookkeeping is broken"
        );
        log::error!("{helper} reached depth 0 for nodes {a:?} and {b:?}; pair skipped");
    }

    /// Every pair inside one leaf bucket, self-pairs included.
    fn solve_single(&mut self, leaf: NodeId) -> ControlFlow<B> {
        let arena = self.arena;
        let bucket = &arena[leaf].bucket;
        for (i, &a) in bucket.iter().enumerate() {
            for &b in &bucket[i..] {
                (self.visit)(a, b)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Full cross product of two leaf buckets.
    fn solve_cells(&mut self, a: NodeId, b: NodeId) -> ControlFlow<B> {
        let arena = self.arena;
        for &pa in &arena[a].bucket {
            for &pb in &arena[b].bucket {
                (self.visit)(pa, pb)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// All pairs within the 2×2 block `[n0, n1, n2, n3]` of sibling quadrants.
    pub(crate) fn solve(&mut self, quad: Quad, depth: u32) -> ControlFlow<B> {
        match depth {
            0 => {
                debug_assert!(false, "solve called below leaf depth");
                log::error!("solve called below leaf depth; block skipped");
                ControlFlow::Continue(())
            }
            1 => {
                // Leaves of one parent are all mutually adjacent.
                for (i, a) in quad.iter().enumerate() {
                    let Some(a) = *a else {
                        continue;
                    };
                    self.solve_single(a)?;
                    for b in quad[i + 1..].iter().flatten() {
                        self.solve_cells(a, *b)?;
                    }
                }
                ControlFlow::Continue(())
            }
            _ => {
                for id in quad.iter().flatten() {
                    self.solve(self.children(*id), depth - 1)?;
                }
                let [n0, n1, n2, n3] = quad;
                self.side_by_side(n0, n1, depth)?;
                self.side_by_side(n2, n3, depth)?;
                self.stacked(n0, n2, depth)?;
                self.stacked(n1, n3, depth)?;
                self.rising(n0, n3, depth)?;
                self.falling(n2, n1, depth)
            }
        }
    }

    /// Cross pairs between `left` and `right`, which share a vertical edge.
    fn side_by_side(
        &mut self,
        left: Option<NodeId>,
        right: Option<NodeId>,
        depth: u32,
    ) -> ControlFlow<B> {
        let (Some(l), Some(r)) = (left, right) else {
            return ControlFlow::Continue(());
        };
        if !self.admissible(l, r) {
            return ControlFlow::Continue(());
        }
        match depth {
            0 => {
                self.depth_exhausted("side_by_side", l, r);
                ControlFlow::Continue(())
            }
            1 => self.solve_cells(l, r),
            _ => {
                let lc = self.children(l);
                let rc = self.children(r);
                let d = depth - 1;
                // Only `left`'s east column meets `right`'s west column.
                self.side_by_side(lc[1], rc[0], d)?;
                self.side_by_side(lc[3], rc[2], d)?;
                self.rising(lc[1], rc[2], d)?;
                self.falling(lc[3], rc[0], d)
            }
        }
    }

    /// Cross pairs between `bottom` and `top`, which share a horizontal edge.
    fn stacked(
        &mut self,
        bottom: Option<NodeId>,
        top: Option<NodeId>,
        depth: u32,
    ) -> ControlFlow<B> {
        let (Some(b), Some(t)) = (bottom, top) else {
            return ControlFlow::Continue(());
        };
        if !self.admissible(b, t) {
            return ControlFlow::Continue(());
        }
        match depth {
            0 => {
                self.depth_exhausted("stacked", b, t);
                ControlFlow::Continue(())
            }
            1 => self.solve_cells(b, t),
            _ => {
                let bc = self.children(b);
                let tc = self.children(t);
                let d = depth - 1;
                // Only `bottom`'s north row meets `top`'s south row.
                self.stacked(bc[2], tc[0], d)?;
                self.stacked(bc[3], tc[1], d)?;
                self.rising(bc[2], tc[1], d)?;
                self.falling(tc[0], bc[3], d)
            }
        }
    }

    /// Cross pairs between `lower_left` and `upper_right`, which share one corner.
    fn rising(
        &mut self,
        lower_left: Option<NodeId>,
        upper_right: Option<NodeId>,
        depth: u32,
    ) -> ControlFlow<B> {
        let (Some(a), Some(b)) = (lower_left, upper_right) else {
            return ControlFlow::Continue(());
        };
        if !self.admissible(a, b) {
            return ControlFlow::Continue(());
        }
        match depth {
            0 => {
                self.depth_exhausted("rising", a, b);
                ControlFlow::Continue(())
            }
            1 => self.solve_cells(a, b),
            _ => self.rising(self.children(a)[3], self.children(b)[0], depth - 1),
        }
    }

    /// Cross pairs between `upper_left` and `lower_right`, which share one corner.
    fn falling(
        &mut self,
        upper_left: Option<NodeId>,
        lower_right: Option<NodeId>,
        depth: u32,
    ) -> ControlFlow<B> {
        let (Some(a), Some(b)) = (upper_left, lower_right) else {
            return ControlFlow::Continue(());
        };
        if !self.admissible(a, b) {
            return ControlFlow::Continue(());
        }
        match depth {
            0 => {
                self.depth_exhausted("falling", a, b);
                ControlFlow::Continue(())
            }
            1 => self.solve_cells(a, b),
            _ => self.falling(self.children(a)[1], self.children(b)[2], depth - 1),
        }
    }
}
