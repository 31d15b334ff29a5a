// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic point-region quadtree with unbounded extent.
//!
//! The root cell is centered on the origin and spans `[-root_size / 2, root_size / 2]`
//! on both axes. Leaves always sit exactly `level` steps below the root and always
//! have side length `radius`, so two points within `radius` of each other land in the
//! same leaf or in two leaves that share an edge or a corner.
//!
//! When a point falls outside the root cell the tree grows outward with
//! [`expand_once`](QuadTree::expand_once): each existing root quadrant becomes the inner
//! corner of a new quadrant twice its size. Stored payloads never move.
//!
//! A point's leaf is picked from its exact column and row indices (`floor(x / radius)`
//! and `floor(y / radius)`), whose bits spell out the quadrant at every level. Points on
//! a leaf boundary therefore always land on the same side of it, however the radius
//! rounds.

use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::arena::{Arena, Node, NodeId};
use crate::backend::PairIndex;
use crate::cell;
use crate::error::Error;
use crate::traverse::Traversal;
use crate::types::{Aabb2D, Point2D};

/// Node capacity reserved by [`QuadTree::new`].
const DEFAULT_NODE_CAPACITY: usize = 256;

/// Deepest supported tree.
///
/// Leaf columns and rows then span `[-2^53, 2^53)` radii around the origin, the range
/// in which [`cell::floor_div`] is exact.
const MAX_LEVEL: u32 = 54;

/// Broad-phase neighbor-pair index backed by a dynamic quadtree.
///
/// Payloads are small `Copy` handles (indices, keys) into caller-owned point records.
/// The tree stores them in its leaves and hands them back in pairs from
/// [`enumerate_pairs`](Self::enumerate_pairs).
///
/// # Example
///
/// ```rust
/// use understory_pairs::{Point2D, QuadTree};
///
/// let points = [Point2D::new(0.0, 0.0), Point2D::new(0.5, 0.0), Point2D::new(5.0, 5.0)];
/// let mut tree = QuadTree::new(1.0);
/// for (i, p) in points.iter().enumerate() {
///     tree.insert(i, *p);
/// }
///
/// let mut neighbors = Vec::new();
/// tree.enumerate_pairs(|a, b| {
///     if a != b && points[a].distance_sq(points[b]) <= 1.0 {
///         neighbors.push((a.min(b), a.max(b)));
///     }
/// });
/// assert_eq!(neighbors, [(0, 1)]);
/// ```
pub struct QuadTree<P> {
    arena: Arena<P>,
    radius: f64,
    root_size: f64,
    level: u32,
    len: usize,
}

impl<P: Copy> QuadTree<P> {
    /// Create an empty tree for interaction radius `radius`.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not finite and strictly positive.
    pub fn new(radius: f64) -> Self {
        Self::with_capacity(radius, DEFAULT_NODE_CAPACITY)
    }

    /// Create an empty tree with room for `nodes` nodes before the arena grows.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not finite and strictly positive.
    pub fn with_capacity(radius: f64, nodes: usize) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "interaction radius must be finite and positive, got {radius}"
        );
        let mut tree = Self {
            arena: Arena::with_capacity(nodes.max(1)),
            radius,
            root_size: radius,
            level: 0,
            len: 0,
        };
        tree.reset();
        tree
    }

    fn reset(&mut self) {
        self.arena.clear();
        let root = self.arena.allocate();
        debug_assert_eq!(root, NodeId::ROOT, "root must be the first node");
        self.root_size = self.radius;
        self.level = 0;
        self.len = 0;
        // With no children this is pure growth: the root cell becomes `2 * radius`
        // wide and its quadrants are leaves of side `radius`.
        self.expand_once();
    }

    /// Interaction radius the tree was built for.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Side length of the root cell.
    #[inline]
    pub fn root_size(&self) -> f64 {
        self.root_size
    }

    /// Number of subdivision steps from the root down to the leaves.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of inserted points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no point has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, including the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Occupied extent of every inserted point, or `None` while empty.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb2D> {
        self.root().bounds()
    }

    /// Read-only view of the node storage.
    #[inline]
    pub fn arena(&self) -> &Arena<P> {
        &self.arena
    }

    #[inline]
    fn root(&self) -> &Node<P> {
        &self.arena[NodeId::ROOT]
    }

    /// Remove every point and return to the freshly constructed state.
    pub fn clear(&mut self) {
        self.reset();
    }

    /// Double the covered region once.
    ///
    /// Every present root quadrant `i` is re-parented into slot `3 - i` of a new node,
    /// which takes over quadrant `i` of the root. The old structure becomes the inner
    /// corner of the new one, so nothing stored below it moves.
    ///
    /// Requires capacity for four nodes to have been reserved.
    fn expand_once(&mut self) {
        let old = self.root().children;
        let mut new = [None; 4];
        for (i, child) in old.iter().enumerate() {
            let Some(child) = *child else {
                continue;
            };
            let id = self.arena.push_reserved();
            let bounds = self.arena[child].bounds;
            let node = self.arena.node_mut(id);
            node.children[3 - i] = Some(child);
            node.merge_bounds(bounds);
            new[i] = Some(id);
        }
        self.arena.node_mut(NodeId::ROOT).children = new;
        self.root_size *= 2.0;
        self.level += 1;
        log::debug!(
            "quadtree expanded to level {} (root size {})",
            self.level,
            self.root_size
        );
    }

    /// Number of [`expand_once`](Self::expand_once) calls needed to cover `p`.
    fn expansions_for(&self, p: Point2D) -> Result<usize, Error> {
        let target = 2.0 * p.max_abs();
        let mut size = self.root_size;
        let mut steps = 0;
        while size <= target && size.is_finite() {
            size *= 2.0;
            steps += 1;
        }
        if size.is_finite() && self.level as usize + steps <= MAX_LEVEL as usize {
            Ok(steps)
        } else {
            Err(Error::PositionOutOfRange { x: p.x, y: p.y })
        }
    }

    /// Expand until `p` lies strictly inside the root cell.
    ///
    /// Keeping points off the outer edge means every leaf is half-open, `[a, a + radius)`,
    /// no matter how often the tree grows afterwards.
    fn grow_to(&mut self, p: Point2D) {
        while self.root_size <= 2.0 * p.max_abs() {
            self.expand_once();
        }
    }

    /// Insert a payload at `position`.
    ///
    /// Never fails for finite positions within `2^52` radii of the origin, short of
    /// running out of memory.
    ///
    /// # Panics
    ///
    /// Panics where [`try_insert`](Self::try_insert) would return an error.
    pub fn insert(&mut self, payload: P, position: Point2D) {
        if let Err(err) = self.try_insert(payload, position) {
            panic!("quadtree insert failed: {err}");
        }
    }

    /// Insert a payload at `position`, reporting failure instead of panicking.
    ///
    /// All node allocations the insertion may need are reserved up front, so on error
    /// the tree is left exactly as it was.
    ///
    /// Positions at least `2^53` radii from the origin on either axis are rejected with
    /// [`Error::PositionOutOfRange`].
    pub fn try_insert(&mut self, payload: P, position: Point2D) -> Result<(), Error> {
        if !position.is_finite() {
            return Err(Error::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }

        // Each expansion allocates at most four nodes and deepens the descent by one.
        let expansions = self.expansions_for(position)?;
        let needed = expansions
            .checked_mul(5)
            .and_then(|n| n.checked_add(self.level as usize))
            .ok_or(Error::CapacityOverflow)?;
        self.arena.try_reserve(needed)?;

        self.grow_to(position);
        self.descend(payload, position);
        self.len += 1;
        Ok(())
    }

    fn descend(&mut self, payload: P, position: Point2D) {
        // Leaf column and row counted from the lower-left corner of the root cell.
        let half = 1_i64 << (self.level - 1);
        let col = cell::floor_div(position.x, self.radius) + half;
        let row = cell::floor_div(position.y, self.radius) + half;
        debug_assert!(
            (0..2 * half).contains(&col) && (0..2 * half).contains(&row),
            "leaf ({col}, {row}) of {position:?} outside a level {} root",
            self.level
        );

        let mut id = NodeId::ROOT;
        for shift in (0..self.level).rev() {
            self.arena.node_mut(id).add_bounds(position);

            let east = ((col >> shift) & 1) == 1;
            let north = ((row >> shift) & 1) == 1;
            let quadrant = usize::from(east) | (usize::from(north) << 1);

            let existing = self.arena[id].children[quadrant];
            id = match existing {
                Some(child) => child,
                None => {
                    let child = self.arena.push_reserved();
                    self.arena.node_mut(id).children[quadrant] = Some(child);
                    child
                }
            };
        }
        let leaf = self.arena.node_mut(id);
        leaf.bucket.push(payload);
        leaf.add_bounds(position);
    }

    /// Invoke `f(a, b)` for every candidate pair.
    ///
    /// Every unordered pair within [`radius`](Self::radius) of each other is reported
    /// exactly once; some farther pairs may be reported too. Every payload is also
    /// reported once paired with itself. Callers that need strict pairs and exact
    /// distances filter them out.
    pub fn enumerate_pairs<F: FnMut(P, P)>(&self, mut f: F) {
        let _ = self.try_enumerate_pairs(|a, b| {
            f(a, b);
            ControlFlow::<()>::Continue(())
        });
    }

    /// Like [`enumerate_pairs`](Self::enumerate_pairs), but stops as soon as `f` breaks.
    ///
    /// Returns the break value, or `Continue(())` if every candidate was visited.
    /// Enumeration keeps no state between calls, so stopping early never affects a
    /// later call.
    pub fn try_enumerate_pairs<B, F>(&self, f: F) -> ControlFlow<B>
    where
        F: FnMut(P, P) -> ControlFlow<B>,
    {
        if self.len == 0 {
            return ControlFlow::Continue(());
        }
        let mut traversal = Traversal::new(&self.arena, self.radius, f);
        traversal.solve(self.root().children, self.level)
    }
}

impl<P> Debug for QuadTree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("radius", &self.radius)
            .field("root_size", &self.root_size)
            .field("level", &self.level)
            .field("len", &self.len)
            .field("nodes", &self.arena.len())
            .finish_non_exhaustive()
    }
}

impl<P: Copy> PairIndex<P> for QuadTree<P> {
    fn radius(&self) -> f64 {
        self.radius
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn insert(&mut self, payload: P, position: Point2D) {
        Self::insert(self, payload, position);
    }

    fn try_enumerate_pairs<B, F>(&self, f: F) -> ControlFlow<B>
    where
        F: FnMut(P, P) -> ControlFlow<B>,
    {
        Self::try_enumerate_pairs(self, f)
    }
}
