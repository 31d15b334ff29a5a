// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index-addressed node storage for the quadtree.
//!
//! Nodes never hold references to each other; every relationship is a [`NodeId`]
//! into the arena. Growing the backing vector therefore never invalidates a handle.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;
use crate::types::{Aabb2D, Point2D};

/// Smallest capacity the arena grows to on its first allocation.
const MIN_CAPACITY: usize = 16;

/// Handle of a node inside an [`Arena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root handle. The first node allocated from an arena is always the root.
    pub const ROOT: Self = Self(0);

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Callers check the index against the 32-bit handle space first."
    )]
    const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// Position of the node in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A quadtree node.
///
/// Child order is fixed: `0 = (x<0, y<0)`, `1 = (x≥0, y<0)`, `2 = (x<0, y≥0)`,
/// `3 = (x≥0, y≥0)`, relative to the node's own center.
#[derive(Clone, Debug)]
pub struct Node<P> {
    pub(crate) children: [Option<NodeId>; 4],
    pub(crate) bucket: Vec<P>,
    pub(crate) bounds: Option<Aabb2D>,
}

impl<P> Node<P> {
    const fn new() -> Self {
        Self {
            children: [None; 4],
            bucket: Vec::new(),
            bounds: None,
        }
    }

    /// Child handles in quadrant order.
    #[inline]
    pub fn children(&self) -> [Option<NodeId>; 4] {
        self.children
    }

    /// Payloads stored directly in this node. Only leaves hold payloads.
    #[inline]
    pub fn bucket(&self) -> &[P] {
        &self.bucket
    }

    /// Occupied extent of everything inserted below this node, or `None` while empty.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb2D> {
        self.bounds
    }

    /// Whether this node has no children and no payloads.
    pub fn is_empty(&self) -> bool {
        self.children.iter().all(Option::is_none) && self.bucket.is_empty()
    }

    /// Fold a position into the occupied extent.
    #[inline]
    pub(crate) fn add_bounds(&mut self, p: Point2D) {
        match &mut self.bounds {
            Some(b) => b.add_point(p),
            None => self.bounds = Some(Aabb2D::from_point(p)),
        }
    }

    /// Fold another extent into the occupied extent.
    #[inline]
    pub(crate) fn merge_bounds(&mut self, other: Option<Aabb2D>) {
        self.bounds = match (self.bounds, other) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Growable, index-addressed store of quadtree nodes.
///
/// [`QuadTree`](crate::QuadTree) only ever allocates from its arena and exposes it
/// read-only. The allocation API ([`allocate`](Self::allocate),
/// [`try_allocate`](Self::try_allocate), [`free_last`](Self::free_last)) is a standalone
/// facility for callers building their own node structures, such as temporary nodes
/// that are released again in stack order.
pub struct Arena<P> {
    nodes: Vec<Node<P>>,
}

impl<P> Default for Arena<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Debug for Arena<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let payloads: usize = self.nodes.iter().map(|n| n.bucket.len()).sum();
        f.debug_struct("Arena")
            .field("nodes", &self.nodes.len())
            .field("capacity", &self.nodes.capacity())
            .field("payloads", &payloads)
            .finish_non_exhaustive()
    }
}

impl<P> Arena<P> {
    /// Create an empty arena.
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes the arena can hold before it has to grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Look up a node.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(id.index())
    }

    /// Iterate over all nodes with their handles, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<P>)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    /// Make sure `additional` more nodes can be allocated without reallocating.
    ///
    /// Capacity at least doubles whenever it has to grow.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let needed = self
            .nodes
            .len()
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        if needed > u32::MAX as usize {
            return Err(Error::CapacityOverflow);
        }
        let cap = self.nodes.capacity();
        if needed <= cap {
            return Ok(());
        }
        let target = needed.max(cap.saturating_mul(2)).max(MIN_CAPACITY);
        self.nodes.try_reserve_exact(target - self.nodes.len())?;
        log::trace!("node arena grew from {cap} to {}", self.nodes.capacity());
        Ok(())
    }

    /// Allocate a fresh node: empty bucket, no children, no bounds.
    pub fn try_allocate(&mut self) -> Result<NodeId, Error> {
        self.try_reserve(1)?;
        Ok(self.push_reserved())
    }

    /// Allocate a fresh node.
    ///
    /// # Panics
    ///
    /// Panics if the arena cannot grow. See [`try_allocate`](Self::try_allocate).
    pub fn allocate(&mut self) -> NodeId {
        match self.try_allocate() {
            Ok(id) => id,
            Err(err) => panic!("quadtree arena cannot grow: {err}"),
        }
    }

    /// Push a node into capacity that was reserved earlier.
    pub(crate) fn push_reserved(&mut self) -> NodeId {
        debug_assert!(
            self.nodes.len() < self.nodes.capacity(),
            "push_reserved called without reserved capacity"
        );
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new());
        id
    }

    /// Release the `k` most recently allocated nodes.
    ///
    /// The released handles must not be referenced by any surviving node. The root is
    /// never released: a request reaching it is an invariant violation and is clamped.
    /// The quadtree itself never releases nodes.
    pub fn free_last(&mut self, k: usize) {
        let releasable = self.nodes.len().saturating_sub(1);
        debug_assert!(
            k <= releasable,
            "free_last({k}) would release the root or unallocated nodes"
        );
        if k > releasable {
            log::error!("free_last({k}) clamped to {releasable} releasable nodes");
        }
        let keep = self.nodes.len() - k.min(releasable);
        self.nodes.truncate(keep);
    }

    /// Drop every node, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<P> {
        &mut self.nodes[id.index()]
    }
}

impl<P> core::ops::Index<NodeId> for Arena<P> {
    type Output = Node<P>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id.index()]
    }
}
