// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pairs --heading-base-level=0

//! Understory Pairs: broad-phase neighbor-pair enumeration for 2D points.
//!
//! Particle methods (SPH, molecular dynamics, flocking) need every pair of points within a
//! fixed interaction radius `h` of each other. This crate finds candidate pairs so that the
//! exact distance test only runs on a small fraction of all `n²` pairs.
//!
//! - [`QuadTree`]: a dynamic, unbounded quadtree whose leaves all have side `h`. It grows
//!   outward as points arrive, so there is no domain to declare up front, and enumerates
//!   pairs with a dual traversal that only descends into subtrees whose occupied bounds are
//!   within `h` of each other.
//! - [`HashGrid`]: a sparse uniform grid with cell side `h` (feature `backend_grid`, on by
//!   default).
//! - [`FlatVec`]: an exact all-pairs scan for tiny sets and testing.
//!
//! All three implement [`PairIndex`] and share one contract: every unordered pair of points
//! within `h` is reported exactly once, every point is reported once paired with itself,
//! and some farther pairs may be reported too. Callers run the exact test themselves, for
//! example with [`within_radius`].
//!
//! Points are handed in as small `Copy` payloads (usually indices into caller-owned particle
//! storage) plus a position; the index never owns the particles.
//!
//! # Example
//!
//! ```rust
//! use understory_pairs::{Point2D, QuadTree, within_radius};
//!
//! let h = 1.0;
//! let points = [
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(0.6, 0.6),
//!     Point2D::new(-3.0, 2.0),
//!     Point2D::new(-3.5, 2.2),
//! ];
//!
//! let mut tree = QuadTree::new(h);
//! for (i, p) in points.iter().enumerate() {
//!     tree.insert(i, *p);
//! }
//!
//! let mut neighbors = Vec::new();
//! tree.enumerate_pairs(|a, b| {
//!     if a != b && within_radius(points[a], points[b], h) {
//!         neighbors.push((a.min(b), a.max(b)));
//!     }
//! });
//! neighbors.sort();
//! assert_eq!(neighbors, [(0, 1), (2, 3)]);
//! ```
//!
//! Enumeration can stop early by returning [`ControlFlow::Break`](core::ops::ControlFlow):
//!
//! ```rust
//! use core::ops::ControlFlow;
//! use understory_pairs::{Point2D, QuadTree};
//!
//! let mut tree = QuadTree::new(1.0);
//! tree.insert(7_u32, Point2D::new(0.0, 0.0));
//! tree.insert(8_u32, Point2D::new(0.1, 0.0));
//!
//! let first_strict = tree.try_enumerate_pairs(|a, b| {
//!     if a != b { ControlFlow::Break((a, b)) } else { ControlFlow::Continue(()) }
//! });
//! assert!(first_strict.is_break());
//! ```
//!
//! ## Choosing a backend
//!
//! - `QuadTree`: no domain bounds, adapts to clustered data, and prunes empty space.
//!   Costs a little more per insertion than the grid.
//! - `HashGrid`: fastest to build; a hash lookup per neighbor cell during enumeration.
//! - `FlatVec`: exact and quadratic. Useful below a few dozen points.
//!
//! ## Features
//!
//! - `backend_grid` (default): the [`HashGrid`] backend, built on `hashbrown` and `smallvec`.
//! - `kurbo`: `From` conversions between [`Point2D`]/[`Aabb2D`] and Kurbo's `Point`/`Rect`.
//!
//! ### Float semantics
//!
//! Positions must be finite. [`QuadTree::try_insert`] rejects NaN and infinite coordinates;
//! [`QuadTree::insert`] panics on them.
//!
//! Cells are assigned with an exact floor of `p / h`, so a point lying exactly on a cell
//! boundary is never pushed a cell too far by rounding, even when `h` has no exact binary
//! representation. The quadtree covers positions up to `2^52 · h` from the origin.

#![no_std]

extern crate alloc;

pub mod arena;
pub mod backend;
pub mod backends;
pub mod error;
pub mod quadtree;
pub mod stats;
pub mod types;

mod cell;
mod traverse;

#[cfg(test)]
mod test_util;

pub use arena::{Arena, Node, NodeId};
pub use backend::PairIndex;
pub use backends::flatvec::FlatVec;
#[cfg(feature = "backend_grid")]
pub use backends::grid::HashGrid;
pub use error::Error;
pub use quadtree::QuadTree;
pub use stats::{PairStats, within_radius};
pub use types::{Aabb2D, Point2D};
