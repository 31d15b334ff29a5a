// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alternative pair-enumeration backends.
//!
//! - `flatvec`: all-pairs scan over a flat vector. Exact, quadratic; for tiny sets and
//!   as a reference.
//! - `grid`: sparse hash grid with cell side equal to the radius (feature `backend_grid`).
//!
//! The quadtree itself lives in [`crate::quadtree`].

pub mod flatvec;
#[cfg(feature = "backend_grid")]
pub mod grid;

pub use flatvec::FlatVec;
#[cfg(feature = "backend_grid")]
pub use grid::HashGrid;
