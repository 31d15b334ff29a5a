// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse uniform hash grid backend.
//!
//! Points are bucketed into square cells whose side equals the interaction radius, so
//! every neighbor of a point sits in its own cell or one of the eight around it. Only
//! occupied cells are stored. Enumeration visits each cell once and pairs it with the
//! four neighbors of a half stencil, which covers every adjacent cell pair exactly once.

use core::fmt::Debug;
use core::ops::ControlFlow;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::backend::PairIndex;
use crate::cell;
use crate::error::Error;
use crate::types::{Aabb2D, Point2D};

/// Offsets of the neighbors each cell is paired with.
///
/// Together with their negations these are the eight neighbors of a cell.
const HALF_STENCIL: [(i32, i32); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

/// Quotients at or beyond this magnitude saturate to the outermost `i32` cells.
const SATURATION: f64 = 2_147_483_648.0;

/// Map a coordinate to a cell index, rounding towards -∞.
///
/// Coordinates on a cell boundary go to the cell they start, in exact arithmetic.
#[inline]
fn cell_coord(value: f64, cell_size: f64) -> i32 {
    let t = value / cell_size;
    if t >= SATURATION {
        return i32::MAX;
    }
    if t < -SATURATION {
        return i32::MIN;
    }
    let k = cell::floor_div(value, cell_size);
    i32::try_from(k).unwrap_or(if k < 0 { i32::MIN } else { i32::MAX })
}

struct Cell<P> {
    bounds: Aabb2D,
    payloads: SmallVec<[P; 8]>,
}

/// Sparse uniform grid with cell side equal to the interaction radius.
///
/// Cells far outside the `i32` index range saturate onto the outermost cells, which
/// only costs extra candidates.
pub struct HashGrid<P: Copy> {
    radius: f64,
    len: usize,
    cells: HashMap<(i32, i32), Cell<P>>,
}

impl<P: Copy> Debug for HashGrid<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashGrid")
            .field("radius", &self.radius)
            .field("len", &self.len)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl<P: Copy> HashGrid<P> {
    /// Create an empty grid for interaction radius `radius`.
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
            len: 0,
            cells: HashMap::new(),
        }
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn key_for(&self, p: Point2D) -> (i32, i32) {
        (cell_coord(p.x, self.radius), cell_coord(p.y, self.radius))
    }

    /// Insert a payload at `position`, rejecting non-finite coordinates.
    pub fn try_insert(&mut self, payload: P, position: Point2D) -> Result<(), Error> {
        if !position.is_finite() {
            return Err(Error::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        let key = self.key_for(position);
        self.cells
            .entry(key)
            .and_modify(|cell| {
                cell.bounds.add_point(position);
                cell.payloads.push(payload);
            })
            .or_insert_with(|| {
                log::trace!("grid cell {key:?} occupied");
                let mut payloads = SmallVec::new();
                payloads.push(payload);
                Cell {
                    bounds: Aabb2D::from_point(position),
                    payloads,
                }
            });
        self.len += 1;
        Ok(())
    }
}

impl<P: Copy> PairIndex<P> for HashGrid<P> {
    fn radius(&self) -> f64 {
        self.radius
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    /// # Panics
    ///
    /// Panics if `position` is not finite.
    fn insert(&mut self, payload: P, position: Point2D) {
        if let Err(err) = self.try_insert(payload, position) {
            panic!("grid insert failed: {err}");
        }
    }

    fn try_enumerate_pairs<B, F>(&self, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(P, P) -> ControlFlow<B>,
    {
        for (&(cx, cy), cell) in &self.cells {
            for (i, &a) in cell.payloads.iter().enumerate() {
                for &b in &cell.payloads[i..] {
                    f(a, b)?;
                }
            }
            for (dx, dy) in HALF_STENCIL {
                let (Some(nx), Some(ny)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                let Some(other) = self.cells.get(&(nx, ny)) else {
                    continue;
                };
                if !cell.bounds.touches(&other.bounds, self.radius) {
                    continue;
                }
                for &a in &cell.payloads {
                    for &b in &other.payloads {
                        f(a, b)?;
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }
}
