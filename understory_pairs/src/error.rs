// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for fallible tree operations.

use alloc::collections::TryReserveError;

/// Errors reported by [`QuadTree::try_insert`](crate::QuadTree::try_insert) and the
/// fallible [`Arena`](crate::Arena) methods.
///
/// None of these are recoverable in the sense of retrying the same call: they signal
/// that the structure cannot grow any further or that the input was unusable.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The node arena could not reserve more memory.
    #[error("node arena allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    /// The node count would exceed the 32-bit handle space.
    #[error("node arena exceeded the maximum number of node handles")]
    CapacityOverflow,
    /// A position with a NaN or infinite coordinate was rejected.
    #[error("position ({x}, {y}) is not finite")]
    NonFinitePosition {
        /// Rejected x coordinate.
        x: f64,
        /// Rejected y coordinate.
        y: f64,
    },
    /// A position too far from the origin, measured in interaction radii, for the index
    /// to place exactly.
    #[error("position ({x}, {y}) is out of range")]
    PositionOutOfRange {
        /// Rejected x coordinate.
        x: f64,
        /// Rejected y coordinate.
        y: f64,
    },
}
