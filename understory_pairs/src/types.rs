// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::ops::{Add, Mul, Sub};

/// A point (or vector) in 2D.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2D {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2D {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline(always)]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Componentwise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Componentwise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(abs(self.x), abs(self.y))
    }

    /// The largest coordinate magnitude, `max(|x|, |y|)`.
    #[inline]
    pub fn max_abs(self) -> f64 {
        abs(self.x).max(abs(self.y))
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn mag_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_sq(self, other: Self) -> f64 {
        (other - self).mag_sq()
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point2D {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum x (left)
    pub min_x: f64,
    /// Minimum y (bottom)
    pub min_y: f64,
    /// Maximum x (right)
    pub max_x: f64,
    /// Maximum y (top)
    pub max_y: f64,
}

impl Aabb2D {
    /// Create a new AABB from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The degenerate AABB holding a single point.
    #[inline]
    pub const fn from_point(p: Point2D) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Lower (minimum) corner.
    #[inline]
    pub const fn lower(&self) -> Point2D {
        Point2D::new(self.min_x, self.min_y)
    }

    /// Upper (maximum) corner.
    #[inline]
    pub const fn upper(&self) -> Point2D {
        Point2D::new(self.max_x, self.max_y)
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point2D {
        (self.lower() + self.upper()) * 0.5
    }

    /// Grow the box so it also covers `p`.
    #[inline]
    pub fn add_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// The smallest AABB enclosing two AABBs.
    #[inline]
    pub fn union(&self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// The box expanded by `margin` on every side.
    #[inline]
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Whether this AABB contains the point. Edges are inclusive.
    #[inline]
    pub fn contains_point(&self, p: Point2D) -> bool {
        self.min_x <= p.x && self.min_y <= p.y && p.x <= self.max_x && p.y <= self.max_y
    }

    /// Whether the point lies within `margin` of this AABB on both axes.
    #[inline]
    pub fn covers_point(&self, p: Point2D, margin: f64) -> bool {
        self.inflate(margin).contains_point(p)
    }

    /// Determines whether this AABB, expanded by `margin`, overlaps `other`.
    ///
    /// This is the admissibility test used for pruning: when it returns
    /// `false`, no point inside `self` is within `margin` of any point inside
    /// `other`. Shared edges count as overlapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use understory_pairs::Aabb2D;
    ///
    /// let a = Aabb2D::new(0.0, 0.0, 1.0, 1.0);
    /// let b = Aabb2D::new(2.0, 0.0, 3.0, 1.0);
    /// assert!(!a.touches(&b, 0.5));
    /// assert!(a.touches(&b, 1.0));
    /// ```
    #[inline]
    pub fn touches(&self, other: &Self, margin: f64) -> bool {
        other.min_x - self.max_x - margin <= 0.0
            && other.min_y - self.max_y - margin <= 0.0
            && self.min_x - other.max_x - margin <= 0.0
            && self.min_y - other.max_y - margin <= 0.0
    }

    /// Squared distance between the closest points of two AABBs; zero if they overlap.
    #[inline]
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        dx * dx + dy * dy
    }
}

#[inline]
fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

#[cfg(feature = "kurbo")]
mod kurbo_interop {
    use super::{Aabb2D, Point2D};

    impl From<kurbo::Point> for Point2D {
        fn from(p: kurbo::Point) -> Self {
            Self::new(p.x, p.y)
        }
    }

    impl From<Point2D> for kurbo::Point {
        fn from(p: Point2D) -> Self {
            Self::new(p.x, p.y)
        }
    }

    impl From<kurbo::Rect> for Aabb2D {
        fn from(r: kurbo::Rect) -> Self {
            let r = r.abs();
            Self::new(r.x0, r.y0, r.x1, r.y1)
        }
    }

    impl From<Aabb2D> for kurbo::Rect {
        fn from(a: Aabb2D) -> Self {
            Self::new(a.min_x, a.min_y, a.max_x, a.max_y)
        }
    }
}
