// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact mapping from coordinates to cells of a uniform grid.
//!
//! Cell `k` of side `s` is the half-open interval `[k * s, (k + 1) * s)` in exact
//! arithmetic. Flooring a rounded quotient `x / s` can be off by one for points sitting
//! on a boundary whenever `s` is not a power of two, and then two points exactly `s`
//! apart end up two cells apart. [`floor_div`] corrects the rounded quotient with an
//! exact comparison, so points within `s` of each other always share a cell or sit in
//! neighboring ones.

use core::cmp::Ordering;

/// Bound on `|x / side|` below which [`floor_div`] is exact (`2^53`).
pub(crate) const MAX_CELL_INDEX: f64 = 9_007_199_254_740_992.0;

/// Index of the cell of side `side` holding `x`: the largest `k` with `k * side <= x`.
///
/// `side` must be positive and `|x / side|` below [`MAX_CELL_INDEX`].
pub(crate) fn floor_div(x: f64, side: f64) -> i64 {
    let t = x / side;
    debug_assert!(
        side > 0.0 && -MAX_CELL_INDEX < t && t < MAX_CELL_INDEX,
        "cell index of {x} / {side} out of range"
    );
    let mut k = floor_to_i64(t);
    // The rounded quotient is at most one cell off.
    while !product_le(k, side, x) {
        k -= 1;
    }
    while product_le(k + 1, side, x) {
        k += 1;
    }
    k
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Callers keep quotients well inside the i64 range."
)]
#[inline]
fn floor_to_i64(t: f64) -> i64 {
    let k = t as i64;
    // Round towards -∞ (the cast above has already truncated).
    if (k as f64) > t { k - 1 } else { k }
}

/// Whether `k * side <= x` in exact arithmetic.
fn product_le(k: i64, side: f64, x: f64) -> bool {
    // `k` is below 2^53 in magnitude, so it converts exactly.
    let p = k as f64 * side;
    if p != x {
        // Round-to-nearest never carries a product past a neighboring float.
        return p < x;
    }
    let (side_m, side_e) = decompose(side);
    let (x_m, x_e) = decompose(x);
    compare_scaled(
        i128::from(k) * i128::from(side_m),
        side_e,
        i128::from(x_m),
        x_e,
    ) != Ordering::Greater
}

/// Split a finite `v` into an integer mantissa `m` and exponent `e` with `v = m * 2^e`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Both fields are masked to at most 52 bits first."
)]
fn decompose(v: f64) -> (i64, i32) {
    let bits = v.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = (bits & ((1_u64 << 52) - 1)) as i64;
    let (m, e) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1_i64 << 52), biased - 1075)
    };
    if v.is_sign_negative() { (-m, e) } else { (m, e) }
}

/// Compare `a * 2^ea` with `b * 2^eb` without rounding.
fn compare_scaled(a: i128, ea: i32, b: i128, eb: i32) -> Ordering {
    let signs = a.signum().cmp(&b.signum());
    if signs != Ordering::Equal || a == 0 {
        return signs;
    }
    let magnitudes = if ea >= eb {
        shifted_cmp(a.unsigned_abs(), ea.abs_diff(eb), b.unsigned_abs())
    } else {
        shifted_cmp(b.unsigned_abs(), eb.abs_diff(ea), a.unsigned_abs()).reverse()
    };
    if a < 0 {
        magnitudes.reverse()
    } else {
        magnitudes
    }
}

/// Compare `m << shift` with `other`, for non-zero `m` and `other < 2^127`.
fn shifted_cmp(m: u128, shift: u32, other: u128) -> Ordering {
    if shift >= m.leading_zeros() {
        Ordering::Greater
    } else {
        (m << shift).cmp(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::Rng;

    #[test]
    fn exact_multiples_floor_to_their_own_cell() {
        assert_eq!(floor_div(0.0, 0.1), 0);
        assert_eq!(floor_div(-0.0, 0.1), 0);
        assert_eq!(floor_div(-0.1, 0.1), -1);
        assert_eq!(floor_div(0.1, 0.1), 1);
        assert_eq!(floor_div(2.0, 1.0), 2);
        assert_eq!(floor_div(-1.5, 0.5), -3);
    }

    #[test]
    fn boundaries_follow_exact_products() {
        // The literal 0.3 lies just below 3 * 0.1, the rounded product just above it.
        assert_eq!(floor_div(0.3, 0.1), 2);
        assert_eq!(floor_div(3.0 * 0.1, 0.1), 3);
        assert_eq!(floor_div(-0.3, 0.1), -3);
        assert_eq!(floor_div(-(3.0 * 0.1), 0.1), -4);
    }

    #[test]
    fn tiny_magnitudes() {
        assert_eq!(floor_div(5e-324, 1.0), 0);
        assert_eq!(floor_div(-5e-324, 1.0), -1);
        assert_eq!(floor_div(5e-324, 5e-324), 1);
    }

    #[test]
    fn lattice_neighbors_stay_in_adjacent_cells() {
        for side in [0.1, 0.7, 1.1, 2.66, 1e-3] {
            for origin in [0.0, 1.0e4, -21_979.4] {
                let mut last: Option<(f64, i64)> = None;
                for i in -300..300 {
                    let x = origin + f64::from(i) * side;
                    let k = floor_div(x, side);
                    assert!(product_le(k, side, x), "cell {k} starts past {x}");
                    assert!(!product_le(k + 1, side, x), "{x} belongs past cell {k}");
                    if let Some((prev_x, prev)) = last {
                        assert!(k >= prev, "{x} went back from cell {prev} to {k}");
                        // Rounding can push lattice points slightly more than `side` apart;
                        // only points within `side` must stay adjacent.
                        if x - prev_x <= side {
                            assert!(
                                k - prev <= 1,
                                "side {side}, origin {origin}: {x} jumped from cell {prev} to {k}"
                            );
                        }
                    }
                    last = Some((x, k));
                }
            }
        }
    }

    #[test]
    fn matches_float_floor_away_from_boundaries() {
        let mut rng = Rng::new(42);
        for _ in 0..2_000 {
            let side = rng.range(0.01, 5.0);
            let x = rng.range(-1.0e3, 1.0e3);
            let t = x / side;
            let k = floor_div(x, side);
            // The quotient is only ever corrected near an integer.
            if t - (k as f64) > 1e-9 && (k as f64) + 1.0 - t > 1e-9 {
                assert_eq!(k, floor_to_i64(t), "x {x} side {side}");
            }
            assert!(product_le(k, side, x), "x {x} side {side}");
            assert!(!product_le(k + 1, side, x), "x {x} side {side}");
        }
    }

    #[test]
    fn scaled_comparison() {
        assert_eq!(compare_scaled(3, 0, 6, -1), Ordering::Equal);
        assert_eq!(compare_scaled(-3, 0, 6, -1), Ordering::Less);
        assert_eq!(compare_scaled(-3, 2, -13, 0), Ordering::Greater);
        assert_eq!(compare_scaled(0, 5, 0, -5), Ordering::Equal);
        assert_eq!(compare_scaled(1, 200, 1 << 100, 0), Ordering::Greater);
        assert_eq!(compare_scaled(1 << 100, 0, 1, 200), Ordering::Less);
    }
}
