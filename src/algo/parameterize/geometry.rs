//! Small 2D helpers shared by the flattening stages.
//!
//! Vector types come from nalgebra; this module only adds the handful of
//! guarded operations the unfolding needs to stay finite on degenerate input.

use nalgebra::{Point2, Vector2};

/// Lengths below this are treated as zero.
pub const EDGE_EPSILON: f64 = 1e-10;

/// Bounding boxes with an extent at or below this are not rescaled.
pub const NORMALIZE_EPSILON: f64 = 1e-10;

/// Twice the signed area of triangle `(a, b, c)`; positive when counter-clockwise.
#[inline]
pub fn orient2d(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    cross2(&(b - a), &(c - a))
}

/// The z component of the 3D cross product of two planar vectors.
#[inline]
pub fn cross2(u: &Vector2<f64>, v: &Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Unit vector along `v`, or zero if `v` is too short to have a direction.
#[inline]
pub fn unit_or_zero(v: &Vector2<f64>) -> Vector2<f64> {
    let len = v.norm();
    if len > EDGE_EPSILON {
        v / len
    } else {
        Vector2::zeros()
    }
}

/// Left-hand normal of `v` (rotated a quarter turn counter-clockwise).
#[inline]
pub fn perp(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Cosine of the angle between sides `a` and `b` of a triangle whose third
/// side is `opposite`, clamped to `[-1, 1]`.
///
/// A zero-length adjacent side has no angle; it reports `1.0` so the caller
/// collapses the point onto the shared vertex instead of producing NaN.
#[inline]
pub fn law_of_cosines(a: f64, b: f64, opposite: f64) -> f64 {
    let denom = 2.0 * a * b;
    if denom <= EDGE_EPSILON * EDGE_EPSILON {
        return 1.0;
    }
    ((a * a + b * b - opposite * opposite) / denom).clamp(-1.0, 1.0)
}

/// The non-negative sine matching a clamped cosine.
#[inline]
pub fn sin_from_cos(cos: f64) -> f64 {
    (1.0 - cos * cos).max(0.0).sqrt()
}
