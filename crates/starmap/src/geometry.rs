//! Geometry primitives used by fleet movement and universe generation.

use crate::Vector;

/// Tests a travel segment against a circle.
///
/// Returns the fraction `t` in `[0, 1]` along `from -> to` at which the
/// segment first enters the circle, or `None` if it never does.
///
/// - A segment that starts inside (or on the edge of) the circle enters at `0.0`
/// - A segment that only grazes the circle is a hit at the tangent point
/// - A zero-length segment or a circle with no radius never intersects
///
/// # Example
///
/// ```
/// use starmap::{segment_intersects_circle, Vector};
///
/// let center = Vector::new(50.0, 0.0);
///
/// // Entering the far side of the segment
/// let t = segment_intersects_circle(Vector::ZERO, Vector::new(100.0, 0.0), center, 10.0);
/// assert_eq!(t, Some(0.4));
///
/// // Passing well above the circle
/// let miss = segment_intersects_circle(
///     Vector::new(0.0, 20.0),
///     Vector::new(100.0, 20.0),
///     center,
///     10.0,
/// );
/// assert_eq!(miss, None);
/// ```
#[must_use]
pub fn segment_intersects_circle(
    from: Vector,
    to: Vector,
    center: Vector,
    radius: f64,
) -> Option<f64> {
    let direction = to - from;
    let a = direction.length_squared();
    if a == 0.0 || radius <= 0.0 {
        return None;
    }

    let offset = from - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = 2.0 * offset.dot(direction);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    // Starting outside means both roots share a sign, so the nearer root is
    // the entry point when it lies on the segment at all.
    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if (0.0..=1.0).contains(&t) {
        Some(t)
    } else {
        None
    }
}

/// Returns `true` if `position` is strictly further than `min_distance` from
/// every point in `occupied`.
///
/// Distances are compared squared, so no square roots are taken.
#[must_use]
pub fn is_position_valid(position: Vector, occupied: &[Vector], min_distance: f64) -> bool {
    let min_distance_squared = min_distance * min_distance;
    occupied
        .iter()
        .all(|other| position.distance_squared(*other) > min_distance_squared)
}
