//! Angle arithmetic, arc containment and ray–circle intersection.
//!
//! All angles are degrees. Every arc and bearing comparison goes through
//! [`angle_difference`] so nothing breaks at the 0°/360° seam.

use salvo_core::constants::OMNIDIRECTIONAL_HALF_ANGLE;
use salvo_core::types::{Vector2, VectorExt};

/// Normalize an angle into `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn angle_difference(from: f64, to: f64) -> f64 {
    let d = normalize_angle(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Whether `target_bearing` lies within `half_angle` of `heading`.
/// Half-angles of 180° or more are omnidirectional.
pub fn in_arc(heading: f64, target_bearing: f64, half_angle: f64) -> bool {
    if half_angle >= OMNIDIRECTIONAL_HALF_ANGLE {
        return true;
    }
    angle_difference(heading, target_bearing).abs() <= half_angle
}

/// Bearing from `from` to `to` in degrees. `None` when the points coincide
/// or either is not finite.
pub fn bearing_to(from: Vector2, to: Vector2) -> Option<f64> {
    let d = to - from;
    if !d.is_finite() || d.length_squared() == 0.0 {
        return None;
    }
    Some(d.angle_deg())
}

/// Intersect a ray with a circle.
///
/// `direction` must be normalized. Returns both roots `(t_near, t_far)` of the
/// quadratic, which may be negative when the circle is behind the origin or
/// contains it. `None` when the ray misses entirely.
pub fn ray_sphere_intersection(
    origin: Vector2,
    direction: Vector2,
    sphere_center: Vector2,
    radius: f64,
) -> Option<(f64, f64)> {
    let oc = origin - sphere_center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if !discriminant.is_finite() || discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    Some((-b - root, -b + root))
}

/// Smallest intersection distance within `[0, max_range]`, if any.
pub fn first_hit_within(roots: (f64, f64), max_range: f64) -> Option<f64> {
    let (near, far) = roots;
    [near, far]
        .into_iter()
        .find(|t| *t >= 0.0 && *t <= max_range)
}

/// Distance from `origin` along `direction` to the surface of a circle,
/// limited to `max_range`.
pub fn surface_distance(
    origin: Vector2,
    direction: Vector2,
    sphere_center: Vector2,
    radius: f64,
    max_range: f64,
) -> Option<f64> {
    ray_sphere_intersection(origin, direction, sphere_center, radius)
        .and_then(|roots| first_hit_within(roots, max_range))
}
