//! Geometry helpers for circle bodies
//!
//! Everything here runs for every entity pair every frame, so degenerate
//! inputs (zero-length vectors, coincident centres) resolve to defined
//! values instead of NaN.

use glam::Vec2;

/// Axis used to separate bodies whose centres coincide
pub const FALLBACK_AXIS: Vec2 = Vec2::X;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Whether two circles overlap (strictly)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Contact between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

/// Compute the contact for two circles, or `None` when they don't overlap
pub fn circle_contact(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Contact> {
    if !circles_overlap(a, ra, b, rb) {
        return None;
    }
    let delta = b - a;
    let dist = delta.length();
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        FALLBACK_AXIS
    };
    Some(Contact {
        normal,
        penetration: ra + rb - dist,
    })
}

/// Equal-mass elastic exchange along the contact normal
///
/// Swaps the normal components of the two velocities and leaves the
/// tangential components alone. Bodies already separating are untouched.
pub fn elastic_exchange(va: Vec2, vb: Vec2, normal: Vec2) -> (Vec2, Vec2) {
    let closing = (va - vb).dot(normal);
    if closing <= 0.0 {
        return (va, vb);
    }
    let impulse = normal * closing;
    (va - impulse, vb + impulse)
}

/// Whether the segment `start..end` passes within `radius` of `center`
pub fn segment_intersects_circle(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let seg = end - start;
    let len_sq = seg.length_squared();
    let t = if len_sq < 0.0001 {
        0.0
    } else {
        ((center - start).dot(seg) / len_sq).clamp(0.0, 1.0)
    };
    let closest = start + seg * t;
    closest.distance_squared(center) <= radius * radius
}

/// Average of a set of points (origin for an empty set)
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}

/// Unit vector for a heading in degrees
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Heading in degrees [0, 360) for a direction (0 for the zero vector)
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    if dir.length_squared() < f32::EPSILON {
        return 0.0;
    }
    crate::wrap_degrees(dir.y.atan2(dir.x).to_degrees())
}
