//! Course geometry helpers.

use glam::DVec3;

/// Euclidean distance between two 3-D points.
pub fn distance(a: DVec3, b: DVec3) -> f64 {
    a.distance(b)
}

/// Whether `point` lies within `radius` of `center` (boundary inclusive).
pub fn within_radius(point: DVec3, center: DVec3, radius: f64) -> bool {
    distance(point, center) <= radius
}
