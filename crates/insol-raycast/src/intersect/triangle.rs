//! Ray-triangle intersection (Möller–Trumbore).

use insol_geom::Point3;

use super::EPSILON;
use crate::Ray;

/// Intersect a ray with the triangle `(v0, v1, v2)`.
///
/// Returns the ray parameter `t` of the hit, or `None` when the ray is
/// parallel to the triangle's plane, misses the triangle, or meets it at
/// `t <= EPSILON` (behind or touching the origin). Both faces count.
pub fn intersect_triangle(ray: &Ray, v0: &Point3, v1: &Point3, v2: &Point3) -> Option<f64> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let h = ray.direction.cross(&e2);
    let a = e1.dot(&h);

    // Ray is parallel to the triangle plane
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * e2.dot(&q);
    (t > EPSILON).then_some(t)
}
