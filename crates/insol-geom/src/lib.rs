#![warn(missing_docs)]

//! Geometry types for insol.
//!
//! Thin wrappers around nalgebra providing the point and vector types the
//! ray-casting core works with, plus the polygon [`Mesh`] input format and
//! the axis-aligned [`Aabb3`] used to derive bounding circles.

use nalgebra::{Vector2, Vector3};

pub mod bbox;
pub mod mesh;

pub use bbox::Aabb3;
pub use mesh::{Mesh, MeshFace};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in the 2D work-plane (X/Y).
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the 2D work-plane (X/Y).
pub type Vec2 = Vector2<f64>;

/// Project a 3D point onto the X/Y work-plane.
#[inline]
pub fn project_point(p: &Point3) -> Point2 {
    Point2::new(p.x, p.y)
}

/// Project a 3D vector onto the X/Y work-plane.
#[inline]
pub fn project_vec(v: &Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_drops_z() {
        let p = project_point(&Point3::new(1.0, -2.0, 7.5));
        assert_eq!(p, Point2::new(1.0, -2.0));

        let v = project_vec(&Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(v, Vec2::zeros());
    }
}
