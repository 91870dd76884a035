//! Bounding circles: a cheap X/Y pre-filter in front of triangle tests.
//!
//! Each mesh is summarized by one circle in the ray work-plane, centered on
//! the projected bounding-box center with half the box diagonal as radius.
//! The test measures how far the *infinite line* through the ray passes from
//! the center; it ignores which way the ray points, so a ray heading away
//! from a mesh can still pass. It is an approximation kept for cull speed.

use insol_geom::{project_point, project_vec, Aabb3, Mesh, Point2, Vec2};
use serde::{Deserialize, Serialize};

use crate::Ray;

/// Approximate X/Y footprint of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingCircle {
    /// Projected center of the mesh bounding box.
    pub center: Point2,
    /// Half the bounding-box diagonal; never negative.
    pub radius: f64,
}

impl BoundingCircle {
    /// Create a circle. Negative radii are clamped to zero.
    pub fn new(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Circle for a mesh's vertex bounding box.
    pub fn build(mesh: &Mesh) -> Self {
        Self::from_aabb(&mesh.bounding_box())
    }

    /// Circle for a bounding box.
    ///
    /// An empty box (mesh without vertices) maps to a zero circle at the
    /// work-plane origin; such a mesh has no triangles to hit anyway.
    pub fn from_aabb(aabb: &Aabb3) -> Self {
        if !aabb.is_valid() {
            return Self::new(Point2::origin(), 0.0);
        }
        Self::new(project_point(&aabb.center()), aabb.diagonal().norm() / 2.0)
    }

    /// Distance from the center to the line through the ray, as
    /// `|sin(angle)| * |center - origin|` where `angle` is measured between
    /// the ray direction and the origin-to-center vector in X/Y.
    ///
    /// A direction with no X/Y component has heading 0.
    pub fn touch_distance(&self, ray: &Ray) -> f64 {
        let origin = project_point(&ray.origin);
        let direction = project_vec(&ray.direction);
        let to_center = self.center - origin;

        let heading = if direction == Vec2::zeros() {
            0.0
        } else {
            direction.y.atan2(direction.x)
        };
        let angle = to_center.y.atan2(to_center.x) - heading;
        angle.sin().abs() * to_center.norm()
    }

    /// `true` when the line through the ray passes within `radius` of the center.
    #[inline]
    pub fn intersects(&self, ray: &Ray) -> bool {
        self.touch_distance(ray) <= self.radius
    }
}
