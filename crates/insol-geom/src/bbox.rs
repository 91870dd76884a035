//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point of `points`.
    ///
    /// Returns an empty box when `points` yields nothing.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include_point(p);
        }
        aabb
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// `false` for an empty box (nothing was ever included).
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Vector from the minimum to the maximum corner.
    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_and_diagonal() {
        let aabb = Aabb3::from_points(&[
            Point3::new(-1.0, 2.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(1.0, 3.0, 2.0),
        ]);
        assert!(aabb.is_valid());
        assert_eq!(aabb.center(), Point3::new(1.0, 3.0, 1.0));
        assert_relative_eq!(aabb.diagonal().norm(), (16.0f64 + 4.0 + 4.0).sqrt());
    }

    #[test]
    fn test_empty_is_invalid() {
        let aabb = Aabb3::from_points(std::iter::empty());
        assert!(!aabb.is_valid());
    }

    #[test]
    fn test_flat_box_is_valid() {
        // A planar mesh has zero extent along one axis.
        let aabb = Aabb3::new(Point3::new(0.0, 0.0, 1.0), Point3::new(2.0, 2.0, 1.0));
        assert!(aabb.is_valid());
        assert_relative_eq!(aabb.diagonal().norm(), 8.0f64.sqrt());
    }
}
