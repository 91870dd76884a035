//! Ray representation.

use insol_geom::{Point3, Vec3};
use serde::{Deserialize, Serialize};

/// A half-line from `origin` along `direction`.
///
/// The direction is stored as given, so intersection distances are measured
/// in multiples of its length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray (not necessarily unit length).
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// One ray per direction, all sharing `origin`.
    pub fn fan(origin: Point3, directions: &[Vec3]) -> Vec<Ray> {
        directions.iter().map(|&d| Self::new(origin, d)).collect()
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_fan_shares_origin() {
        let origin = Point3::new(-1.0, 2.0, 0.5);
        let rays = Ray::fan(origin, &[Vec3::x(), Vec3::y(), -Vec3::z()]);
        assert_eq!(rays.len(), 3);
        assert!(rays.iter().all(|r| r.origin == origin));
        assert_eq!(rays[2].direction, Vec3::new(0.0, 0.0, -1.0));
    }
}
