//! Compute backend that evaluates both kernels on the calling thread.

use insol_geom::{Point2, Point3, Vec3};

use crate::batch::{CircleBatch, ComputeBackend, DeviceOutput, TriangleBatch};
use crate::cull::BoundingCircle;
use crate::error::{RaycastError, Result};
use crate::triangulate::Triangle;
use crate::Ray;

/// Runs the kernel formulas over the staged `f32` arrays without a device.
///
/// Values are widened back to `f64` and fed through the same intersector and
/// circle test as the CPU strategies, so results match a device run up to
/// the precision lost in staging.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostBackend;

/// Booleans produced by [`HostBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostOutput(Vec<bool>);

impl HostOutput {
    /// Wrap precomputed booleans.
    pub fn new(values: Vec<bool>) -> Self {
        Self(values)
    }
}

impl DeviceOutput for HostOutput {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn read(&self, offset: usize, len: usize) -> Result<Vec<bool>> {
        self.0
            .get(offset..offset + len)
            .map(<[bool]>::to_vec)
            .ok_or_else(|| {
                RaycastError::Backend(format!(
                    "read of {len} elements at {offset} past end {}",
                    self.0.len()
                ))
            })
    }
}

impl ComputeBackend for HostBackend {
    type Output = HostOutput;

    fn cull_circles(&self, batch: &CircleBatch) -> Result<HostOutput> {
        let [ox, oy, dx, dy] = batch.ray_arrays();
        let [cx, cy, radius] = batch.circle_arrays();

        let circles: Vec<BoundingCircle> = (0..batch.mesh_count())
            .map(|m| {
                BoundingCircle::new(
                    Point2::new(cx[m] as f64, cy[m] as f64),
                    radius[m] as f64,
                )
            })
            .collect();

        let mut cells = Vec::with_capacity(batch.output_len());
        for r in 0..batch.ray_count() {
            let ray = Ray::new(
                Point3::new(ox[r] as f64, oy[r] as f64, 0.0),
                Vec3::new(dx[r] as f64, dy[r] as f64, 0.0),
            );
            cells.extend(circles.iter().map(|circle| circle.intersects(&ray)));
        }
        Ok(HostOutput(cells))
    }

    fn test_triangles(&self, batch: &TriangleBatch) -> Result<HostOutput> {
        let r = &batch.rays;
        let t = &batch.triangles;
        let point = |a: &[f32], b: &[f32], c: &[f32], i: usize| {
            Point3::new(a[i] as f64, b[i] as f64, c[i] as f64)
        };

        let cells = (0..batch.len())
            .map(|i| {
                let ray = Ray::new(
                    point(&r[0], &r[1], &r[2], i),
                    point(&r[3], &r[4], &r[5], i).coords,
                );
                let tri = Triangle::new(
                    point(&t[0], &t[1], &t[2], i),
                    point(&t[3], &t[4], &t[5], i),
                    point(&t[6], &t[7], &t[8], i),
                );
                tri.intersect(&ray).is_some()
            })
            .collect();
        Ok(HostOutput(cells))
    }
}
