//! Structure-of-arrays batches and the compute backend seam used by
//! [`BatchedPipeline`](crate::strategy::BatchedPipeline).
//!
//! A batch is flattened into one `f32` array per coordinate so a kernel can
//! index every array with the same work-item id. Positions are staged
//! relative to the batch's first ray origin, subtracted in `f64`, so world
//! coordinates far from zero keep their precision; both kernels only
//! depend on differences of positions. The backend returns a
//! [`DeviceOutput`] per stage; it owns that stage's buffers and releases
//! them when dropped, whether or not the read-back succeeded.

mod host;
mod remap;

pub use host::{HostBackend, HostOutput};
pub use remap::{reassemble, PairList};

use crate::cull::BoundingCircle;
use crate::error::{RaycastError, Result};
use crate::triangulate::Triangle;
use crate::Ray;
use insol_geom::Point3;

/// A device that can evaluate the circle-cull and triangle-test kernels.
///
/// Implementations compile their kernels once and may be dispatched any
/// number of times. Errors are fatal for the current run.
pub trait ComputeBackend {
    /// Output buffer of one dispatch.
    type Output: DeviceOutput;

    /// Evaluate the bounding-circle test for every (ray, mesh) pair.
    ///
    /// The output holds `ray_count * mesh_count` booleans in row-major
    /// order, addressed as `ray * mesh_count + mesh`.
    fn cull_circles(&self, batch: &CircleBatch) -> Result<Self::Output>;

    /// Evaluate the ray-triangle test for each of the batch's pairs.
    fn test_triangles(&self, batch: &TriangleBatch) -> Result<Self::Output>;
}

/// Boolean results left on a device after a dispatch.
pub trait DeviceOutput {
    /// Number of booleans in the output.
    fn len(&self) -> usize;

    /// `true` if the output holds no booleans.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read `len` booleans starting at `offset`.
    fn read(&self, offset: usize, len: usize) -> Result<Vec<bool>>;
}

/// Read an entire output in transfers of at most `chunk` elements,
/// concatenated in element order.
pub fn read_chunked<O: DeviceOutput + ?Sized>(output: &O, chunk: usize) -> Result<Vec<bool>> {
    let total = output.len();
    let chunk = chunk.max(1);
    let mut values = Vec::with_capacity(total);

    let mut offset = 0;
    while offset < total {
        let len = chunk.min(total - offset);
        let part = output.read(offset, len)?;
        if part.len() != len {
            return Err(RaycastError::ReadBack {
                expected: len,
                actual: part.len(),
            });
        }
        values.extend(part);
        offset += len;
    }

    debug_raycast!(
        "read {} elements in {} transfers",
        total,
        total.div_ceil(chunk)
    );
    Ok(values)
}

/// Stage-1 input: the X/Y work-plane projection of every ray and every
/// mesh's bounding circle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircleBatch {
    /// Ray origin X, one per ray.
    pub origin_x: Vec<f32>,
    /// Ray origin Y, one per ray.
    pub origin_y: Vec<f32>,
    /// Ray direction X, one per ray.
    pub dir_x: Vec<f32>,
    /// Ray direction Y, one per ray.
    pub dir_y: Vec<f32>,
    /// Circle center X, one per mesh.
    pub center_x: Vec<f32>,
    /// Circle center Y, one per mesh.
    pub center_y: Vec<f32>,
    /// Circle radius, one per mesh.
    pub radius: Vec<f32>,
}

impl CircleBatch {
    /// Flatten rays and circles, relative to the first ray origin.
    pub fn stage(rays: &[Ray], circles: &[BoundingCircle]) -> Self {
        let base = staging_origin(rays);
        Self {
            origin_x: rays.iter().map(|r| (r.origin.x - base.x) as f32).collect(),
            origin_y: rays.iter().map(|r| (r.origin.y - base.y) as f32).collect(),
            dir_x: rays.iter().map(|r| r.direction.x as f32).collect(),
            dir_y: rays.iter().map(|r| r.direction.y as f32).collect(),
            center_x: circles.iter().map(|c| (c.center.x - base.x) as f32).collect(),
            center_y: circles.iter().map(|c| (c.center.y - base.y) as f32).collect(),
            radius: circles.iter().map(|c| c.radius as f32).collect(),
        }
    }

    /// Number of rays.
    pub fn ray_count(&self) -> usize {
        self.origin_x.len()
    }

    /// Number of meshes.
    pub fn mesh_count(&self) -> usize {
        self.radius.len()
    }

    /// Kernel metadata: `(mesh_count, ray_count)`.
    pub fn meta(&self) -> [usize; 2] {
        [self.mesh_count(), self.ray_count()]
    }

    /// Number of output booleans.
    pub fn output_len(&self) -> usize {
        self.ray_count() * self.mesh_count()
    }

    /// Ray arrays in kernel order: origin X/Y, direction X/Y.
    pub fn ray_arrays(&self) -> [&[f32]; 4] {
        [&self.origin_x, &self.origin_y, &self.dir_x, &self.dir_y]
    }

    /// Circle arrays in kernel order: center X/Y, radius.
    pub fn circle_arrays(&self) -> [&[f32]; 3] {
        [&self.center_x, &self.center_y, &self.radius]
    }
}

/// Stage-2 input: equal-length runs of rays and the triangles to test them
/// against, pair `i` being `(rays[..][i], triangles[..][i])`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleBatch {
    /// Origin X/Y/Z then direction X/Y/Z.
    pub rays: [Vec<f32>; 6],
    /// Vertex 0 X/Y/Z, vertex 1 X/Y/Z, vertex 2 X/Y/Z.
    pub triangles: [Vec<f32>; 9],
}

impl TriangleBatch {
    /// Flatten a run of pairs, relative to the first ray origin.
    ///
    /// # Panics
    ///
    /// Panics if `rays` and `triangles` differ in length.
    pub fn stage(rays: &[Ray], triangles: &[Triangle]) -> Self {
        assert_eq!(rays.len(), triangles.len(), "unpaired rays and triangles");

        let base = staging_origin(rays);
        let mut batch = Self::default();
        for array in batch.rays.iter_mut().chain(batch.triangles.iter_mut()) {
            array.reserve_exact(rays.len());
        }

        for (ray, tri) in rays.iter().zip(triangles) {
            let origin = ray.origin - base;
            let coords = origin.iter().chain(ray.direction.iter());
            for (array, &c) in batch.rays.iter_mut().zip(coords) {
                array.push(c as f32);
            }
            let corners = tri.vertices.iter().flat_map(|&v| {
                let v = v - base;
                [v.x, v.y, v.z]
            });
            for (array, c) in batch.triangles.iter_mut().zip(corners) {
                array.push(c as f32);
            }
        }
        batch
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.rays[0].len()
    }

    /// `true` if the batch has no pairs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kernel metadata: `(pair_count, pair_count)`.
    pub fn meta(&self) -> [usize; 2] {
        [self.len(), self.len()]
    }
}

fn staging_origin(rays: &[Ray]) -> Point3 {
    rays.first().map_or_else(Point3::origin, |r| r.origin)
}

/// Stage-1 result: which (ray, mesh) pairs passed the circle test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitMatrix {
    rays: usize,
    meshes: usize,
    cells: Vec<bool>,
}

impl HitMatrix {
    /// Wrap a row-major `rays x meshes` boolean sequence.
    pub fn from_flat(rays: usize, meshes: usize, cells: Vec<bool>) -> Result<Self> {
        let expected = rays * meshes;
        if cells.len() != expected {
            return Err(RaycastError::ReadBack {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            rays,
            meshes,
            cells,
        })
    }

    /// Number of rows.
    pub fn num_rays(&self) -> usize {
        self.rays
    }

    /// Number of columns.
    pub fn num_meshes(&self) -> usize {
        self.meshes
    }

    /// `true` if `ray` passed the circle of `mesh`.
    pub fn get(&self, ray: usize, mesh: usize) -> bool {
        ray < self.rays && mesh < self.meshes && self.cells[ray * self.meshes + mesh]
    }

    /// Positive `(ray, mesh)` pairs in row-major order.
    pub fn positives(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let meshes = self.meshes;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &hit)| hit)
            .map(move |(i, _)| (i / meshes, i % meshes))
    }

    /// Number of positive pairs.
    pub fn count_positive(&self) -> usize {
        self.cells.iter().filter(|&&hit| hit).count()
    }
}
