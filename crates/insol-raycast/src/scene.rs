//! Per-run derived geometry shared by every strategy.

use insol_geom::Mesh;

use crate::cull::BoundingCircle;
use crate::triangulate::{triangulate, Triangle};
use crate::Ray;

/// Triangles and bounding circle of every input mesh, in input order.
///
/// Built fresh for each run and never mutated afterwards, so worker threads
/// share it by reference.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    /// Triangle soup of mesh `i` at index `i`.
    pub triangles: Vec<Vec<Triangle>>,
    /// Bounding circle of mesh `i` at index `i`.
    pub circles: Vec<BoundingCircle>,
}

impl SceneGeometry {
    /// Derive triangles and circles for `meshes`.
    pub fn prepare(meshes: &[Mesh]) -> Self {
        Self {
            triangles: meshes.iter().map(triangulate).collect(),
            circles: meshes.iter().map(BoundingCircle::build).collect(),
        }
    }

    /// Number of meshes.
    pub fn num_meshes(&self) -> usize {
        self.triangles.len()
    }

    /// `true` if the ray hits any triangle of mesh `mesh`.
    #[inline]
    pub fn mesh_hit(&self, mesh: usize, ray: &Ray) -> bool {
        mesh_hit(&self.triangles[mesh], ray)
    }
}

/// `true` if the ray hits any of `triangles` at a forward distance.
///
/// Stops at the first hit.
#[inline]
pub fn mesh_hit(triangles: &[Triangle], ray: &Ray) -> bool {
    triangles.iter().any(|tri| tri.intersect(ray).is_some())
}
