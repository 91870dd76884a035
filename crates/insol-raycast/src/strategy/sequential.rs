//! Single-threaded reference scan.

use insol_geom::Mesh;

use super::Strategy;
use crate::error::Result;
use crate::scene::{mesh_hit, SceneGeometry};
use crate::Ray;

/// Tests each ray against the meshes in order and stops at the first mesh
/// it hits. No culling, no threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialScan;

impl SequentialScan {
    /// Count the rays that hit at least one triangle of the scene.
    pub fn count(rays: &[Ray], scene: &SceneGeometry) -> usize {
        rays.iter()
            .filter(|ray| scene.triangles.iter().any(|tris| mesh_hit(tris, ray)))
            .count()
    }
}

impl Strategy for SequentialScan {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn run(&self, rays: &[Ray], meshes: &[Mesh]) -> Result<usize> {
        if rays.is_empty() || meshes.is_empty() {
            return Ok(0);
        }
        let scene = SceneGeometry::prepare(meshes);
        Ok(Self::count(rays, &scene))
    }
}
