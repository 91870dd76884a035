//! One pool task per (ray, mesh) pair.

use std::sync::atomic::{AtomicUsize, Ordering};

use insol_geom::Mesh;

use super::Strategy;
use crate::error::Result;
use crate::scene::SceneGeometry;
use crate::settings::RaycastSettings;
use crate::Ray;

/// Spawns one task per (ray, mesh) pair on a fixed worker pool and counts
/// the pairs that hit, not the rays.
///
/// The pairing loops stop one short on both axes: the last ray and the last
/// mesh are never tested. Both quirks are part of this strategy's contract
/// and are kept so benchmark numbers stay comparable with earlier runs.
pub struct TaskParallelBruteForce {
    pool: rayon::ThreadPool,
}

impl TaskParallelBruteForce {
    /// Create the strategy with its own worker pool.
    pub fn new(settings: &RaycastSettings) -> Result<Self> {
        Ok(Self {
            pool: settings.thread_pool()?,
        })
    }

    /// Ray and mesh index bounds actually visited.
    pub fn pair_bounds(num_rays: usize, num_meshes: usize) -> (usize, usize) {
        (num_rays.saturating_sub(1), num_meshes.saturating_sub(1))
    }
}

impl Strategy for TaskParallelBruteForce {
    fn name(&self) -> &'static str {
        "task-parallel"
    }

    fn run(&self, rays: &[Ray], meshes: &[Mesh]) -> Result<usize> {
        if rays.is_empty() || meshes.is_empty() {
            return Ok(0);
        }

        let scene = SceneGeometry::prepare(meshes);
        let hits = AtomicUsize::new(0);
        let (ray_bound, mesh_bound) = Self::pair_bounds(rays.len(), meshes.len());

        // `scope` returns only after every spawned task has finished.
        self.pool.scope(|s| {
            for ray in &rays[..ray_bound] {
                for mesh in 0..mesh_bound {
                    let scene = &scene;
                    let hits = &hits;
                    s.spawn(move |_| {
                        if scene.mesh_hit(mesh, ray) {
                            hits.fetch_add(1, Ordering::Relaxed);
                        }
                    });
                }
            }
        });

        Ok(hits.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insol_geom::{MeshFace, Point3, Vec3};

    fn plate_at(x: f64) -> Mesh {
        Mesh::new(
            vec![
                Point3::new(x, 0.0, 0.0),
                Point3::new(x + 1.0, 0.0, 0.0),
                Point3::new(x + 1.0, 1.0, 0.0),
                Point3::new(x, 1.0, 0.0),
            ],
            vec![MeshFace::quad(0, 1, 2, 3)],
        )
    }

    fn down_at(x: f64) -> Ray {
        Ray::new(Point3::new(x, 0.5, 3.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn strategy() -> TaskParallelBruteForce {
        TaskParallelBruteForce::new(&RaycastSettings {
            threads: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_counts_pairs_not_rays() {
        // Two stacked plates at the same X/Y; a third mesh is never visited.
        let mut lower = plate_at(0.0);
        for v in &mut lower.vertices {
            v.z = -1.0;
        }
        let meshes = [plate_at(0.0), lower, plate_at(50.0)];
        let rays = [down_at(0.5), down_at(0.5)];
        // Only ray 0 is visited; it hits meshes 0 and 1.
        assert_eq!(strategy().run(&rays, &meshes).unwrap(), 2);
    }

    #[test]
    fn test_last_ray_and_last_mesh_skipped() {
        let meshes = [plate_at(0.0), plate_at(10.0)];
        // Ray 1 would hit mesh 0 and ray 0 would hit mesh 1; neither pair is visited
        // except (0, 0), which misses.
        let rays = [down_at(10.5), down_at(0.5)];
        assert_eq!(strategy().run(&rays, &meshes).unwrap(), 0);
    }

    #[test]
    fn test_single_ray_or_mesh_visits_nothing() {
        let meshes = [plate_at(0.0), plate_at(0.0)];
        assert_eq!(strategy().run(&[down_at(0.5)], &meshes).unwrap(), 0);

        let rays = [down_at(0.5), down_at(0.5)];
        assert_eq!(strategy().run(&rays, &meshes[..1]).unwrap(), 0);
    }

    #[test]
    fn test_pair_bounds() {
        assert_eq!(TaskParallelBruteForce::pair_bounds(5, 3), (4, 2));
        assert_eq!(TaskParallelBruteForce::pair_bounds(0, 0), (0, 0));
    }
}
