//! Stage-1 to stage-2 index remapping and result reassembly.

use crate::batch::{HitMatrix, TriangleBatch};
use crate::error::{RaycastError, Result};
use crate::scene::SceneGeometry;
use crate::triangulate::Triangle;
use crate::Ray;

/// Parallel `(ray, triangle)` work list for the triangle-test stage.
///
/// Built group by group: each positive `(ray, mesh)` pair of the hit matrix,
/// in row-major order, contributes the ray once per triangle of that mesh,
/// paired with every one of those triangles in triangulation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairList {
    /// Ray of pair `i`.
    pub rays: Vec<Ray>,
    /// Triangle of pair `i`.
    pub triangles: Vec<Triangle>,
}

impl PairList {
    /// Expand the positives of `matrix` against the triangles of `scene`.
    pub fn build(matrix: &HitMatrix, rays: &[Ray], scene: &SceneGeometry) -> Self {
        let mut pairs = Self::default();
        for (ray, mesh) in matrix.positives() {
            let tris = &scene.triangles[mesh];
            pairs.rays.extend(std::iter::repeat(rays[ray]).take(tris.len()));
            pairs.triangles.extend_from_slice(tris);
        }
        pairs
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.rays.len()
    }

    /// `true` if there is nothing to test.
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Staged batches of at most `size` pairs, in pair order.
    pub fn batches(&self, size: usize) -> impl Iterator<Item = TriangleBatch> + '_ {
        let size = size.max(1);
        self.rays
            .chunks(size)
            .zip(self.triangles.chunks(size))
            .map(|(rays, tris)| TriangleBatch::stage(rays, tris))
    }
}

/// Count the positive `(ray, mesh)` pairs of `matrix` whose triangle group
/// has at least one hit in `results`.
///
/// `results` must be the concatenated stage-2 output for the [`PairList`]
/// built from the same matrix and scene. A ray passing several meshes'
/// circles can count once per mesh it hits.
pub fn reassemble(matrix: &HitMatrix, scene: &SceneGeometry, results: &[bool]) -> Result<usize> {
    let mut cursor = 0;
    let mut hits = 0;

    for (_, mesh) in matrix.positives() {
        let end = cursor + scene.triangles[mesh].len();
        let group = results.get(cursor..end).ok_or(RaycastError::ReadBack {
            expected: end,
            actual: results.len(),
        })?;
        if group.iter().any(|&hit| hit) {
            hits += 1;
        }
        cursor = end;
    }

    if cursor != results.len() {
        return Err(RaycastError::ReadBack {
            expected: cursor,
            actual: results.len(),
        });
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insol_geom::{Mesh, MeshFace, Point3, Vec3};

    fn triangle_at(x: f64) -> Mesh {
        Mesh::new(
            vec![
                Point3::new(x, 0.0, 0.0),
                Point3::new(x + 1.0, 0.0, 0.0),
                Point3::new(x, 1.0, 0.0),
            ],
            vec![MeshFace::triangle(0, 1, 2)],
        )
    }

    fn two_by_two() -> (Vec<Ray>, SceneGeometry) {
        let rays = vec![
            Ray::new(Point3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0)),
            Ray::new(Point3::new(5.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0)),
        ];
        let scene = SceneGeometry::prepare(&[triangle_at(0.0), triangle_at(10.0)]);
        (rays, scene)
    }

    #[test]
    fn test_single_positive_pair_yields_one_entry() {
        let (rays, scene) = two_by_two();
        // Only (ray 0, mesh 1) passed the circle test.
        let matrix = HitMatrix::from_flat(2, 2, vec![false, true, false, false]).unwrap();

        let pairs = PairList::build(&matrix, &rays, &scene);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.rays[0], rays[0]);
        assert_eq!(pairs.triangles[0], scene.triangles[1][0]);
    }

    #[test]
    fn test_ray_replicated_per_triangle() {
        let rays = vec![Ray::new(Point3::new(0.5, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0))];
        let square = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![MeshFace::quad(0, 1, 2, 3), MeshFace::triangle(0, 1, 2)],
        );
        let scene = SceneGeometry::prepare(&[square]);
        let matrix = HitMatrix::from_flat(1, 1, vec![true]).unwrap();

        let pairs = PairList::build(&matrix, &rays, &scene);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.rays.iter().all(|r| *r == rays[0]));
        assert_eq!(pairs.triangles, scene.triangles[0]);
    }

    #[test]
    fn test_batches_preserve_pair_order() {
        let (rays, scene) = two_by_two();
        let matrix = HitMatrix::from_flat(2, 2, vec![true; 4]).unwrap();
        let pairs = PairList::build(&matrix, &rays, &scene);

        let batches: Vec<_> = pairs.batches(3).collect();
        assert_eq!(batches.iter().map(TriangleBatch::len).collect::<Vec<_>>(), vec![3, 1]);
        // Pair order: (0,0) (0,1) (1,0) (1,1); the last batch holds ray 1,
        // staged at its own origin, and mesh 1 five units ahead of it.
        assert_eq!(batches[1].rays[0], vec![0.0]);
        assert_eq!(batches[1].triangles[0], vec![5.0]);
    }

    #[test]
    fn test_reassemble_counts_groups() {
        let (rays, scene) = two_by_two();
        let matrix = HitMatrix::from_flat(2, 2, vec![true, true, false, true]).unwrap();
        let pairs = PairList::build(&matrix, &rays, &scene);
        assert_eq!(pairs.len(), 3);

        assert_eq!(reassemble(&matrix, &scene, &[true, false, true]).unwrap(), 2);
        assert_eq!(reassemble(&matrix, &scene, &[false, false, false]).unwrap(), 0);
    }

    #[test]
    fn test_reassemble_empty_group_never_counts() {
        let rays = vec![Ray::new(Point3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0))];
        let scene = SceneGeometry::prepare(&[Mesh::default(), triangle_at(0.0)]);
        let matrix = HitMatrix::from_flat(1, 2, vec![true, true]).unwrap();

        let pairs = PairList::build(&matrix, &rays, &scene);
        assert_eq!(pairs.len(), 1);
        assert_eq!(reassemble(&matrix, &scene, &[true]).unwrap(), 1);
    }

    #[test]
    fn test_reassemble_length_mismatch() {
        let (_, scene) = two_by_two();
        let matrix = HitMatrix::from_flat(2, 2, vec![true, false, false, true]).unwrap();

        assert!(reassemble(&matrix, &scene, &[true]).is_err());
        assert!(reassemble(&matrix, &scene, &[true, true, true]).is_err());
    }
}
