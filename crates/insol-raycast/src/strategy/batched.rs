//! Two-stage batched pipeline: circle cull, then triangle tests on a
//! [`ComputeBackend`].

use insol_geom::Mesh;

use super::Strategy;
use crate::batch::{
    read_chunked, reassemble, CircleBatch, ComputeBackend, HitMatrix, PairList,
};
use crate::error::Result;
use crate::scene::SceneGeometry;
use crate::settings::RaycastSettings;
use crate::Ray;

/// Offloads both tests to a compute backend.
///
/// Stage 1 evaluates every (ray, mesh) circle test in one dispatch and reads
/// the matrix back in `read_chunk` transfers. Each positive pair is expanded
/// against all triangles of its mesh and stage 2 tests those pairs in
/// dispatches of `pair_batch`. The count is the number of circle-positive
/// (ray, mesh) pairs with at least one triangle hit, so a ray can be counted
/// once per mesh it hits.
///
/// Stages run one after the other; each stage's device buffers are released
/// before the next dispatch. Any backend error aborts the run.
pub struct BatchedPipeline<B> {
    backend: B,
    settings: RaycastSettings,
}

impl<B: ComputeBackend> BatchedPipeline<B> {
    /// Create a pipeline over `backend`.
    pub fn new(backend: B, settings: RaycastSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { backend, settings })
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stage 1: circle-cull every (ray, mesh) pair.
    pub fn cull(&self, rays: &[Ray], scene: &SceneGeometry) -> Result<HitMatrix> {
        let batch = CircleBatch::stage(rays, &scene.circles);
        let output = self.backend.cull_circles(&batch)?;
        let cells = read_chunked(&output, self.settings.read_chunk)?;
        drop(output);

        let matrix = HitMatrix::from_flat(rays.len(), scene.num_meshes(), cells)?;
        debug_raycast!(
            "stage 1: {} rays x {} meshes, {} circle hits",
            matrix.num_rays(),
            matrix.num_meshes(),
            matrix.count_positive()
        );
        Ok(matrix)
    }

    /// Stage 2: test every pair, returning one boolean per pair in order.
    pub fn test_pairs(&self, pairs: &PairList) -> Result<Vec<bool>> {
        debug_raycast!(
            "stage 2: {} pairs in {} dispatches",
            pairs.len(),
            pairs.len().div_ceil(self.settings.pair_batch)
        );

        let mut results = Vec::with_capacity(pairs.len());
        for batch in pairs.batches(self.settings.pair_batch) {
            let output = self.backend.test_triangles(&batch)?;
            results.extend(read_chunked(&output, self.settings.read_chunk)?);
        }
        Ok(results)
    }
}

impl<B: ComputeBackend> Strategy for BatchedPipeline<B> {
    fn name(&self) -> &'static str {
        "batched"
    }

    fn run(&self, rays: &[Ray], meshes: &[Mesh]) -> Result<usize> {
        if rays.is_empty() || meshes.is_empty() {
            return Ok(0);
        }

        let scene = SceneGeometry::prepare(meshes);
        let matrix = self.cull(rays, &scene)?;
        let pairs = PairList::build(&matrix, rays, &scene);
        let results = self.test_pairs(&pairs)?;
        reassemble(&matrix, &scene, &results)
    }
}
