//! Interchangeable ways of counting ray hits against a set of meshes.
//!
//! Every strategy answers the same question over the same inputs so their
//! throughput can be compared, but two of them deliberately keep counting
//! rules that differ from "rays that hit something":
//!
//! | Strategy | Concurrency | Culling | Counts |
//! |---|---|---|---|
//! | [`SequentialScan`] | none | none | rays hitting any mesh |
//! | [`TaskParallelBruteForce`] | one task per (ray, mesh) | none | hit (ray, mesh) pairs, last ray and last mesh excluded |
//! | [`CulledParallelScan`] | parallel over rays, then over meshes | bounding circle | sum of both sweeps |
//! | [`BatchedPipeline`] | two sequential device stages | bounding circle | hit (ray, mesh) pairs among circle hits |

mod batched;
mod culled;
mod sequential;
mod task_parallel;

pub use batched::BatchedPipeline;
pub use culled::{culled_rays, CulledParallelScan};
pub use sequential::SequentialScan;
pub use task_parallel::TaskParallelBruteForce;

use insol_geom::Mesh;

use crate::error::Result;
use crate::Ray;

/// A hit-counting strategy.
pub trait Strategy {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Count hits of `rays` against `meshes`.
    ///
    /// Empty `rays` or `meshes` yield `Ok(0)`.
    fn run(&self, rays: &[Ray], meshes: &[Mesh]) -> Result<usize>;
}
