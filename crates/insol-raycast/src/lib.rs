#![warn(missing_docs)]

//! Ray/mesh hit counting for insolation studies.
//!
//! Given a fan of rays and a set of triangulated meshes, count how many rays
//! hit. Four interchangeable strategies answer the question so their
//! throughput can be compared on identical inputs.
//!
//! # Architecture
//!
//! - [`Ray`] - origin and direction
//! - [`intersect`] - Möller–Trumbore ray/triangle test
//! - [`triangulate()`] - mesh faces to triangle soup
//! - [`BoundingCircle`] - X/Y pre-filter per mesh
//! - [`strategy`] - sequential, task-parallel, culled and batched strategies
//! - [`batch`] - structure-of-arrays staging and the [`ComputeBackend`] seam
//! - `gpu` - wgpu kernels (feature `gpu`)
//!
//! # Example
//!
//! ```
//! use insol_geom::{Mesh, MeshFace, Point3, Vec3};
//! use insol_raycast::{Ray, SequentialScan, Strategy};
//!
//! let square = Mesh::new(
//!     vec![
//!         Point3::new(-0.5, -0.5, 0.0),
//!         Point3::new(0.5, -0.5, 0.0),
//!         Point3::new(0.5, 0.5, 0.0),
//!         Point3::new(-0.5, 0.5, 0.0),
//!     ],
//!     vec![MeshFace::quad(0, 1, 2, 3)],
//! );
//! let rays = Ray::fan(Point3::new(0.0, 0.0, 5.0), &[Vec3::new(0.0, 0.0, -1.0)]);
//!
//! assert_eq!(SequentialScan.run(&rays, &[square]).unwrap(), 1);
//! ```

/// Debug logging macro - only prints when debug-raycast feature is enabled.
#[allow(unused_macros)]
#[cfg(feature = "debug-raycast")]
macro_rules! debug_raycast {
    ($($arg:tt)*) => {
        eprintln!("[insol-raycast] {}", format_args!($($arg)*))
    };
}

/// No-op version when debug-raycast feature is disabled.
#[allow(unused_macros)]
#[cfg(not(feature = "debug-raycast"))]
macro_rules! debug_raycast {
    ($($arg:tt)*) => {};
}

pub mod batch;
pub mod cull;
mod error;
pub mod intersect;
mod ray;
mod scene;
mod settings;
pub mod strategy;
mod triangulate;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use batch::{ComputeBackend, DeviceOutput, HitMatrix, HostBackend, PairList};
pub use cull::BoundingCircle;
pub use error::{RaycastError, Result};
pub use ray::Ray;
pub use scene::{mesh_hit, SceneGeometry};
pub use settings::RaycastSettings;
pub use strategy::{
    BatchedPipeline, CulledParallelScan, SequentialScan, Strategy, TaskParallelBruteForce,
};
pub use triangulate::{triangulate, Triangle};

#[cfg(feature = "gpu")]
pub use gpu::WgpuBackend;
