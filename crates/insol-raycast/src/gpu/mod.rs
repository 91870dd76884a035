//! GPU compute backend using wgpu.
//!
//! Each stage uploads its structure-of-arrays batch as two planar storage
//! buffers, so a kernel binds four resources regardless of how many arrays
//! the batch carries. Output flags are `u32` since WGSL storage has no `bool`.

mod buffers;
mod pipeline;
pub mod shaders;

pub use buffers::{
    planar, workgroup_grid, BatchParams, StageBuffers, MAX_WORKGROUPS_PER_DIM, WORKGROUP_SIZE,
};
pub use pipeline::WgpuBackend;
