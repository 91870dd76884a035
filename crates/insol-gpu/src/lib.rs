//! wgpu compute plumbing for insol.
//!
//! This crate owns the process-wide device/queue pair and the small set of
//! operations the ray-casting kernels need from it:
//! - Device context creation ([`GpuContext`])
//! - Turning wgpu validation failures into [`GpuError`]s ([`validated`])
//! - Size-checked storage buffer creation and bounded-range read-back

#![warn(missing_docs)]

mod buffers;
mod context;
mod error;

pub use buffers::{read_u32_range, storage_buffer_init, uniform_buffer_init, zeroed_storage_buffer};
pub use context::{validated, GpuContext};
pub use error::{GpuError, Result};
