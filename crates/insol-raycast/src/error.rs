//! Error types for ray casting.

use thiserror::Error;

/// Errors that can occur while counting ray hits.
#[derive(Error, Debug)]
pub enum RaycastError {
    /// Invalid settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A compute backend reported a failure.
    #[error("compute backend failed: {0}")]
    Backend(String),

    /// A read-back produced a different number of elements than requested.
    #[error("read-back returned {actual} elements, expected {expected}")]
    ReadBack {
        /// Number of elements requested.
        expected: usize,
        /// Number of elements returned.
        actual: usize,
    },

    /// The wgpu backend failed.
    #[cfg(feature = "gpu")]
    #[error(transparent)]
    Gpu(#[from] insol_gpu::GpuError),
}

/// Result type for ray casting operations.
pub type Result<T> = std::result::Result<T, RaycastError>;
