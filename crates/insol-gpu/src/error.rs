//! Errors that can occur during GPU operations.

use thiserror::Error;

/// Errors that can occur during GPU operations.
#[derive(Debug, Error)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    /// GPU context was already initialized.
    #[error("GPU context already initialized")]
    AlreadyInitialized,

    /// Failed to request GPU device.
    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Buffer mapping failed.
    #[error("Buffer mapping failed")]
    BufferMapping,

    /// GPU context not initialized.
    #[error("GPU context not initialized - call GpuContext::init() first")]
    NotInitialized,

    /// Shader compilation, pipeline creation or dispatch was rejected by the device.
    #[error("GPU validation failed: {0}")]
    Validation(String),

    /// A buffer would exceed the device's storage binding limit.
    #[error("batch of {bytes} bytes exceeds the device storage binding limit of {limit} bytes")]
    BatchTooLarge {
        /// Requested buffer size.
        bytes: u64,
        /// `max_storage_buffer_binding_size` of the device.
        limit: u64,
    },
}

/// Result type for GPU operations.
pub type Result<T> = std::result::Result<T, GpuError>;
