//! GPU context management for wgpu device and queue.

use std::sync::OnceLock;
use wgpu::{Device, Instance, Queue};

use crate::error::{GpuError, Result};

static GPU_CONTEXT: OnceLock<GpuContext> = OnceLock::new();

/// Global GPU context holding device and queue.
pub struct GpuContext {
    /// The wgpu device for creating resources and pipelines.
    pub device: Device,
    /// The command queue for submitting work.
    pub queue: Queue,
    /// Human-readable adapter name, for reports.
    pub adapter_name: String,
}

impl GpuContext {
    /// Initialize the GPU context asynchronously.
    ///
    /// This should be called once at application startup. Subsequent calls
    /// will return the existing context.
    pub async fn init() -> Result<&'static Self> {
        if let Some(ctx) = GPU_CONTEXT.get() {
            return Ok(ctx);
        }

        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        // Ask for everything the adapter offers: the stage-1 output grows
        // with rays x meshes and the default binding limit is small.
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("insol device"),
                    required_limits: adapter.limits(),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let adapter_name = adapter.get_info().name;

        GPU_CONTEXT
            .set(GpuContext {
                device,
                queue,
                adapter_name,
            })
            .map_err(|_| GpuError::AlreadyInitialized)?;

        GPU_CONTEXT.get().ok_or(GpuError::NotInitialized)
    }

    /// Initialize the GPU context synchronously.
    pub fn init_blocking() -> Result<&'static Self> {
        pollster::block_on(Self::init())
    }

    /// `max_storage_buffer_binding_size` of the device, in bytes.
    pub fn max_binding_size(&self) -> u64 {
        u64::from(self.device.limits().max_storage_buffer_binding_size)
    }
}

/// Run `f` inside validation and out-of-memory error scopes.
///
/// wgpu reports invalid shaders, pipelines and dispatches through the
/// uncaptured-error handler, which panics by default. Wrapping resource
/// creation and submission here turns those reports into
/// [`GpuError::Validation`] for the current call instead.
pub fn validated<T>(ctx: &GpuContext, f: impl FnOnce() -> T) -> Result<T> {
    ctx.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    let validation = pollster::block_on(ctx.device.pop_error_scope());
    let out_of_memory = pollster::block_on(ctx.device.pop_error_scope());

    match validation.or(out_of_memory) {
        Some(err) => Err(GpuError::Validation(err.to_string())),
        None => Ok(value),
    }
}
