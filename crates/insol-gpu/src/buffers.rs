//! Buffer creation and read-back helpers.

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::context::{validated, GpuContext};
use crate::error::{GpuError, Result};

fn check_binding_size(ctx: &GpuContext, bytes: u64) -> Result<()> {
    let limit = ctx.max_binding_size();
    if bytes > limit {
        return Err(GpuError::BatchTooLarge { bytes, limit });
    }
    Ok(())
}

/// Upload `contents` into a read-only storage buffer.
///
/// Fails with [`GpuError::BatchTooLarge`] before touching the device if the
/// buffer could not be bound.
pub fn storage_buffer_init<T: Pod>(
    ctx: &GpuContext,
    label: &str,
    contents: &[T],
) -> Result<wgpu::Buffer> {
    check_binding_size(ctx, std::mem::size_of_val(contents) as u64)?;
    Ok(ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::STORAGE,
        }))
}

/// Create a writable storage buffer of `len` zeroed `u32` slots that can be
/// copied out for read-back.
pub fn zeroed_storage_buffer(ctx: &GpuContext, label: &str, len: usize) -> Result<wgpu::Buffer> {
    let size = (len * std::mem::size_of::<u32>()) as u64;
    check_binding_size(ctx, size)?;
    Ok(ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    }))
}

/// Upload a single plain-old-data value into a uniform buffer.
pub fn uniform_buffer_init<T: Pod>(ctx: &GpuContext, label: &str, value: &T) -> wgpu::Buffer {
    ctx.device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(value),
            usage: wgpu::BufferUsages::UNIFORM,
        })
}

/// Read `len` `u32` elements starting at element `offset` of `buffer`.
///
/// The range is copied into a staging buffer sized for this transfer only,
/// so callers bound the size of each mapping by choosing `len`.
pub fn read_u32_range(
    ctx: &GpuContext,
    buffer: &wgpu::Buffer,
    offset: usize,
    len: usize,
) -> Result<Vec<u32>> {
    if len == 0 {
        return Ok(Vec::new());
    }

    let word = std::mem::size_of::<u32>() as u64;
    let bytes = len as u64 * word;

    let staging = validated(ctx, || {
        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Read-back Staging Buffer"),
            size: bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Read-back Encoder"),
            });
        encoder.copy_buffer_to_buffer(buffer, offset as u64 * word, &staging, 0, bytes);
        ctx.queue.submit(std::iter::once(encoder.finish()));
        staging
    })?;

    let buffer_slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    ctx.device.poll(wgpu::Maintain::Wait);
    rx.recv()
        .map_err(|_| GpuError::BufferMapping)?
        .map_err(|_| GpuError::BufferMapping)?;

    let data = buffer_slice.get_mapped_range();
    let values: Vec<u32> = bytemuck::cast_slice(&data).to_vec();
    drop(data);
    staging.unmap();

    Ok(values)
}
