//! Device buffer sets for the two ray-casting kernels.

use bytemuck::{Pod, Zeroable};
use insol_gpu::{
    read_u32_range, storage_buffer_init, uniform_buffer_init, validated, zeroed_storage_buffer,
    GpuContext,
};

use crate::batch::DeviceOutput;
use crate::error::{RaycastError, Result};

/// Invocations per workgroup; must match `@workgroup_size` in both shaders.
pub const WORKGROUP_SIZE: u32 = 64;

/// Largest workgroup count wgpu accepts in one dispatch dimension.
pub const MAX_WORKGROUPS_PER_DIM: u32 = 65_535;

/// Uniform metadata shared by both kernels.
///
/// Stage 1: `(mesh_count, ray_count)`. Stage 2: `(pair_count, pair_count)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct BatchParams {
    /// First metadata value.
    pub primary_count: u32,
    /// Second metadata value.
    pub secondary_count: u32,
    /// Pads the struct to 16 bytes for uniform layout.
    pub _padding: [u32; 2],
}

impl BatchParams {
    /// Convert host-side counts, failing if either exceeds `u32`.
    pub fn new([primary, secondary]: [usize; 2]) -> Result<Self> {
        let to_u32 = |n: usize| {
            u32::try_from(n)
                .map_err(|_| RaycastError::Backend(format!("count {n} exceeds kernel index range")))
        };
        Ok(Self {
            primary_count: to_u32(primary)?,
            secondary_count: to_u32(secondary)?,
            _padding: [0; 2],
        })
    }
}

/// Concatenate equally long arrays into one planar buffer; array `k` lands
/// at `[k * n, (k + 1) * n)`.
///
/// An empty result holds a single zero so the buffer can still be bound.
pub fn planar(arrays: &[&[f32]]) -> Vec<f32> {
    let mut data: Vec<f32> = arrays.iter().flat_map(|a| a.iter().copied()).collect();
    if data.is_empty() {
        data.push(0.0);
    }
    data
}

/// Workgroup grid covering `items` invocations.
///
/// Counts above [`MAX_WORKGROUPS_PER_DIM`] fold into the Y dimension; the
/// kernels rebuild the linear index as `x + y * num_workgroups.x * 64` and
/// discard indices past the end.
pub fn workgroup_grid(items: usize) -> (u32, u32) {
    let groups = items.div_ceil(WORKGROUP_SIZE as usize).max(1);
    let max = MAX_WORKGROUPS_PER_DIM as usize;
    if groups <= max {
        (groups as u32, 1)
    } else {
        (max as u32, groups.div_ceil(max) as u32)
    }
}

/// Inputs, metadata and output of one dispatch.
///
/// Every buffer is destroyed when this value is dropped, including when
/// the dispatch or read-back failed.
pub struct StageBuffers {
    ctx: &'static GpuContext,
    /// Planar per-ray (stage 1) or per-pair ray (stage 2) data.
    pub primary: wgpu::Buffer,
    /// Planar per-mesh circle (stage 1) or triangle (stage 2) data.
    pub secondary: wgpu::Buffer,
    /// [`BatchParams`] uniform.
    pub params: wgpu::Buffer,
    /// One `u32` flag per output element.
    pub output: wgpu::Buffer,
    len: usize,
}

impl StageBuffers {
    /// Upload both planar inputs and allocate an output of `len` flags.
    pub fn create(
        ctx: &'static GpuContext,
        label: &str,
        primary: &[f32],
        secondary: &[f32],
        params: &BatchParams,
        len: usize,
    ) -> Result<Self> {
        validated(ctx, || -> Result<Self> {
            let primary = storage_buffer_init(ctx, &format!("{label} Primary"), primary)?;
            let secondary = storage_buffer_init(ctx, &format!("{label} Secondary"), secondary)?;
            let params = uniform_buffer_init(ctx, &format!("{label} Params"), params);
            let output = zeroed_storage_buffer(ctx, &format!("{label} Output"), len.max(1))?;

            Ok(Self {
                ctx,
                primary,
                secondary,
                params,
                output,
                len,
            })
        })?
    }
}

impl Drop for StageBuffers {
    fn drop(&mut self) {
        self.primary.destroy();
        self.secondary.destroy();
        self.params.destroy();
        self.output.destroy();
    }
}

impl DeviceOutput for StageBuffers {
    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, offset: usize, len: usize) -> Result<Vec<bool>> {
        if offset + len > self.len {
            return Err(RaycastError::ReadBack {
                expected: offset + len,
                actual: self.len,
            });
        }
        let flags = read_u32_range(self.ctx, &self.output, offset, len)?;
        Ok(flags.into_iter().map(|flag| flag != 0).collect())
    }
}
