//! wgpu implementation of [`ComputeBackend`].

use insol_gpu::{validated, GpuContext};

use super::buffers::{planar, workgroup_grid, BatchParams, StageBuffers};
use super::shaders::{CIRCLE_CULL_SHADER, TRIANGLE_TEST_SHADER};
use crate::batch::{CircleBatch, ComputeBackend, TriangleBatch};
use crate::error::Result;

/// One compiled kernel and the layout of its four bindings.
struct Kernel {
    label: &'static str,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl Kernel {
    fn build(ctx: &GpuContext, label: &'static str, source: &str) -> Result<Self> {
        let kernel = validated(ctx, || {
            let shader_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

            let bind_group_layout =
                ctx.device
                    .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                        label: Some(label),
                        entries: &[
                            // Planar ray data
                            storage_entry(0, true),
                            // Planar circle or triangle data
                            storage_entry(1, true),
                            // BatchParams
                            wgpu::BindGroupLayoutEntry {
                                binding: 2,
                                visibility: wgpu::ShaderStages::COMPUTE,
                                ty: wgpu::BindingType::Buffer {
                                    ty: wgpu::BufferBindingType::Uniform,
                                    has_dynamic_offset: false,
                                    min_binding_size: None,
                                },
                                count: None,
                            },
                            // Output flags
                            storage_entry(3, false),
                        ],
                    });

            let pipeline_layout = ctx
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(label),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });

            let pipeline = ctx
                .device
                .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some(label),
                    layout: Some(&pipeline_layout),
                    module: &shader_module,
                    entry_point: Some("main"),
                    compilation_options: Default::default(),
                    cache: None,
                });

            Self {
                label,
                pipeline,
                bind_group_layout,
            }
        })?;
        Ok(kernel)
    }

    /// Run over `items` invocations and block until the device is idle.
    fn dispatch(&self, ctx: &GpuContext, buffers: &StageBuffers, items: usize) -> Result<()> {
        let (x, y) = workgroup_grid(items);

        validated(ctx, || {
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(self.label),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffers.primary.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers.secondary.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffers.params.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: buffers.output.as_entire_binding(),
                    },
                ],
            });

            let mut encoder = ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some(self.label),
                });
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some(self.label),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(x, y, 1);
            }

            ctx.queue.submit(Some(encoder.finish()));
        })?;

        ctx.device.poll(wgpu::Maintain::Wait);
        Ok(())
    }
}

/// Dispatches both kernels on a wgpu device.
///
/// Shaders and pipelines are compiled once in [`WgpuBackend::new`]; every
/// dispatch allocates a fresh [`StageBuffers`] set that the caller releases
/// by dropping it.
pub struct WgpuBackend {
    ctx: &'static GpuContext,
    circle_cull: Kernel,
    triangle_test: Kernel,
}

impl WgpuBackend {
    /// Compile both kernels on `ctx`.
    pub fn new(ctx: &'static GpuContext) -> Result<Self> {
        Ok(Self {
            ctx,
            circle_cull: Kernel::build(ctx, "Circle Cull", CIRCLE_CULL_SHADER)?,
            triangle_test: Kernel::build(ctx, "Triangle Test", TRIANGLE_TEST_SHADER)?,
        })
    }

    /// Initialize the global GPU context and compile both kernels.
    pub fn init() -> Result<Self> {
        Self::new(GpuContext::init_blocking()?)
    }

    /// Name of the adapter the kernels run on.
    pub fn adapter_name(&self) -> &str {
        &self.ctx.adapter_name
    }
}

impl ComputeBackend for WgpuBackend {
    type Output = StageBuffers;

    fn cull_circles(&self, batch: &CircleBatch) -> Result<StageBuffers> {
        let params = BatchParams::new(batch.meta())?;
        let buffers = StageBuffers::create(
            self.ctx,
            "Circle Cull",
            &planar(&batch.ray_arrays()),
            &planar(&batch.circle_arrays()),
            &params,
            batch.output_len(),
        )?;
        self.circle_cull
            .dispatch(self.ctx, &buffers, batch.output_len())?;
        Ok(buffers)
    }

    fn test_triangles(&self, batch: &TriangleBatch) -> Result<StageBuffers> {
        let params = BatchParams::new(batch.meta())?;
        let rays: Vec<&[f32]> = batch.rays.iter().map(Vec::as_slice).collect();
        let triangles: Vec<&[f32]> = batch.triangles.iter().map(Vec::as_slice).collect();

        let buffers = StageBuffers::create(
            self.ctx,
            "Triangle Test",
            &planar(&rays),
            &planar(&triangles),
            &params,
            batch.len(),
        )?;
        self.triangle_test.dispatch(self.ctx, &buffers, batch.len())?;
        Ok(buffers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{read_chunked, DeviceOutput, HostBackend};
    use crate::cull::BoundingCircle;
    use crate::triangulate::Triangle;
    use crate::Ray;
    use insol_geom::{Point2, Point3, Vec3};

    fn backend() -> Option<WgpuBackend> {
        WgpuBackend::init().ok()
    }

    #[test]
    #[ignore = "requires GPU"]
    fn test_cull_matches_host() {
        let Some(gpu) = backend() else {
            return;
        };
        let rays: Vec<Ray> = (0..40)
            .map(|i| {
                let a = i as f64 * 0.3;
                Ray::new(Point3::new(-3.0, 1.0, 0.0), Vec3::new(a.cos(), a.sin(), -0.5))
            })
            .collect();
        let circles: Vec<BoundingCircle> = (0..7)
            .map(|m| BoundingCircle::new(Point2::new(m as f64 * 2.0, 0.5 * m as f64), 0.75))
            .collect();
        let batch = CircleBatch::stage(&rays, &circles);

        let device = gpu.cull_circles(&batch).unwrap();
        let host = HostBackend.cull_circles(&batch).unwrap();
        assert_eq!(device.len(), 280);
        assert_eq!(
            read_chunked(&device, 64).unwrap(),
            read_chunked(&host, 64).unwrap()
        );
    }

    #[test]
    #[ignore = "requires GPU"]
    fn test_triangles_match_host() {
        let Some(gpu) = backend() else {
            return;
        };
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let rays: Vec<Ray> = (0..100)
            .map(|i| {
                let x = (i % 10) as f64 * 0.15 - 0.2;
                let y = (i / 10) as f64 * 0.15 - 0.2;
                Ray::new(Point3::new(x, y, 2.0), Vec3::new(0.0, 0.0, -1.0))
            })
            .collect();
        let batch = TriangleBatch::stage(&rays, &vec![tri; rays.len()]);

        let device = gpu.test_triangles(&batch).unwrap();
        let host = HostBackend.test_triangles(&batch).unwrap();
        assert_eq!(
            read_chunked(&device, 30).unwrap(),
            read_chunked(&host, 30).unwrap()
        );
    }
}
