//! WGSL sources for the two ray-casting kernels.

/// Stage 1: bounding-circle test per (ray, mesh) pair.
pub const CIRCLE_CULL_SHADER: &str = include_str!("circle_cull.wgsl");

/// Stage 2: Möller–Trumbore test per (ray, triangle) pair.
pub const TRIANGLE_TEST_SHADER: &str = include_str!("triangle_test.wgsl");
