//! Ray-primitive intersection algorithms.

mod triangle;

pub use triangle::intersect_triangle;

/// Tolerance shared by the parallel test and the forward-distance test.
pub const EPSILON: f64 = 1e-6;
