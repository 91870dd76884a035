//! Mesh faces to triangle soup.

use insol_geom::{Mesh, MeshFace, Point3};

use crate::intersect::intersect_triangle;
use crate::Ray;

/// A triangle copied out of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corner positions in face winding order.
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Create a triangle from its three corners.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Ray parameter of the hit, if the ray hits this triangle.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let [a, b, c] = &self.vertices;
        intersect_triangle(ray, a, b, c)
    }
}

/// Split every face of `mesh` into triangles.
///
/// A triangle face `(A, B, C)` yields itself; a quad `(A, B, C, D)` yields
/// `(A, B, C)` followed by `(A, C, D)`. Output follows face order. A face
/// referencing a missing vertex is dropped entirely.
pub fn triangulate(mesh: &Mesh) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(mesh.num_faces() * 2);

    for face in &mesh.faces {
        match *face {
            MeshFace::Triangle(idx) => {
                if let Some([a, b, c]) = corners(mesh, idx) {
                    triangles.push(Triangle::new(a, b, c));
                }
            }
            MeshFace::Quad(idx) => {
                if let Some([a, b, c, d]) = corners(mesh, idx) {
                    triangles.push(Triangle::new(a, b, c));
                    triangles.push(Triangle::new(a, c, d));
                }
            }
        }
    }

    triangles
}

/// Look up all corners of a face, or `None` if any index is out of range.
fn corners<const N: usize>(mesh: &Mesh, indices: [u32; N]) -> Option<[Point3; N]> {
    let mut points = [Point3::origin(); N];
    for (slot, &index) in points.iter_mut().zip(indices.iter()) {
        *slot = mesh.vertex(index)?;
    }
    Some(points)
}
