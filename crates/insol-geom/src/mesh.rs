//! Polygon meshes made of triangle and quad faces.

use serde::{Deserialize, Serialize};

use crate::{Aabb3, Point3};

/// A mesh face referencing three or four vertex indices.
///
/// Serialized as a bare index array: `[a, b, c]` or `[a, b, c, d]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub enum MeshFace {
    /// Triangle `(a, b, c)`.
    Triangle([u32; 3]),
    /// Quad `(a, b, c, d)`, split along the `a`-`c` diagonal when triangulated.
    Quad([u32; 4]),
}

impl MeshFace {
    /// Triangle face.
    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self::Triangle([a, b, c])
    }

    /// Quad face. A quad whose last two indices coincide is a triangle.
    pub fn quad(a: u32, b: u32, c: u32, d: u32) -> Self {
        if c == d {
            Self::Triangle([a, b, c])
        } else {
            Self::Quad([a, b, c, d])
        }
    }

    /// `true` for a four-sided face.
    pub fn is_quad(&self) -> bool {
        matches!(self, Self::Quad(_))
    }

    /// The referenced vertex indices in face order.
    pub fn indices(&self) -> &[u32] {
        match self {
            Self::Triangle(idx) => idx,
            Self::Quad(idx) => idx,
        }
    }
}

impl TryFrom<Vec<u32>> for MeshFace {
    type Error = String;

    fn try_from(indices: Vec<u32>) -> Result<Self, Self::Error> {
        match indices[..] {
            [a, b, c] => Ok(Self::triangle(a, b, c)),
            [a, b, c, d] => Ok(Self::quad(a, b, c, d)),
            _ => Err(format!(
                "face must reference 3 or 4 vertices, got {}",
                indices.len()
            )),
        }
    }
}

impl From<MeshFace> for Vec<u32> {
    fn from(face: MeshFace) -> Self {
        face.indices().to_vec()
    }
}

/// An indexed polygon mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Faces indexing into `vertices`.
    pub faces: Vec<MeshFace>,
}

impl Mesh {
    /// Create a mesh from vertices and faces.
    pub fn new(vertices: Vec<Point3>, faces: Vec<MeshFace>) -> Self {
        Self { vertices, faces }
    }

    /// Vertex at `index`, or `None` when the index is out of range.
    #[inline]
    pub fn vertex(&self, index: u32) -> Option<Point3> {
        self.vertices.get(index as usize).copied()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned box between `min` and `max` as six outward-facing quads.
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        let vertices = vec![
            Point3::new(x0, y0, z0),
            Point3::new(x1, y0, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x0, y1, z0),
            Point3::new(x0, y0, z1),
            Point3::new(x1, y0, z1),
            Point3::new(x1, y1, z1),
            Point3::new(x0, y1, z1),
        ];
        let faces = vec![
            MeshFace::quad(0, 3, 2, 1), // bottom
            MeshFace::quad(4, 5, 6, 7), // top
            MeshFace::quad(0, 1, 5, 4), // front
            MeshFace::quad(2, 3, 7, 6), // back
            MeshFace::quad(0, 4, 7, 3), // left
            MeshFace::quad(1, 2, 6, 5), // right
        ];
        Self::new(vertices, faces)
    }

    /// Axis-aligned bounding box over all vertices.
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_quad_becomes_triangle() {
        assert_eq!(MeshFace::quad(0, 1, 2, 2), MeshFace::triangle(0, 1, 2));
        assert!(MeshFace::quad(0, 1, 2, 3).is_quad());
    }

    #[test]
    fn test_vertex_out_of_range() {
        let mesh = Mesh::new(vec![Point3::origin()], vec![MeshFace::triangle(0, 1, 2)]);
        assert_eq!(mesh.vertex(0), Some(Point3::origin()));
        assert_eq!(mesh.vertex(1), None);
    }

    #[test]
    fn test_face_json_shape() {
        let json = r#"{
            "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]],
            "faces": [[0, 1, 2], [0, 1, 2, 3]]
        }"#;
        let mesh: Mesh = serde_json::from_str(json).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces[0], MeshFace::triangle(0, 1, 2));
        assert_eq!(mesh.faces[1], MeshFace::Quad([0, 1, 2, 3]));
    }

    #[test]
    fn test_face_json_normalizes_and_rejects() {
        let face: MeshFace = serde_json::from_str("[4, 5, 6, 6]").unwrap();
        assert_eq!(face, MeshFace::triangle(4, 5, 6));
        assert!(serde_json::from_str::<MeshFace>("[1, 2]").is_err());
        assert!(serde_json::from_str::<MeshFace>("[1, 2, 3, 4, 5]").is_err());
        assert_eq!(serde_json::to_string(&face).unwrap(), "[4,5,6]");
    }

    #[test]
    fn test_cuboid() {
        let mesh = Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 3.0, 1.0));
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.num_faces(), 6);
        assert!(mesh.faces.iter().all(MeshFace::is_quad));

        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Point3::new(2.0, 3.0, 1.0));
    }
}
