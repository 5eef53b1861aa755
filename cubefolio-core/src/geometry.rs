/// Geometry for drawing the menu cube
use nalgebra::{Point3, Vector3};

use crate::transform::Face;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle tagged with the cube face it belongs to
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub face: Face,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex, face: Face) -> Self {
        Self {
            vertices: [v0, v1, v2],
            face,
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Cube of edge `size` centred on the origin, two counter-clockwise
    /// triangles per face
    pub fn menu_cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Front-face quad, mapped onto each face in turn
        let corners = [
            Point3::new(-half, -half, half),
            Point3::new(half, -half, half),
            Point3::new(half, half, half),
            Point3::new(-half, half, half),
        ];

        for face in Face::ALL {
            let to_local = face.to_local();
            let normal = face.normal();
            let [a, b, c, d] = corners.map(|corner| Vertex::new(to_local.transform_point(&corner), normal));

            mesh.add_triangle(Triangle::new(a, b, c, face));
            mesh.add_triangle(Triangle::new(a, c, d, face));
        }

        mesh
    }
}
