/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// A projected point: screen coordinates plus normalised depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Normalised device depth in [-1, 1], smaller is nearer
    pub depth: f32,
}

/// Perspective camera looking at the cube from slightly above
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view, radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.5, 4.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 25f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a model-space point into a `width` x `height` viewport.
    /// Returns `None` for points outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: usize,
        height: usize,
    ) -> Option<ScreenPoint> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;

        // transform_point performs the perspective divide
        let ndc = mvp.transform_point(point);
        if !ndc.coords.iter().all(|c| c.is_finite()) {
            return None;
        }
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 || ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: ndc.z,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}
