//! # First-Person Camera
//!
//! The camera follows the player's eye position; yaw and pitch come from
//! mouse motion. This module also owns the projection and the packed
//! uniform the chunk shader consumes.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3};

use super::raycast::BlockSelection;

/// Transformation from OpenGL clip space to WGPU clip space (Z from
/// [-1, 1] to [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Mouse sensitivity, in degrees of rotation per pixel of motion.
const SENSITIVITY: f32 = 0.1;

/// Pitch clamp, to keep the view from flipping over the poles.
const MAX_PITCH: f32 = 89.0;

/// The camera's position and orientation in world space.
#[derive(Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
}

impl Camera {
    /// Creates a camera at `position`, looking along -Z.
    pub fn new(position: Point3<f32>) -> Self {
        Camera {
            position,
            yaw: Deg(-90.0),
            pitch: Deg(0.0),
        }
    }

    /// The normalized view direction.
    pub fn forward(&self) -> Vector3<f32> {
        let yaw = Rad::from(self.yaw).0;
        let pitch = Rad::from(self.pitch).0;
        Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// The view direction flattened onto the XZ plane, for walking.
    /// Falls back to -Z when looking straight up or down.
    pub fn walk_forward(&self) -> Vector3<f32> {
        let mut front = self.forward();
        front.y = 0.0;
        if front.magnitude() > 0.0 {
            front.normalize()
        } else {
            Vector3::new(0.0, 0.0, -1.0)
        }
    }

    /// The normalized rightward walking direction.
    pub fn walk_right(&self) -> Vector3<f32> {
        self.walk_forward().cross(Vector3::unit_y()).normalize()
    }

    /// Applies a mouse delta (pixels) to yaw and pitch.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += Deg(dx * SENSITIVITY);
        // Screen y grows downward; pitching up is negative dy.
        self.pitch += Deg(-dy * SENSITIVITY);

        if self.pitch > Deg(MAX_PITCH) {
            self.pitch = Deg(MAX_PITCH);
        }
        if self.pitch < Deg(-MAX_PITCH) {
            self.pitch = Deg(-MAX_PITCH);
        }
    }

    /// The view matrix for the current position and orientation.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

/// Perspective projection settings.
pub struct Projection {
    aspect: f32,
    fovy: Deg<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Projection {
            aspect: width as f32 / height.max(1) as f32,
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 5000.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// The per-frame uniform consumed by the chunk shader.
///
/// Besides the view-projection matrix it carries the selected block for the
/// highlight tint: xyz is the cell, w is the selected material ID, or -1.0
/// when nothing is selected.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub selected_block: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        CameraUniform {
            view_proj: Matrix4::identity().into(),
            selected_block: [0.0, 0.0, 0.0, -1.0],
        }
    }

    /// Packs the current camera, projection and block selection.
    pub fn update(
        &mut self,
        camera: &Camera,
        projection: &Projection,
        selection: &BlockSelection,
        selected_material: u8,
    ) {
        self.view_proj = (projection.matrix() * camera.view_matrix()).into();
        self.selected_block = match selection.hit {
            Some(cell) => [
                cell.x as f32,
                cell.y as f32,
                cell.z as f32,
                selected_material as f32,
            ],
            None => [0.0, 0.0, 0.0, -1.0],
        };
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0));
        camera.rotate(0.0, -10_000.0);
        assert_eq!(camera.pitch, Deg(MAX_PITCH));
        camera.rotate(0.0, 10_000.0);
        assert_eq!(camera.pitch, Deg(-MAX_PITCH));
    }

    #[test]
    fn walk_vectors_stay_horizontal() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0));
        camera.rotate(123.0, -456.0);
        assert_eq!(camera.walk_forward().y, 0.0);
        assert_eq!(camera.walk_right().y, 0.0);
    }
}
