//! Data-Oriented Camera
//!
//! Plain data plus free functions. The camera is derived from the player
//! entity once per rendered frame; nothing here mutates simulation state.

use bytemuck::{Pod, Zeroable};
use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

use crate::config::CameraConfig;
use crate::physics::Entity;

/// Surface dimensions, owned by the GPU state and updated on resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Apply a resize; zero-sized surfaces (minimized windows) are ignored
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }
}

/// Camera data as a plain old data structure
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraData {
    pub position: [f32; 3],
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

/// Camera uniform buffer for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_matrix: [[f32; 4]; 4],
    pub projection_matrix: [[f32; 4]; 4],
    pub view_projection_matrix: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub view_distance: f32,
}

/// Camera at the entity's eye
pub fn camera_from_entity(entity: &Entity, config: &CameraConfig) -> CameraData {
    CameraData {
        position: [
            entity.position.x,
            entity.position.y + config.eye_height,
            entity.position.z,
        ],
        yaw_degrees: entity.rotation.yaw,
        pitch_degrees: entity.rotation.pitch,
        fovy_degrees: config.fov,
        znear: config.znear,
        zfar: config.zfar,
    }
}

/// Calculate forward vector from camera orientation; yaw 0 looks down -Z
pub fn calculate_forward_vector(yaw_degrees: f32, pitch_degrees: f32) -> Vector3<f32> {
    let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
    let (sin_pitch, cos_pitch) = pitch_degrees.to_radians().sin_cos();

    Vector3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
}

/// Build view matrix from camera data
pub fn build_view_matrix(camera: &CameraData) -> Matrix4<f32> {
    let position = Point3::new(camera.position[0], camera.position[1], camera.position[2]);
    let forward = calculate_forward_vector(camera.yaw_degrees, camera.pitch_degrees);

    // Looking straight up or down makes the up vector parallel to forward
    let up = if forward.y.abs() > 0.9999 {
        let (sin_yaw, cos_yaw) = camera.yaw_degrees.to_radians().sin_cos();
        Vector3::new(-sin_yaw, 0.0, -cos_yaw) * -forward.y.signum()
    } else {
        Vector3::unit_y()
    };

    Matrix4::look_at_rh(position, position + forward, up)
}

/// Build projection matrix from camera data and the current surface size
pub fn build_projection_matrix(camera: &CameraData, context: &RenderContext) -> Matrix4<f32> {
    perspective(
        Deg(camera.fovy_degrees),
        context.aspect_ratio(),
        camera.znear,
        camera.zfar,
    )
}

/// Build camera uniform buffer for GPU
pub fn build_camera_uniform(
    camera: &CameraData,
    context: &RenderContext,
    view_distance: f32,
) -> CameraUniform {
    let view = build_view_matrix(camera);
    let proj = build_projection_matrix(camera, context);
    let view_proj = proj * view;

    CameraUniform {
        view_matrix: view.into(),
        projection_matrix: proj.into(),
        view_projection_matrix: view_proj.into(),
        position: camera.position,
        view_distance,
    }
}
