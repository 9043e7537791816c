//! Camera derived from the player entity
//!
//! Pure data with free functions, rebuilt once per rendered frame.

pub mod data_camera;

pub use data_camera::{
    build_camera_uniform, build_projection_matrix, build_view_matrix, calculate_forward_vector,
    camera_from_entity, CameraData, CameraUniform, RenderContext,
};
