//! Window and GPU collaborator
//!
//! Owns the winit event loop and the wgpu device. Chunk vertices are
//! uploaded once after the world build; each frame runs the simulation,
//! writes the camera uniform and draws the chunks that pass culling.

pub mod error;
pub mod frame_stats;
mod gpu_state;
mod mesh;
pub mod shader;
mod vertex;

use anyhow::Result;
use winit::event_loop::EventLoop;

use crate::config::ViewerConfig;

pub use frame_stats::{format_title, FrameStats};
pub use gpu_state::GpuState;
pub use mesh::GpuMesh;
pub use shader::{load_shader_source, TERRAIN_SHADER};
pub use vertex::Vertex;

pub fn run(event_loop: EventLoop<()>, config: ViewerConfig) -> Result<()> {
    log::info!("[renderer::run] Starting renderer initialization");
    log::debug!("[renderer::run] Config: {:?}", config);

    let result = pollster::block_on(gpu_state::run_app(event_loop, config));

    match &result {
        Ok(_) => log::info!("[renderer::run] gpu_state::run_app completed successfully"),
        Err(e) => log::error!("[renderer::run] gpu_state::run_app failed: {}", e),
    }

    result
}
