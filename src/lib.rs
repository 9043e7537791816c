//! Procedural terrain viewer
//!
//! Builds a square grid of LOD height-field chunks from a seeded noise field
//! and flies a gravity-bound camera over it at a fixed tick rate.

pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod simulation;
pub mod world;

use anyhow::Result;
use winit::event_loop::{EventLoop, EventLoopBuilder};

pub use camera::{CameraData, CameraUniform, RenderContext};
pub use config::ViewerConfig;
pub use error::{ConfigError, EngineError, EngineResult};
pub use input::{Action, InputState, KeyCode, TickInput};
pub use physics::{Entity, FixedTimestep, PlayerController};
pub use renderer::Vertex;
pub use simulation::{FrameUpdate, Simulation};
pub use world::{Chunk, ChunkMesher, TerrainGenerator, WorldGrid};

/// Owns the event loop until `run` hands it to the renderer
pub struct Engine {
    config: ViewerConfig,
    event_loop: EventLoop<()>,
}

impl Engine {
    pub fn new(config: ViewerConfig) -> EngineResult<Self> {
        // Force X11 backend for WSL compatibility
        #[cfg(target_os = "linux")]
        let event_loop = {
            use winit::platform::x11::EventLoopBuilderExtX11;
            EventLoopBuilder::new().with_x11().build()
        };

        #[cfg(not(target_os = "linux"))]
        let event_loop = EventLoopBuilder::new().build();

        let event_loop = event_loop.map_err(|e| EngineError::WindowCreation(e.to_string()))?;

        Ok(Self { config, event_loop })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn run(self) -> Result<()> {
        renderer::run(self.event_loop, self.config)
    }
}
