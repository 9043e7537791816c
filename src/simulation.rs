//! Per-frame simulation phase
//!
//! Banks frame time and runs zero or more fixed ticks before the frame is
//! rendered. Each tick takes its own input snapshot, adjusts the view
//! distance and advances the player.

use crate::config::ViewerConfig;
use crate::input::InputState;
use crate::physics::{Entity, FixedTimestep, PlayerController};
use crate::world::TerrainGenerator;

/// Summary of one frame's worth of ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    pub ticks: u32,
    /// Pause flipped an odd number of times this frame
    pub pause_changed: bool,
    pub paused: bool,
}

pub struct Simulation {
    entity: Entity,
    controller: PlayerController,
    timestep: FixedTimestep,
    world_scale: f32,
    view_distance: f32,
    view_distance_step: f32,
}

impl Simulation {
    pub fn new(config: &ViewerConfig, terrain: &TerrainGenerator) -> Self {
        let entity = Entity::spawn(config.player.spawn, terrain, config.mesh.world_scale);
        log::info!(
            "[Simulation::new] Spawned at ({:.2}, {:.2}, {:.2}), {} ticks/s",
            entity.position.x,
            entity.position.y,
            entity.position.z,
            config.player.tick_rate
        );

        Self {
            entity,
            controller: PlayerController::new(config.player),
            timestep: FixedTimestep::from_rate(config.player.tick_rate),
            world_scale: config.mesh.world_scale,
            view_distance: config.camera.view_distance,
            view_distance_step: config.camera.view_distance_step,
        }
    }

    /// Run every tick that fits in `frame_delta` plus the banked remainder
    pub fn advance(
        &mut self,
        frame_delta: f32,
        input: &mut InputState,
        terrain: &TerrainGenerator,
    ) -> FrameUpdate {
        let mut update = FrameUpdate {
            paused: self.controller.is_paused(),
            ..FrameUpdate::default()
        };

        let Self {
            entity,
            controller,
            timestep,
            world_scale,
            view_distance,
            view_distance_step,
        } = self;

        update.ticks = timestep.advance(frame_delta, |_| {
            let tick_input = input.take_tick_input();

            *view_distance =
                (*view_distance + tick_input.view_distance * *view_distance_step).max(0.0);

            let outcome = controller.tick(entity, &tick_input, terrain, *world_scale);
            if outcome.pause_toggled {
                update.pause_changed = !update.pause_changed;
            }
            update.paused = outcome.paused;
        });

        log::trace!(
            "[Simulation::advance] {} ticks, position ({:.3}, {:.3}, {:.3})",
            update.ticks,
            self.entity.position.x,
            self.entity.position.y,
            self.entity.position.z
        );

        update
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn view_distance(&self) -> f32 {
        self.view_distance
    }

    pub fn is_paused(&self) -> bool {
        self.controller.is_paused()
    }
}
