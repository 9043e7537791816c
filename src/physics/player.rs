//! Player entity and the per-tick movement integrator

use cgmath::{Vector3, Zero};

use crate::config::PlayerConfig;
use crate::constants::physics_constants::MAX_PITCH;
use crate::input::TickInput;
use crate::world::TerrainGenerator;

use super::Vec3;

/// Wrap an angle into `[0, 360)`
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamp pitch into `[-90, 90]`
pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-MAX_PITCH, MAX_PITCH)
}

/// View orientation in degrees; yaw 0 looks down -Z
///
/// Roll is carried and kept wrapped but nothing drives it yet, and the
/// camera ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotation {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self {
            pitch: clamp_pitch(pitch),
            yaw: wrap_degrees(yaw),
            roll: wrap_degrees(roll),
        }
    }

    /// Add a look delta, then clamp pitch and wrap yaw and roll
    pub fn apply_delta(&mut self, delta_pitch: f32, delta_yaw: f32) {
        self.pitch = clamp_pitch(self.pitch + delta_pitch);
        self.yaw = wrap_degrees(self.yaw + delta_yaw);
        self.roll = wrap_degrees(self.roll);
    }
}

/// The controlled camera body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    /// Render-space position (world units times world scale)
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Rotation,
    pub on_ground: bool,
}

impl Entity {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vector3::zero(),
            rotation: Rotation::default(),
            on_ground: false,
        }
    }

    /// Entity at `spawn`, lifted onto the terrain if it would start underground
    pub fn spawn(spawn: [f32; 3], terrain: &TerrainGenerator, world_scale: f32) -> Self {
        let ground = terrain.ground_height(spawn[0], spawn[2], world_scale);
        let mut entity = Self::new(Vector3::new(spawn[0], spawn[1].max(ground), spawn[2]));
        entity.on_ground = entity.position.y <= ground;
        entity
    }
}

/// What a tick changed beyond the entity itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub pause_toggled: bool,
    pub paused: bool,
}

/// Fixed-tick movement integrator
///
/// Carries the state that must survive between ticks: the previous tick's
/// ground contact for jump gating and the previous Escape state for edge
/// detection. Jumping is allowed on the ground, for one tick after leaving
/// it, or at any time while the fly modifier is held.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: PlayerConfig,
    was_on_ground: bool,
    pause_key_was_down: bool,
    paused: bool,
}

impl PlayerController {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            was_on_ground: false,
            pause_key_was_down: false,
            paused: false,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance the entity by one fixed tick
    ///
    /// Order: pause edge, intents and look (skipped while paused), gravity,
    /// position integration, damping, ground clamp at the new position.
    pub fn tick(
        &mut self,
        entity: &mut Entity,
        input: &TickInput,
        terrain: &TerrainGenerator,
        world_scale: f32,
    ) -> TickOutcome {
        let pause_toggled = input.pause && !self.pause_key_was_down;
        self.pause_key_was_down = input.pause;
        if pause_toggled {
            self.paused = !self.paused;
            log::info!(
                "[PlayerController::tick] {}",
                if self.paused { "Paused" } else { "Resumed" }
            );
        }

        let ground = terrain.ground_height(entity.position.x, entity.position.z, world_scale);
        let on_ground = entity.position.y <= ground;
        let can_jump = on_ground || self.was_on_ground || input.fly;
        self.was_on_ground = on_ground;

        if !self.paused {
            self.apply_movement(entity, input, can_jump);
            entity.rotation.apply_delta(
                -input.look_delta.1 * self.config.look_speed,
                -input.look_delta.0 * self.config.look_speed,
            );
        }

        entity.velocity.y += self.config.gravity;
        entity.position += entity.velocity;

        let horizontal_damping = if on_ground {
            self.config.ground_damping
        } else {
            self.config.air_damping
        };
        entity.velocity.x *= horizontal_damping;
        entity.velocity.z *= horizontal_damping;
        entity.velocity.y *= self.config.vertical_damping;

        let ground = terrain.ground_height(entity.position.x, entity.position.z, world_scale);
        if entity.position.y < ground {
            entity.position.y = ground;
            entity.velocity.y = 0.0;
        }
        entity.on_ground = entity.position.y <= ground;

        TickOutcome {
            pause_toggled,
            paused: self.paused,
        }
    }

    fn apply_movement(&self, entity: &mut Entity, input: &TickInput, can_jump: bool) {
        let (forward, strafe) = normalize_intent(input.forward, input.strafe);

        let speed = if input.sprint && input.forward > 0.0 {
            self.config.sprint_speed
        } else {
            self.config.move_speed
        };

        let (sin_yaw, cos_yaw) = entity.rotation.yaw.to_radians().sin_cos();
        entity.velocity.x += (sin_yaw * -forward + cos_yaw * strafe) * speed;
        entity.velocity.z += (cos_yaw * -forward - sin_yaw * strafe) * speed;

        if input.jump && can_jump {
            entity.velocity.y += self.config.jump_speed;
        }
        if input.descend {
            entity.velocity.y -= self.config.jump_speed;
        }
    }
}

/// Scale a horizontal intent so diagonals are no faster than a single axis
pub fn normalize_intent(forward: f32, strafe: f32) -> (f32, f32) {
    let magnitude = forward.hypot(strafe);
    if magnitude == 0.0 {
        return (0.0, 0.0);
    }
    let angle = strafe.atan2(forward);
    let magnitude = magnitude.min(1.0);
    (angle.cos() * magnitude, angle.sin() * magnitude)
}
