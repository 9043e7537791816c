pub mod integration;
pub mod player;

pub use integration::FixedTimestep;
pub use player::{
    clamp_pitch, normalize_intent, wrap_degrees, Entity, PlayerController, Rotation, TickOutcome,
};

use cgmath::Vector3;

pub type Vec3 = Vector3<f32>;
