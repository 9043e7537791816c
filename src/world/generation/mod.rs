//! Procedural terrain generation
//!
//! Noise fields produce raw heights around 0.5, the height shaper turns them
//! into world elevation, and the biome palette turns raw heights
//! into vertex colors. `TerrainGenerator` bundles all three for the mesher
//! and the player controller.

mod biome;
mod noise_field;
mod terrain;

pub use biome::{lerp_rgb, BiomePalette, Rgb};
pub use noise_field::{
    create_noise_field, lattice_hash, value_noise, FbmField, NoiseField, PerlinField,
    ValueNoiseField,
};
pub use terrain::{HeightShaper, TerrainGenerator};
