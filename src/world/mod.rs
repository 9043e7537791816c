//! Terrain world
//!
//! - **Generation**: noise fields, height shaping and the biome palette
//! - **Chunk**: immutable per-region vertex data
//! - **Mesher**: LOD-aware height-field triangulation
//! - **Grid**: the eagerly built chunk grid and view culling

pub mod chunk;
pub mod generation;
pub mod grid;
pub mod mesher;

pub use chunk::Chunk;
pub use generation::{
    create_noise_field, BiomePalette, FbmField, HeightShaper, NoiseField, PerlinField,
    TerrainGenerator, ValueNoiseField,
};
pub use grid::{chunk_lod, is_chunk_visible, ChunkCoord, WorldGrid};
pub use mesher::{cells_per_axis, lod_step, vertex_count, ChunkMesher};
