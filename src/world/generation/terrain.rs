use crate::config::{ShapingConfig, ViewerConfig};

use super::biome::{BiomePalette, Rgb};
use super::noise_field::{create_noise_field, NoiseField};

/// Remaps raw noise height into world elevation
///
/// Three bands: heights above the cliff threshold are compressed
/// logarithmically (plus a linear lift above the high threshold), heights
/// below the valley threshold are dug down with a power law, and the middle
/// band passes through. The result is multiplied by `vertical_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightShaper {
    params: ShapingConfig,
}

impl Default for HeightShaper {
    fn default() -> Self {
        Self::new(ShapingConfig::default())
    }
}

impl HeightShaper {
    pub fn new(params: ShapingConfig) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ShapingConfig {
        &self.params
    }

    /// Shaped height before vertical scaling
    pub fn shape(&self, height: f32) -> f32 {
        let p = &self.params;

        if height > p.cliff_threshold {
            let k = p.cliff_compression;
            let mut shaped = p.cliff_threshold + (1.0 + (height - p.cliff_threshold) * k).ln() / k;
            if height > p.high_threshold {
                shaped += (height - p.high_threshold) * p.high_slope;
            }
            shaped
        } else if height < p.valley_threshold {
            let depth = height.max(0.0) / p.valley_threshold;
            p.valley_threshold * depth.powf(1.0 / p.valley_exponent)
        } else {
            height
        }
    }

    /// Shaped height in world elevation units
    pub fn noise_mod(&self, height: f32) -> f32 {
        self.shape(height) * self.params.vertical_scale
    }
}

/// Noise field plus the shaping and coloring applied to its samples
///
/// Immutable after construction and `Sync`, so chunk builds can share one
/// generator across threads.
pub struct TerrainGenerator {
    field: Box<dyn NoiseField>,
    shaper: HeightShaper,
    palette: BiomePalette,
}

impl TerrainGenerator {
    pub fn new(field: Box<dyn NoiseField>, shaper: HeightShaper, palette: BiomePalette) -> Self {
        Self {
            field,
            shaper,
            palette,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        log::info!(
            "[TerrainGenerator::from_config] Noise: {:?}, seed: {}, octaves: {}",
            config.world.noise,
            config.world.seed,
            config.noise.octaves
        );
        Self::new(
            create_noise_field(config.world.noise, config.world.seed, &config.noise),
            HeightShaper::new(config.shaping),
            BiomePalette::from_config(&config.palette),
        )
    }

    /// Raw height at world position
    pub fn height(&self, world_x: f32, world_z: f32) -> f32 {
        self.field.sample(world_x, world_z)
    }

    pub fn noise_mod(&self, height: f32) -> f32 {
        self.shaper.noise_mod(height)
    }

    /// Shaped elevation at world position
    pub fn elevation(&self, world_x: f32, world_z: f32) -> f32 {
        self.noise_mod(self.height(world_x, world_z))
    }

    pub fn color(&self, height: f32) -> Rgb {
        self.palette.color_from_height(height)
    }

    /// Elevation under a render-space position
    pub fn ground_height(&self, render_x: f32, render_z: f32, world_scale: f32) -> f32 {
        self.elevation(render_x / world_scale, render_z / world_scale)
    }

    pub fn shaper(&self) -> &HeightShaper {
        &self.shaper
    }

    pub fn palette(&self) -> &BiomePalette {
        &self.palette
    }
}
