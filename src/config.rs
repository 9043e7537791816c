//! Viewer configuration
//!
//! All sections default to the values in `constants`, so an empty TOML file
//! (or no file at all) yields the stock world. Partial files override only
//! the keys they name.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{camera_constants, mesh, noise, palette, physics_constants, shaping, world};
use crate::error::ConfigError;

/// Which noise field backs the terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    /// Single-octave value noise
    Value,
    /// Fractal Brownian motion over value noise
    Fbm,
    /// Gradient noise from the `noise` crate
    Perlin,
}

impl NoiseKind {
    /// Grid size used when `world.world_size` is not set
    pub fn default_world_size(self) -> u32 {
        match self {
            NoiseKind::Fbm => world::WORLD_SIZE,
            NoiseKind::Value | NoiseKind::Perlin => world::WORLD_SIZE_LARGE,
        }
    }

    /// Elevation multiplier used when `shaping.vertical_scale` is not set
    pub fn default_vertical_scale(self) -> f32 {
        match self {
            NoiseKind::Fbm => shaping::VERTICAL_SCALE,
            NoiseKind::Value | NoiseKind::Perlin => shaping::VERTICAL_SCALE_LEGACY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Terrain Viewer".to_string(),
            width: camera_constants::WINDOW_WIDTH,
            height: camera_constants::WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks per side of the grid
    pub world_size: u32,
    pub seed: u32,
    pub noise: NoiseKind,
    /// Mesh chunks on the rayon pool instead of serially
    pub parallel_build: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: world::WORLD_SIZE,
            seed: world::DEFAULT_SEED,
            noise: NoiseKind::Fbm,
            parallel_build: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub base_step: f32,
    pub growth_factor: f32,
    pub max_lod: u32,
    pub half_extent: f32,
    pub world_scale: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            base_step: mesh::BASE_STEP,
            growth_factor: mesh::GROWTH_FACTOR,
            max_lod: mesh::MAX_LOD,
            half_extent: mesh::HALF_EXTENT,
            world_scale: mesh::WORLD_SCALE,
        }
    }
}

impl MeshConfig {
    /// Side length of one chunk in world units
    pub fn chunk_size(&self) -> f32 {
        self.half_extent * 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub scale: f32,
    pub octaves: u32,
    pub perlin_frequency: f64,
    pub perlin_octaves: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: noise::SCALE,
            octaves: noise::OCTAVES,
            perlin_frequency: noise::PERLIN_FREQUENCY,
            perlin_octaves: noise::PERLIN_OCTAVES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    pub cliff_threshold: f32,
    pub high_threshold: f32,
    pub valley_threshold: f32,
    pub cliff_compression: f32,
    pub high_slope: f32,
    pub valley_exponent: f32,
    pub vertical_scale: f32,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            cliff_threshold: shaping::CLIFF_THRESHOLD,
            high_threshold: shaping::HIGH_THRESHOLD,
            valley_threshold: shaping::VALLEY_THRESHOLD,
            cliff_compression: shaping::CLIFF_COMPRESSION,
            high_slope: shaping::HIGH_SLOPE,
            valley_exponent: shaping::VALLEY_EXPONENT,
            vertical_scale: shaping::VERTICAL_SCALE,
        }
    }
}

/// Seven biome bands: deep water, shallow water, sand, grass, cold, stone, snow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub thresholds: [f32; 7],
    pub colors: [[f32; 3]; 7],
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            thresholds: [
                palette::DEEP_HEIGHT,
                palette::WATER_HEIGHT,
                palette::SAND_HEIGHT,
                palette::GRASS_HEIGHT,
                palette::COLD_HEIGHT,
                palette::STONE_HEIGHT,
                palette::SNOW_HEIGHT,
            ],
            colors: [
                palette::DEEP_COLOR,
                palette::WATER_COLOR,
                palette::SAND_COLOR,
                palette::GRASS_COLOR,
                palette::COLD_COLOR,
                palette::STONE_COLOR,
                palette::SNOW_COLOR,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub tick_rate: f32,
    pub gravity: f32,
    pub move_speed: f32,
    pub sprint_speed: f32,
    pub jump_speed: f32,
    pub look_speed: f32,
    pub ground_damping: f32,
    pub air_damping: f32,
    pub vertical_damping: f32,
    pub spawn: [f32; 3],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_rate: physics_constants::TICK_RATE,
            gravity: physics_constants::GRAVITY,
            move_speed: physics_constants::MOVE_SPEED,
            sprint_speed: physics_constants::SPRINT_SPEED,
            jump_speed: physics_constants::JUMP_SPEED,
            look_speed: physics_constants::LOOK_SPEED,
            ground_damping: physics_constants::GROUND_DAMPING,
            air_damping: physics_constants::AIR_DAMPING,
            vertical_damping: physics_constants::VERTICAL_DAMPING,
            spawn: [0.0, 0.0, 0.0],
        }
    }
}

impl PlayerConfig {
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub view_distance: f32,
    pub view_distance_step: f32,
    pub znear: f32,
    pub zfar: f32,
    pub eye_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: camera_constants::FOV,
            view_distance: camera_constants::VIEW_DISTANCE,
            view_distance_step: camera_constants::VIEW_DISTANCE_STEP,
            znear: camera_constants::ZNEAR,
            zfar: camera_constants::ZFAR,
            eye_height: camera_constants::EYE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// WGSL file replacing the built-in terrain shader
    pub shader_path: Option<PathBuf>,
    pub clear_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shader_path: None,
            clear_color: [0.5, 0.8, 1.0],
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub world: WorldConfig,
    pub mesh: MeshConfig,
    pub noise: NoiseConfig,
    pub shaping: ShapingConfig,
    pub palette: PaletteConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl ViewerConfig {
    /// Stock configuration for a noise variant
    ///
    /// The single-octave variants were tuned for a larger, taller world than
    /// fbm, so the grid size and vertical scale follow the variant.
    pub fn for_noise(noise: NoiseKind) -> Self {
        let mut config = Self::default();
        config.world.noise = noise;
        config.world.world_size = noise.default_world_size();
        config.shaping.vertical_scale = noise.default_vertical_scale();
        config
    }

    /// Parse a TOML document and validate it
    ///
    /// `world.world_size` and `shaping.vertical_scale` fall back to the
    /// selected noise variant's defaults when the document leaves them out.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(raw)?;
        let mut config: ViewerConfig = toml::from_str(raw)?;

        let is_set = |section: &str, key: &str| {
            table
                .get(section)
                .and_then(|section| section.get(key))
                .is_some()
        };
        let noise = config.world.noise;
        if !is_set("world", "world_size") {
            config.world.world_size = noise.default_world_size();
        }
        if !is_set("shaping", "vertical_scale") {
            config.shaping.vertical_scale = noise.default_vertical_scale();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("[ViewerConfig::load] Loaded config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Defaults when no path is given, otherwise the parsed file
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("[ViewerConfig::load_or_default] No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.world_size == 0 {
            return Err(ConfigError::invalid("world.world_size", "must be at least 1"));
        }
        if !(self.mesh.base_step > 0.0) {
            return Err(ConfigError::invalid("mesh.base_step", "must be positive"));
        }
        if !(self.mesh.growth_factor >= 1.0) {
            return Err(ConfigError::invalid("mesh.growth_factor", "must be at least 1.0"));
        }
        if !(self.mesh.half_extent > 0.0) {
            return Err(ConfigError::invalid("mesh.half_extent", "must be positive"));
        }
        if !(self.mesh.world_scale > 0.0) {
            return Err(ConfigError::invalid("mesh.world_scale", "must be positive"));
        }
        if self.noise.octaves == 0 || self.noise.octaves > noise::MAX_OCTAVES {
            return Err(ConfigError::invalid(
                "noise.octaves",
                format!("must be within 1..={}", noise::MAX_OCTAVES),
            ));
        }
        if self.noise.perlin_octaves == 0 || self.noise.perlin_octaves > noise::MAX_OCTAVES {
            return Err(ConfigError::invalid(
                "noise.perlin_octaves",
                format!("must be within 1..={}", noise::MAX_OCTAVES),
            ));
        }
        if !(self.player.tick_rate > 0.0) {
            return Err(ConfigError::invalid("player.tick_rate", "must be positive"));
        }
        if self.palette.thresholds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::invalid(
                "palette.thresholds",
                "must be strictly increasing",
            ));
        }
        let shaping = &self.shaping;
        if !(shaping.valley_threshold < shaping.cliff_threshold
            && shaping.cliff_threshold <= shaping.high_threshold)
        {
            return Err(ConfigError::invalid(
                "shaping",
                "thresholds must satisfy valley < cliff <= high",
            ));
        }
        if !(shaping.cliff_compression > 0.0) || !(shaping.valley_exponent > 0.0) {
            return Err(ConfigError::invalid(
                "shaping",
                "cliff_compression and valley_exponent must be positive",
            ));
        }
        Ok(())
    }
}
