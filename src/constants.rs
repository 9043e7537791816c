// Terrain Viewer Constants - default tuning values
//
// Every default used by the configuration layer lives here. The config
// structs copy these values; nothing else should hardcode them.

/// World grid constants
pub mod world {
    /// Chunks per side of the square world grid
    pub const WORLD_SIZE: u32 = 21;

    /// Chunks per side in the large (non-fbm) layout
    pub const WORLD_SIZE_LARGE: u32 = 125;

    /// Default noise seed
    pub const DEFAULT_SEED: u32 = 0;
}

/// Chunk meshing constants
pub mod mesh {
    /// Grid spacing at LOD 0 (world units)
    pub const BASE_STEP: f32 = 5.0;

    /// Step multiplier per LOD tier
    pub const GROWTH_FACTOR: f32 = 1.75;

    /// LOD tiers above this reuse the coarsest step
    pub const MAX_LOD: u32 = 8;

    /// Half the side length of a chunk (world units)
    pub const HALF_EXTENT: f32 = 1000.0;

    /// World units to render units
    pub const WORLD_SCALE: f32 = 0.01;

    /// Vertices emitted per grid cell (two unindexed triangles)
    pub const VERTICES_PER_CELL: usize = 6;
}

/// Noise field constants
pub mod noise {
    /// Input scale applied before octave summation
    pub const SCALE: f32 = 0.0005;

    /// fbm octave count
    pub const OCTAVES: u32 = 6;

    /// Amplitude of the first fbm octave
    pub const START_AMPLITUDE: f32 = 0.5;

    /// Value-noise hash constants: fract(sin(ix*A + iz*B) * C)
    pub const HASH_A: f64 = 12.9898;
    pub const HASH_B: f64 = 78.233;
    pub const HASH_C: f64 = 43758.5453;

    /// Seed perturbation added to the hash argument per seed unit
    pub const HASH_SEED_STEP: f64 = 0.618_033_988_75;

    /// Gradient-noise variant
    pub const PERLIN_FREQUENCY: f64 = 0.0001;
    pub const PERLIN_OCTAVES: u32 = 5;

    /// Upper bound accepted by config validation
    pub const MAX_OCTAVES: u32 = 16;
}

/// Height shaping constants
pub mod shaping {
    /// Heights above this plateau logarithmically
    pub const CLIFF_THRESHOLD: f32 = 0.6;

    /// Heights above this get an extra linear correction
    pub const HIGH_THRESHOLD: f32 = 0.7;

    /// Heights below this are dug down
    pub const VALLEY_THRESHOLD: f32 = 0.25;

    /// Steepness of the log compression above the cliff
    pub const CLIFF_COMPRESSION: f32 = 4.0;

    /// Slope of the linear correction above the high threshold
    pub const HIGH_SLOPE: f32 = 0.5;

    /// Power-law exponent of the valley dig (applied as 1/exponent)
    pub const VALLEY_EXPONENT: f32 = 0.9;

    /// Normalized height to world elevation (fbm variant)
    pub const VERTICAL_SCALE: f32 = 10.0;

    /// Normalized height to world elevation (single-octave variants)
    pub const VERTICAL_SCALE_LEGACY: f32 = 250.0;
}

/// Biome color table, lowest band first
pub mod palette {
    pub const DEEP_HEIGHT: f32 = 0.45;
    pub const WATER_HEIGHT: f32 = 0.499;
    pub const SAND_HEIGHT: f32 = 0.5;
    pub const GRASS_HEIGHT: f32 = 0.501;
    pub const COLD_HEIGHT: f32 = 0.52;
    pub const STONE_HEIGHT: f32 = 0.58;
    pub const SNOW_HEIGHT: f32 = 0.64;

    pub const DEEP_COLOR: [f32; 3] = [0.0, 0.0, 0.05];
    pub const WATER_COLOR: [f32; 3] = [0.0, 0.0, 0.25];
    pub const SAND_COLOR: [f32; 3] = [0.5, 0.5, 0.35];
    pub const GRASS_COLOR: [f32; 3] = [0.35, 0.5, 0.15];
    pub const COLD_COLOR: [f32; 3] = [0.0, 0.25, 0.15];
    pub const STONE_COLOR: [f32; 3] = [0.25, 0.25, 0.25];
    pub const SNOW_COLOR: [f32; 3] = [0.7, 0.7, 0.8];
}

/// Player physics constants - per tick, render units
pub mod physics_constants {
    /// Simulation ticks per second
    pub const TICK_RATE: f32 = 60.0;

    /// Vertical velocity change per tick
    pub const GRAVITY: f32 = -0.03;

    /// Horizontal acceleration per tick
    pub const MOVE_SPEED: f32 = 0.0075;
    pub const SPRINT_SPEED: f32 = 0.02;

    /// Vertical impulse of a jump
    pub const JUMP_SPEED: f32 = 0.3;

    /// Degrees of rotation per pointer pixel
    pub const LOOK_SPEED: f32 = 0.1;

    /// Velocity multipliers applied after integration
    pub const GROUND_DAMPING: f32 = 0.9;
    pub const AIR_DAMPING: f32 = 0.95;
    pub const VERTICAL_DAMPING: f32 = 0.95;

    /// Pitch limit in degrees
    pub const MAX_PITCH: f32 = 90.0;

    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.25;
}

/// Camera and rendering constants - render units
pub mod camera_constants {
    /// Vertical field of view in degrees
    pub const FOV: f32 = 120.0;

    /// Draw distance for chunk culling and fog
    pub const VIEW_DISTANCE: f32 = 750.0;

    /// View distance change per tick while the arrow keys are held
    pub const VIEW_DISTANCE_STEP: f32 = 5.0;

    pub const ZNEAR: f32 = 0.01;
    pub const ZFAR: f32 = 10000.0;

    /// Eye offset above the entity position
    pub const EYE_HEIGHT: f32 = 0.5;

    /// Pull-back distance used by the chunk bearing test
    pub const CULL_PULLBACK: f32 = 20.0;

    /// Fraction of the fov accepted on either side of the yaw
    pub const CULL_FOV_FRACTION: f32 = 0.667;

    pub const WINDOW_WIDTH: u32 = 1000;
    pub const WINDOW_HEIGHT: u32 = 600;
}
