use std::path::PathBuf;

use anyhow::Context;
use terrain_viewer::{Engine, ViewerConfig};

fn main() -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        eprintln!("Logger already initialized: {}", e);
    }

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ViewerConfig::load_or_default(config_path.as_deref())
        .context("Failed to load viewer configuration")?;

    log::info!(
        "Starting terrain viewer: {}x{} chunks, seed {}, {:?} noise",
        config.world.world_size,
        config.world.world_size,
        config.world.seed,
        config.world.noise
    );

    let engine = Engine::new(config)?;
    engine.run()
}
