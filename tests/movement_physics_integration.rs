// Movement + physics integration tests
//
// Drives the simulation through real key events and frame deltas, the same
// path the window loop uses, and checks the player against the terrain.

use cgmath::Vector3;
use terrain_viewer::{
    physics::{wrap_degrees, Entity, PlayerController},
    InputState, Simulation, TerrainGenerator, TickInput, ViewerConfig,
};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

const FRAME: f32 = 1.0 / 60.0;

fn setup() -> (ViewerConfig, TerrainGenerator) {
    let mut config = ViewerConfig::default();
    config.world.world_size = 3;
    let terrain = TerrainGenerator::from_config(&config);
    (config, terrain)
}

fn run_frames(
    simulation: &mut Simulation,
    input: &mut InputState,
    terrain: &TerrainGenerator,
    frames: usize,
) {
    for _ in 0..frames {
        simulation.advance(FRAME, input, terrain);
    }
}

#[test]
fn test_player_never_sinks_below_ground() {
    let (config, terrain) = setup();
    let mut simulation = Simulation::new(&config, &terrain);
    let mut input = InputState::new();
    let scale = config.mesh.world_scale;

    input.process_key(KeyCode::KeyW, ElementState::Pressed);
    input.process_key(KeyCode::KeyD, ElementState::Pressed);
    input.process_key(KeyCode::ShiftLeft, ElementState::Pressed);

    for _ in 0..300 {
        simulation.advance(FRAME, &mut input, &terrain);
        let position = simulation.entity().position;
        let ground = terrain.ground_height(position.x, position.z, scale);
        assert!(position.y >= ground, "fell through terrain at {:?}", position);
    }

    let position = simulation.entity().position;
    assert!(position.x.hypot(position.z) > 0.5, "player did not move");
}

#[test]
fn test_jump_then_land() {
    let (config, terrain) = setup();
    let mut simulation = Simulation::new(&config, &terrain);
    let mut input = InputState::new();
    let scale = config.mesh.world_scale;

    // Settle onto the ground first
    run_frames(&mut simulation, &mut input, &terrain, 10);
    let start = simulation.entity().position;
    let ground = terrain.ground_height(start.x, start.z, scale);
    assert_eq!(start.y, ground);

    input.process_key(KeyCode::Space, ElementState::Pressed);
    run_frames(&mut simulation, &mut input, &terrain, 1);
    input.process_key(KeyCode::Space, ElementState::Released);

    let mut peak = start.y;
    for _ in 0..120 {
        simulation.advance(FRAME, &mut input, &terrain);
        peak = peak.max(simulation.entity().position.y);
    }

    assert!(peak > start.y + 0.3, "jump peaked at {}", peak);
    assert_eq!(simulation.entity().position.y, ground);
    assert_eq!(simulation.entity().velocity.y, 0.0);
}

#[test]
fn test_fly_modifier_climbs_while_airborne() {
    let (config, terrain) = setup();
    let mut simulation = Simulation::new(&config, &terrain);
    let mut input = InputState::new();
    let scale = config.mesh.world_scale;

    run_frames(&mut simulation, &mut input, &terrain, 10);
    let start = simulation.entity().position;
    let ground = terrain.ground_height(start.x, start.z, scale);
    assert_eq!(start.y, ground);

    // Holding Space alone gives a single hop; with LeftControl it keeps climbing
    input.process_key(KeyCode::ControlLeft, ElementState::Pressed);
    input.process_key(KeyCode::Space, ElementState::Pressed);
    run_frames(&mut simulation, &mut input, &terrain, 30);
    let climbed = simulation.entity().position.y;
    assert!(climbed > ground + 10.0, "only reached {}", climbed);
    assert!(!simulation.entity().on_ground);
}

#[test]
fn test_mouse_look_wraps_yaw_and_clamps_pitch() {
    let (config, terrain) = setup();
    let mut simulation = Simulation::new(&config, &terrain);
    let mut input = InputState::new();

    // 50 px right at 0.1 deg/px turns yaw by -5 degrees
    input.process_mouse_motion((50.0, 0.0));
    run_frames(&mut simulation, &mut input, &terrain, 1);
    assert!((simulation.entity().rotation.yaw - 355.0).abs() < 1e-4);

    // Large upward motion pins pitch at the limit
    for _ in 0..20 {
        input.process_mouse_motion((0.0, -90.0));
        run_frames(&mut simulation, &mut input, &terrain, 1);
    }
    assert_eq!(simulation.entity().rotation.pitch, 90.0);

    assert_eq!(wrap_degrees(370.0), 10.0);
    assert_eq!(wrap_degrees(-10.0), 350.0);
}

#[test]
fn test_frame_rate_does_not_change_distance_travelled() {
    let (config, terrain) = setup();

    let travel = |frame_delta: f32, frames: usize| {
        let mut simulation = Simulation::new(&config, &terrain);
        let mut input = InputState::new();
        input.process_key(KeyCode::KeyW, ElementState::Pressed);
        for _ in 0..frames {
            simulation.advance(frame_delta, &mut input, &terrain);
        }
        simulation.entity().position
    };

    // One second at 60 Hz and at 30 Hz; both run exactly 60 ticks
    let fast = travel(1.0 / 60.0, 60);
    let slow = travel(1.0 / 30.0, 30);
    assert!((fast.z - slow.z).abs() < 1e-3);
    assert!(fast.z < 0.0);
}

#[test]
fn test_resting_tick_is_idempotent_with_controller_directly() {
    let (config, terrain) = setup();
    let scale = config.mesh.world_scale;
    let ground = terrain.ground_height(4.0, -2.0, scale);
    let mut entity = Entity::new(Vector3::new(4.0, ground, -2.0));
    let mut controller = PlayerController::new(config.player);

    for _ in 0..5 {
        controller.tick(&mut entity, &TickInput::default(), &terrain, scale);
        assert_eq!(entity.position, Vector3::new(4.0, ground, -2.0));
        assert_eq!(entity.velocity.y, 0.0);
    }
}
