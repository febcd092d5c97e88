//! Headless Lander Autopilot
//!
//! Generates a rolling procedural terrain, builds its octree and flies the
//! rocket toward the first landing zone at a fixed timestep, logging the
//! outcome. Pass a `.toml` or `.ron` config path as the only argument to
//! override the defaults.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use lander_engine::foundation::logging;
use lander_engine::foundation::math::utils::planar_distance;
use lander_engine::prelude::*;

// Terrain generation
const TERRAIN_COLUMNS: u32 = 64;
const TERRAIN_ROWS: u32 = 64;
const TERRAIN_SPACING: f32 = 2.0;

// Autopilot tuning
const CRUISE_THRUST: f32 = 5.0;
const CRUISE_CLEARANCE: f32 = 8.0;
const MAX_DESCENT_SPEED: f32 = 4.0;
const MAX_LATERAL_SPEED: f32 = 3.0;
const ARRIVAL_RADIUS: f32 = 1.0;

// Simulated frame pacing
const FRAME_TIME: Duration = Duration::from_micros(16_667);
const MAX_FLIGHT_SECONDS: u32 = 180;

#[derive(thiserror::Error, Debug)]
enum AutopilotError {
    #[error("no landing zones were placed on the terrain")]
    NoLandingZones,
}

fn terrain_height(x: f32, z: f32) -> f32 {
    (x * 0.08).sin() * 3.0 + (z * 0.05).cos() * 2.0 + (x * z * 0.002).sin()
}

fn load_config() -> Result<LanderConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => LanderConfig::load_from_file(&path),
        None => Ok(LanderConfig::default()),
    }
}

/// Pick the single thruster to hold this tick
fn choose_thrust(body: &RigidBodyState, target: Vec3) -> Option<ThrustDirection> {
    let offset = target - body.position;
    let distance = planar_distance(body.position, target);
    let clearance = -offset.y;

    if body.vertical_speed() < -MAX_DESCENT_SPEED
        || (distance > ARRIVAL_RADIUS && clearance < CRUISE_CLEARANCE && body.vertical_speed() < 0.0)
    {
        return Some(ThrustDirection::Up);
    }

    let desired_x = (offset.x * 0.5).clamp(-MAX_LATERAL_SPEED, MAX_LATERAL_SPEED);
    let desired_z = (offset.z * 0.5).clamp(-MAX_LATERAL_SPEED, MAX_LATERAL_SPEED);
    let error_x = desired_x - body.velocity.x;
    let error_z = desired_z - body.velocity.z;

    if error_x.abs().max(error_z.abs()) < 0.25 {
        return None;
    }

    let direction = if error_x.abs() >= error_z.abs() {
        if error_x > 0.0 {
            ThrustDirection::Left
        } else {
            ThrustDirection::Right
        }
    } else if error_z > 0.0 {
        ThrustDirection::Forward
    } else {
        ThrustDirection::Backward
    };
    Some(direction)
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);

    let mesh = Arc::new(TerrainMesh::heightfield(
        TERRAIN_COLUMNS,
        TERRAIN_ROWS,
        TERRAIN_SPACING,
        terrain_height,
    ));
    log::info!(
        "Generated terrain: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    let octree = Arc::new(Octree::build(mesh, config.octree.clone())?);
    let mut timestep = FixedTimestep::new(config.physics.tick_rate);
    let mut session = LanderSession::new(config, octree)?;

    while session.thrust().magnitude() > CRUISE_THRUST {
        session.decrease_thrust();
    }

    let target = session
        .landing_zones()
        .first()
        .map(|zone| zone.center)
        .ok_or(AutopilotError::NoLandingZones)?;
    log::info!(
        "Targeting landing zone at ({:.1}, {:.1}, {:.1}), {:.1} units away",
        target.x,
        target.y,
        target.z,
        planar_distance(session.body().position, target)
    );

    session.start();
    let max_frames = MAX_FLIGHT_SECONDS * timestep.step().recip().round() as u32;

    'flight: for _ in 0..max_frames {
        for _ in 0..timestep.advance(FRAME_TIME) {
            session.set_thrust(choose_thrust(session.body(), target));
            let report = session.tick(timestep.step());

            if report.signal != Signal::None {
                log::info!("Signal {:?} at altitude {:.2}", report.signal, report.altitude);
            }
            if report.state.is_terminal() {
                break 'flight;
            }
        }
    }

    let fuel_used = session.fuel().capacity() - session.fuel().remaining();
    match session.state() {
        FlightState::Landed => log::info!("Landed safely, score {}", session.score()),
        FlightState::Crashed { in_zone, impact_force } => log::warn!(
            "Crashed {} the landing zone with impact force {impact_force}, score {}",
            if in_zone { "inside" } else { "outside" },
            session.score()
        ),
        FlightState::OutOfFuel => log::warn!("Ran out of fuel, score {}", session.score()),
        FlightState::Flying => log::warn!(
            "Still flying after {MAX_FLIGHT_SECONDS}s at altitude {:.2}",
            session.altitude()
        ),
    }
    log::info!(
        "Simulated {} steps ({:.1}s), burned {fuel_used:.1}s of fuel",
        timestep.total_steps(),
        timestep.simulated_time()
    );

    Ok(())
}
