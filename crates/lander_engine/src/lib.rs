//! # Lander Engine
//!
//! Terrain collision and flight physics for a moon lander game.
//!
//! ## Features
//!
//! - **Octree**: Arena-backed spatial partition built once over a static terrain mesh
//! - **Queries**: First-hit ray probes and broad-phase box overlap against terrain leaves
//! - **Integration**: Damped Euler integration of the rocket under thrust and gravity
//! - **Outcomes**: Landing/crash classification against randomly placed landing zones
//! - **Session**: Fuel, thrust, score and reset handling around a single tick function
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lander_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LanderConfig::default();
//!     let mesh = Arc::new(TerrainMesh::heightfield(64, 64, 2.0, |x, z| (x * 0.1).sin() + (z * 0.1).cos()));
//!     let octree = Octree::build(mesh, config.octree.clone())?;
//!
//!     let mut session = LanderSession::new(config, Arc::new(octree))?;
//!     session.start();
//!     session.set_thrust(Some(ThrustDirection::Up));
//!     let report = session.tick(1.0 / 60.0);
//!     println!("{:?} at altitude {}", report.state, session.altitude());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod session;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, LanderConfig},
        foundation::{
            math::Vec3,
            time::FixedTimestep,
        },
        physics::{
            collision::{Ray, TerrainMesh, AABB},
            BodyForces, CollisionResolver, FlightState, Integrator, LandingZone,
            RigidBodyState, Signal, ThrustDirection,
        },
        session::{LanderSession, TickReport},
        spatial::{NodeId, Octree, OctreeConfig, RayHit, SpatialError},
    };
}
