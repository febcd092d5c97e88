//! Flight physics
//!
//! Rigid-body motion for the lander and the rules that decide how a flight
//! ends.
//!
//! # Module Organization
//!
//! - [`collision`] - Rays, boxes and the terrain mesh
//! - [`rigid_body`] - Kinematic state and per-tick forces
//! - [`integrator`] - Damped Euler stepping under gravity
//! - [`propulsion`] - Thrust directions, magnitude control and the fuel tank
//! - [`landing`] - Landing zone geometry and placement
//! - [`resolver`] - Touchdown and crash classification

pub mod collision;
pub mod integrator;
pub mod landing;
pub mod propulsion;
pub mod resolver;
pub mod rigid_body;

pub use integrator::{Integrator, LUNAR_GRAVITY};
pub use landing::LandingZone;
pub use propulsion::{FuelTank, SpinDirection, ThrustControl, ThrustDirection, ThrustSettings};
pub use resolver::{CollisionResolver, FlightState, Resolution, Signal};
pub use rigid_body::{BodyForces, RigidBodyState};
