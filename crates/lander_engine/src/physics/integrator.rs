//! Fixed-step integration of the rocket's motion
//!
//! Position advances with the velocity from the start of the step, then
//! velocity picks up thrust, gravity and the body's own acceleration and is
//! damped. The same scheme runs on the single rotational axis.

use crate::foundation::math::Vec3;

use super::rigid_body::{BodyForces, RigidBodyState};

/// Lunar surface gravity in units per second squared
pub const LUNAR_GRAVITY: f32 = 1.62;

/// Advances a [`RigidBodyState`] by one time step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    /// Gravitational force applied every step
    pub gravity: Vec3,
}

impl Integrator {
    /// Create an integrator with the given gravity force
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    /// Integrator with no gravity
    pub fn weightless() -> Self {
        Self::new(Vec3::zeros())
    }

    /// Compute the state `dt` seconds after `state` under `forces`
    ///
    /// Pure: the input state is not modified and the forces are not cleared.
    pub fn step(&self, state: &RigidBodyState, forces: &BodyForces, dt: f32) -> RigidBodyState {
        let mut next = state.clone();
        let inv_mass = 1.0 / state.mass;

        next.position += state.velocity * dt;
        let accel = state.acceleration + forces.force * inv_mass + self.gravity * inv_mass;
        next.velocity = (state.velocity + accel * dt) * state.damping;

        next.orientation += state.angular_velocity * dt;
        let angular_accel = state.angular_acceleration + forces.torque * inv_mass;
        next.angular_velocity = (state.angular_velocity + angular_accel * dt) * state.damping;

        next
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -LUNAR_GRAVITY, 0.0))
    }
}
