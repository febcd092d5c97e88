//! Rocket kinematic state
//!
//! The state is a plain value: the integrator takes one and returns the next,
//! and the collision resolver freezes it in place on touchdown. Nothing here
//! lives in a global.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};

/// Heading of the rocket at orientation zero
pub const INITIAL_HEADING: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Linear and angular state of the rocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// Position in world units
    pub position: Vec3,

    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Constant linear acceleration in units per second squared
    pub acceleration: Vec3,

    /// Rotation about +Y in degrees
    pub orientation: f32,

    /// Angular velocity in degrees per second
    pub angular_velocity: f32,

    /// Constant angular acceleration in degrees per second squared
    pub angular_acceleration: f32,

    /// Body mass (strictly positive)
    pub mass: f32,

    /// Per-tick multiplicative velocity decay in `(0, 1]`
    pub damping: f32,
}

impl RigidBodyState {
    /// Create a body at rest at `position`
    pub fn at_rest(position: Vec3, mass: f32, damping: f32) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            orientation: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            mass,
            damping,
        }
    }

    /// Set velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Vertical component of velocity (negative when descending)
    pub fn vertical_speed(&self) -> f32 {
        self.velocity.y
    }

    /// Direction the nose points, derived from the orientation angle
    pub fn heading(&self) -> Vec3 {
        utils::rotate_about_y(INITIAL_HEADING, self.orientation)
    }

    /// Stop all linear and angular motion without moving the body
    pub fn freeze(&mut self) {
        self.velocity = Vec3::zeros();
        self.acceleration = Vec3::zeros();
        self.angular_velocity = 0.0;
        self.angular_acceleration = 0.0;
    }

    /// Check whether the body has any motion left
    pub fn is_at_rest(&self) -> bool {
        self.velocity == Vec3::zeros()
            && self.acceleration == Vec3::zeros()
            && self.angular_velocity == 0.0
            && self.angular_acceleration == 0.0
    }
}

/// Forces applied to the body for a single tick
///
/// Accumulated by the caller and cleared after each integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyForces {
    /// Linear force in world space
    pub force: Vec3,

    /// Torque about +Y
    pub torque: f32,
}

impl BodyForces {
    /// Add a linear force
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Add a torque
    pub fn add_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Reset both inputs to zero
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_at_rest_has_no_motion() {
        let body = RigidBodyState::at_rest(Vec3::new(0.0, 30.0, 0.0), 1.0, 0.99);
        assert!(body.is_at_rest());
        assert_relative_eq!(body.heading(), INITIAL_HEADING);
    }

    #[test]
    fn test_freeze_keeps_position() {
        let mut body = RigidBodyState::at_rest(Vec3::new(1.0, 2.0, 3.0), 1.0, 0.99)
            .with_velocity(Vec3::new(4.0, -5.0, 6.0));
        body.angular_velocity = 12.0;
        assert!(!body.is_at_rest());

        body.freeze();
        assert!(body.is_at_rest());
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_forces_accumulate_and_clear() {
        let mut forces = BodyForces::default();
        forces.add_force(Vec3::new(0.0, 100.0, 0.0));
        forces.add_force(Vec3::new(0.0, 10.0, 5.0));
        forces.add_torque(10.0);
        forces.add_torque(-4.0);
        assert_eq!(forces.force, Vec3::new(0.0, 110.0, 5.0));
        assert_relative_eq!(forces.torque, 6.0);

        forces.clear();
        assert_eq!(forces, BodyForces::default());
    }
}
