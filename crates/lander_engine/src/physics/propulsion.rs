//! Thrusters and fuel
//!
//! Fuel is measured in seconds of burn time. Any tick with thrust or torque
//! applied burns `dt` seconds, and an empty tank ends the flight.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Axis-aligned directions the main thrusters can push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThrustDirection {
    /// Toward +Z
    Forward,
    /// Toward -Z
    Backward,
    /// Toward +X
    Left,
    /// Toward -X
    Right,
    /// Toward +Y
    Up,
    /// Toward -Y
    Down,
}

impl ThrustDirection {
    /// Unit vector for this direction in world space
    pub fn vector(self) -> Vec3 {
        match self {
            Self::Forward => Vec3::new(0.0, 0.0, 1.0),
            Self::Backward => Vec3::new(0.0, 0.0, -1.0),
            Self::Left => Vec3::new(1.0, 0.0, 0.0),
            Self::Right => Vec3::new(-1.0, 0.0, 0.0),
            Self::Up => Vec3::new(0.0, 1.0, 0.0),
            Self::Down => Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

/// Rotation thrusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinDirection {
    /// Negative torque about +Y
    Clockwise,
    /// Positive torque about +Y
    CounterClockwise,
}

/// Thrust magnitude setting, adjustable in fixed steps within a range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustSettings {
    /// Starting magnitude
    pub initial: f32,
    /// Lowest allowed magnitude
    pub min: f32,
    /// Highest allowed magnitude
    pub max: f32,
    /// Change applied by one increase/decrease
    pub step: f32,
    /// Torque magnitude applied while spinning
    pub torque: f32,
}

impl Default for ThrustSettings {
    fn default() -> Self {
        Self {
            initial: 100.0,
            min: 1.0,
            max: 1000.0,
            step: 5.0,
            torque: 10.0,
        }
    }
}

/// Current thrust magnitude and the range it may move in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustControl {
    settings: ThrustSettings,
    magnitude: f32,
}

impl ThrustControl {
    /// Create a control at the configured initial magnitude
    pub fn new(settings: ThrustSettings) -> Self {
        Self {
            magnitude: settings.initial.clamp(settings.min, settings.max),
            settings,
        }
    }

    /// Current thrust magnitude
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Raise the magnitude by one step, capped at the maximum
    pub fn increase(&mut self) -> f32 {
        self.magnitude = (self.magnitude + self.settings.step).min(self.settings.max);
        self.magnitude
    }

    /// Lower the magnitude by one step, floored at the minimum
    pub fn decrease(&mut self) -> f32 {
        self.magnitude = (self.magnitude - self.settings.step).max(self.settings.min);
        self.magnitude
    }

    /// Force produced by firing toward `direction`
    pub fn force(&self, direction: ThrustDirection) -> Vec3 {
        direction.vector() * self.magnitude
    }

    /// Torque produced by spinning toward `spin`
    pub fn torque(&self, spin: SpinDirection) -> f32 {
        match spin {
            SpinDirection::Clockwise => -self.settings.torque,
            SpinDirection::CounterClockwise => self.settings.torque,
        }
    }
}

/// Burn-time fuel tank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelTank {
    capacity: f32,
    burned: f32,
}

impl FuelTank {
    /// Create a full tank holding `capacity` seconds of burn
    pub fn new(capacity: f32) -> Self {
        Self {
            capacity: capacity.max(0.0),
            burned: 0.0,
        }
    }

    /// Burn `dt` seconds of fuel; returns true if the tank is now empty
    pub fn burn(&mut self, dt: f32) -> bool {
        self.burned = (self.burned + dt.max(0.0)).min(self.capacity);
        self.is_empty()
    }

    /// Remaining burn time in seconds
    pub fn remaining(&self) -> f32 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        ((1.0 - self.burned / self.capacity) * self.capacity).max(0.0)
    }

    /// Remaining fuel as a fraction of capacity
    pub fn fraction(&self) -> f32 {
        if self.capacity <= 0.0 {
            0.0
        } else {
            self.remaining() / self.capacity
        }
    }

    /// Total burn time the tank holds when full
    pub fn capacity(&self) -> f32 {
        self.capacity
    }

    /// Check whether the tank has run dry
    pub fn is_empty(&self) -> bool {
        self.burned >= self.capacity
    }

    /// Refill to capacity
    pub fn refill(&mut self) {
        self.burned = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_vectors_are_unit_axes() {
        let all = [
            ThrustDirection::Forward,
            ThrustDirection::Backward,
            ThrustDirection::Left,
            ThrustDirection::Right,
            ThrustDirection::Up,
            ThrustDirection::Down,
        ];
        let mut sum = Vec3::zeros();
        for direction in all {
            assert_relative_eq!(direction.vector().magnitude(), 1.0);
            sum += direction.vector();
        }
        assert_eq!(sum, Vec3::zeros());
    }

    #[test]
    fn test_thrust_magnitude_is_clamped() {
        let mut control = ThrustControl::new(ThrustSettings {
            initial: 993.0,
            ..ThrustSettings::default()
        });
        assert_relative_eq!(control.increase(), 998.0);
        assert_relative_eq!(control.increase(), 1000.0);

        let mut control = ThrustControl::new(ThrustSettings {
            initial: 4.0,
            ..ThrustSettings::default()
        });
        assert_relative_eq!(control.decrease(), 1.0);
        assert_relative_eq!(control.decrease(), 1.0);
    }

    #[test]
    fn test_force_follows_magnitude() {
        let control = ThrustControl::new(ThrustSettings::default());
        assert_eq!(control.force(ThrustDirection::Up), Vec3::new(0.0, 100.0, 0.0));
        assert_relative_eq!(control.torque(SpinDirection::Clockwise), -10.0);
        assert_relative_eq!(control.torque(SpinDirection::CounterClockwise), 10.0);
    }

    #[test]
    fn test_tank_drains_and_refills() {
        let mut tank = FuelTank::new(120.0);
        assert_relative_eq!(tank.remaining(), 120.0);

        assert!(!tank.burn(30.0));
        assert_relative_eq!(tank.remaining(), 90.0);
        assert_relative_eq!(tank.fraction(), 0.75);

        assert!(tank.burn(100.0));
        assert_relative_eq!(tank.remaining(), 0.0);
        assert!(tank.is_empty());

        tank.refill();
        assert!(!tank.is_empty());
        assert_relative_eq!(tank.remaining(), 120.0);
    }
}
