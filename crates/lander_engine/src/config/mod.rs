//! Configuration system
//!
//! Every tunable of a lander session lives in [`LanderConfig`], loadable from
//! TOML or RON through the [`Config`] trait.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::physics::collision::AABB;
use crate::physics::{CollisionResolver, Integrator, ThrustSettings, LUNAR_GRAVITY};
use crate::spatial::OctreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parsed but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Integration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward gravitational force
    pub gravity: f32,
    /// Rocket mass
    pub mass: f32,
    /// Per-tick velocity damping in `(0, 1]`
    pub damping: f32,
    /// Fixed simulation steps per second
    pub tick_rate: u32,
}

impl PhysicsSettings {
    /// Integrator pulling toward -Y with the configured gravity
    pub fn integrator(&self) -> Integrator {
        Integrator::new(Vec3::new(0.0, -self.gravity, 0.0))
    }

    /// Seconds per fixed step
    pub fn tick_period(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: LUNAR_GRAVITY,
            mass: 1.0,
            damping: 0.99,
            tick_rate: 60,
        }
    }
}

/// Rocket placement and hull
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    /// Position at the start of every flight
    pub start_position: Vec3,
    /// Hull minimum corner relative to the body position
    pub local_min: Vec3,
    /// Hull maximum corner relative to the body position
    pub local_max: Vec3,
}

impl BodySettings {
    /// Hull box in body space
    pub fn local_box(&self) -> AABB {
        AABB::new(self.local_min, self.local_max)
    }
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 30.0, 0.0),
            local_min: Vec3::new(-0.5, 0.0, -0.5),
            local_max: Vec3::new(0.5, 2.0, 0.5),
        }
    }
}

/// Landing zones and outcome scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingSettings {
    /// Zones placed per flight
    pub zone_count: usize,
    /// Radius of each zone
    pub zone_radius: f32,
    /// Height above a vertex the placement probe starts from
    pub probe_height: f32,
    /// Vertical speeds strictly below this are gentle
    pub landing_speed_threshold: f32,
    /// Points for landing in a zone
    pub win_score: u32,
    /// Points for crashing inside a zone
    pub in_zone_crash_score: u32,
    /// Upward force while resting gently outside a zone
    pub hover_force: f32,
}

impl LandingSettings {
    /// Resolver using these thresholds and scores
    pub fn resolver(&self) -> CollisionResolver {
        CollisionResolver {
            landing_speed_threshold: self.landing_speed_threshold,
            win_score: self.win_score,
            in_zone_crash_score: self.in_zone_crash_score,
            hover_force: Vec3::new(0.0, self.hover_force, 0.0),
        }
    }
}

impl Default for LandingSettings {
    fn default() -> Self {
        Self {
            zone_count: 3,
            zone_radius: 5.0,
            probe_height: 200.0,
            landing_speed_threshold: 8.0,
            win_score: 500,
            in_zone_crash_score: 250,
            hover_force: 10.0,
        }
    }
}

/// Fuel supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelSettings {
    /// Seconds of burn in a full tank
    pub capacity: f32,
}

impl Default for FuelSettings {
    fn default() -> Self {
        Self { capacity: 120.0 }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
    /// Seed for landing zone placement; entropy when absent
    pub seed: Option<u64>,
    /// Default log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Terrain partition parameters
    pub octree: OctreeConfig,
    /// Integration settings
    pub physics: PhysicsSettings,
    /// Rocket placement and hull
    pub body: BodySettings,
    /// Landing zones and scoring
    pub landing: LandingSettings,
    /// Thrust magnitude range
    pub thrust: ThrustSettings,
    /// Fuel supply
    pub fuel: FuelSettings,
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            seed: None,
            log_level: "info".to_string(),
            octree: OctreeConfig::default(),
            physics: PhysicsSettings::default(),
            body: BodySettings::default(),
            landing: LandingSettings::default(),
            thrust: ThrustSettings::default(),
            fuel: FuelSettings::default(),
        }
    }
}

impl Config for LanderConfig {}

impl LanderConfig {
    /// Set a fixed seed for reproducible zone placement
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set octree parameters
    pub fn with_octree(mut self, octree: OctreeConfig) -> Self {
        self.octree = octree;
        self
    }

    /// Set the start position
    pub fn with_start_position(mut self, position: Vec3) -> Self {
        self.body.start_position = position;
        self
    }

    /// Set the fuel capacity in seconds
    pub fn with_fuel_capacity(mut self, seconds: f32) -> Self {
        self.fuel.capacity = seconds;
        self
    }

    /// Set gravity magnitude
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.physics.gravity = gravity;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.octree
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let physics = &self.physics;
        if physics.mass <= 0.0 {
            return Err(ConfigError::Invalid(format!("mass must be positive, got {}", physics.mass)));
        }
        if physics.damping <= 0.0 || physics.damping > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "damping must be in (0, 1], got {}",
                physics.damping
            )));
        }
        if physics.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick rate must be non-zero".to_string()));
        }

        let body = &self.body;
        if (0..3).any(|axis| body.local_min[axis] > body.local_max[axis]) {
            return Err(ConfigError::Invalid(format!(
                "body extents are inverted: {:?} > {:?}",
                body.local_min, body.local_max
            )));
        }

        let landing = &self.landing;
        if landing.zone_radius <= 0.0 {
            return Err(ConfigError::Invalid("zone radius must be positive".to_string()));
        }
        if landing.landing_speed_threshold <= 0.0 {
            return Err(ConfigError::Invalid("landing speed threshold must be positive".to_string()));
        }

        let thrust = &self.thrust;
        if thrust.min <= 0.0 || thrust.min > thrust.max || thrust.step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "thrust range [{}, {}] step {} is unusable",
                thrust.min, thrust.max, thrust.step
            )));
        }

        if self.fuel.capacity <= 0.0 {
            return Err(ConfigError::Invalid("fuel capacity must be positive".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LanderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.octree.max_depth, 20);
        assert_eq!(config.octree.max_points_per_leaf, 1);
        assert_eq!(config.body.start_position, Vec3::new(0.0, 30.0, 0.0));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LanderConfig::default().with_seed(9).with_gravity(3.0);
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: LanderConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = LanderConfig::default().with_fuel_capacity(30.0);
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: LanderConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed: LanderConfig = toml::from_str("seed = 4\n[landing]\nzone_count = 5\n").unwrap();
        assert_eq!(parsed.seed, Some(4));
        assert_eq!(parsed.landing.zone_count, 5);
        assert_eq!(parsed.landing.zone_radius, 5.0);
        assert_eq!(parsed.physics, PhysicsSettings::default());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("lander_config_{}.ron", std::process::id()));
        let path = path.to_str().unwrap();
        let config = LanderConfig::default().with_seed(77);
        config.save_to_file(path).unwrap();
        let loaded = LanderConfig::load_from_file(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = LanderConfig::default().save_to_file("lander.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = LanderConfig::default();
        config.physics.mass = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = LanderConfig::default();
        config.physics.damping = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = LanderConfig::default();
        config.physics.tick_rate = 0;
        assert!(config.validate().is_err());

        let mut config = LanderConfig::default();
        config.body.local_min.y = 3.0;
        assert!(config.validate().is_err());

        let config = LanderConfig::default().with_octree(OctreeConfig::default().with_max_depth(0));
        assert!(config.validate().is_err());

        let config = LanderConfig::default().with_fuel_capacity(0.0);
        assert!(config.validate().is_err());
    }
}
