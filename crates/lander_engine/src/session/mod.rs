//! Lander game session
//!
//! [`LanderSession`] owns everything that changes during play: the body, its
//! pending forces, fuel, landing zones, score and flight state. The terrain
//! octree is shared read-only. All mutation happens inside [`LanderSession::tick`]
//! and [`LanderSession::reset`].

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigError, LanderConfig};
use crate::foundation::math::Vec3;
use crate::physics::collision::{Ray, AABB};
use crate::physics::{
    BodyForces, CollisionResolver, FlightState, FuelTank, Integrator, LandingZone,
    RigidBodyState, Signal, SpinDirection, ThrustControl, ThrustDirection,
};
use crate::spatial::Octree;

/// Summary of one simulation tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Flight state after the tick
    pub state: FlightState,
    /// Transition raised during the tick
    pub signal: Signal,
    /// Points earned during the tick
    pub score_delta: u32,
    /// Running score
    pub score: u32,
    /// Fuel left in seconds
    pub fuel_remaining: f32,
    /// Height above the lowest terrain point
    pub altitude: f32,
}

/// A single lander game: one rocket over one terrain
#[derive(Debug)]
pub struct LanderSession {
    config: LanderConfig,
    octree: Arc<Octree>,
    integrator: Integrator,
    resolver: CollisionResolver,
    hull: AABB,
    ground_height: f32,
    rng: StdRng,

    body: RigidBodyState,
    forces: BodyForces,
    thrust: ThrustControl,
    fuel: FuelTank,
    firing: Option<ThrustDirection>,
    spinning: Option<SpinDirection>,
    zones: Vec<LandingZone>,
    contacts: Vec<AABB>,
    state: FlightState,
    score: u32,
    started: bool,
}

impl LanderSession {
    /// Create a session over `octree`
    ///
    /// The session is idle until [`LanderSession::start`] is called.
    pub fn new(config: LanderConfig, octree: Arc<Octree>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let zones = Self::place_zones(&config, &octree, &mut rng);

        log::info!(
            "Lander session ready: {} landing zones, {:.0}s of fuel",
            zones.len(),
            config.fuel.capacity
        );

        Ok(Self {
            integrator: config.physics.integrator(),
            resolver: config.landing.resolver(),
            hull: config.body.local_box(),
            ground_height: octree.bounds().min.y,
            body: Self::initial_body(&config),
            forces: BodyForces::default(),
            thrust: ThrustControl::new(config.thrust),
            fuel: FuelTank::new(config.fuel.capacity),
            firing: None,
            spinning: None,
            zones,
            contacts: Vec::new(),
            state: FlightState::Flying,
            score: 0,
            started: false,
            rng,
            octree,
            config,
        })
    }

    fn initial_body(config: &LanderConfig) -> RigidBodyState {
        RigidBodyState::at_rest(
            config.body.start_position,
            config.physics.mass,
            config.physics.damping,
        )
    }

    fn place_zones(config: &LanderConfig, octree: &Octree, rng: &mut StdRng) -> Vec<LandingZone> {
        LandingZone::place(
            octree,
            rng,
            config.landing.zone_count,
            config.landing.zone_radius,
            config.landing.probe_height,
        )
    }

    /// Begin simulating
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Check whether [`LanderSession::start`] has been called
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Does nothing before [`LanderSession::start`] or once the flight has
    /// ended. Otherwise resolves terrain contact, burns fuel for any thrust
    /// and, if still flying, integrates the body.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        if !self.started || self.state.is_terminal() {
            return self.report(Signal::None, 0);
        }

        let world_box = self.world_box();
        let resolution = self
            .resolver
            .resolve(&world_box, &self.body, &self.zones, &self.octree);
        resolution.apply(&mut self.body, &mut self.forces);
        self.state = resolution.state;
        self.score += resolution.score_delta;
        self.contacts = resolution.contacts;
        if self.state.is_terminal() {
            return self.report(resolution.signal, resolution.score_delta);
        }

        if self.firing.is_some() || self.spinning.is_some() {
            if let Some(direction) = self.firing {
                self.forces.add_force(self.thrust.force(direction));
            }
            if let Some(spin) = self.spinning {
                self.forces.add_torque(self.thrust.torque(spin));
            }
            if self.fuel.burn(dt) {
                let resolution = self.resolver.out_of_fuel(&mut self.body);
                resolution.apply(&mut self.body, &mut self.forces);
                self.state = resolution.state;
                return self.report(resolution.signal, 0);
            }
        }

        self.body = self.integrator.step(&self.body, &self.forces, dt);
        self.forces.clear();
        log::trace!(
            "tick: pos {:?} vel {:?} fuel {:.2}",
            self.body.position,
            self.body.velocity,
            self.fuel.remaining()
        );

        self.report(Signal::None, 0)
    }

    fn report(&self, signal: Signal, score_delta: u32) -> TickReport {
        TickReport {
            state: self.state,
            signal,
            score_delta,
            score: self.score,
            fuel_remaining: self.fuel.remaining(),
            altitude: self.altitude(),
        }
    }

    /// Start a fresh flight
    ///
    /// Restores the body to the start position at rest, refills the tank,
    /// places new landing zones and returns to [`FlightState::Flying`]. The
    /// score is kept.
    pub fn reset(&mut self) {
        self.body = Self::initial_body(&self.config);
        self.forces.clear();
        self.fuel.refill();
        self.firing = None;
        self.spinning = None;
        self.contacts.clear();
        self.state = FlightState::Flying;
        self.zones = Self::place_zones(&self.config, &self.octree, &mut self.rng);
        log::info!("Flight reset, score {}", self.score);
    }

    /// Hold a thruster on, or release it with `None`
    ///
    /// Held thrust is applied every tick until released or the tank empties.
    pub fn set_thrust(&mut self, direction: Option<ThrustDirection>) {
        self.firing = direction;
    }

    /// Hold a rotation thruster on, or release it with `None`
    pub fn set_spin(&mut self, spin: Option<SpinDirection>) {
        self.spinning = spin;
    }

    /// Add an external force for the next tick
    pub fn apply_force(&mut self, force: Vec3) {
        self.forces.add_force(force);
    }

    /// Raise thrust magnitude by one step
    pub fn increase_thrust(&mut self) -> f32 {
        self.thrust.increase()
    }

    /// Lower thrust magnitude by one step
    pub fn decrease_thrust(&mut self) -> f32 {
        self.thrust.decrease()
    }

    /// Terrain point hit by `ray`, for mouse picking
    pub fn pick(&self, ray: &Ray) -> Option<Vec3> {
        self.octree.intersect_ray(ray).map(|hit| hit.point)
    }

    /// Height of the body above the lowest terrain point
    pub fn altitude(&self) -> f32 {
        self.body.position.y - self.ground_height
    }

    /// Distance from the body to the terrain point below it
    pub fn distance_to_ground(&self) -> Option<f32> {
        let position = self.body.position;
        self.octree
            .intersect_ray(&Ray::downward(position))
            .map(|hit| (hit.point - position).magnitude())
    }

    /// Rocket hull in world space
    pub fn world_box(&self) -> AABB {
        self.hull.translated(self.body.position)
    }

    /// Running score across flights
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current flight state
    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Current body state
    pub fn body(&self) -> &RigidBodyState {
        &self.body
    }

    /// Landing zones of the current flight
    pub fn landing_zones(&self) -> &[LandingZone] {
        &self.zones
    }

    /// Terrain leaves the hull overlapped on the last tick
    pub fn contacts(&self) -> &[AABB] {
        &self.contacts
    }

    /// Fuel tank
    pub fn fuel(&self) -> &FuelTank {
        &self.fuel
    }

    /// Thrust magnitude control
    pub fn thrust(&self) -> &ThrustControl {
        &self.thrust
    }

    /// Shared terrain octree
    pub fn octree(&self) -> &Arc<Octree> {
        &self.octree
    }

    /// Session configuration
    pub fn config(&self) -> &LanderConfig {
        &self.config
    }
}
