//! Touchdown classification
//!
//! The resolver turns a broad-phase terrain query plus the rocket's vertical
//! speed into a flight outcome. It owns no state of its own: every call takes
//! the current body state and returns a [`Resolution`] for the caller to apply.
//!
//! ```text
//! Flying ──overlap, in zone, gentle, descending──▶ Landed
//!    │ ────overlap, in zone, otherwise──────────▶ Crashed { in_zone: true }
//!    │ ────overlap, outside zones, too fast─────▶ Crashed { in_zone: false }
//!    └─────tank empty───────────────────────────▶ OutOfFuel
//! ```

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::physics::collision::AABB;
use crate::physics::landing::LandingZone;
use crate::physics::rigid_body::{BodyForces, RigidBodyState};
use crate::spatial::Octree;

/// Where the flight stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FlightState {
    /// Airborne, or resting on terrain outside a zone at a gentle speed
    #[default]
    Flying,
    /// Touched down gently inside a landing zone
    Landed,
    /// Hit the terrain too hard, or hit a zone while climbing
    Crashed {
        /// Whether the impact happened inside a landing zone
        in_zone: bool,
        /// Rounded vertical speed at impact
        impact_force: u32,
    },
    /// Fuel ran out before touchdown
    OutOfFuel,
}

impl FlightState {
    /// Stopped for good: landed, crashed or out of fuel
    pub fn grounded(self) -> bool {
        !matches!(self, Self::Flying)
    }

    /// Landed inside a zone
    pub fn won(self) -> bool {
        matches!(self, Self::Landed)
    }

    /// Crashed anywhere
    pub fn crashed(self) -> bool {
        matches!(self, Self::Crashed { .. })
    }

    /// Crashed inside a landing zone
    pub fn crashed_in_zone(self) -> bool {
        matches!(self, Self::Crashed { in_zone: true, .. })
    }

    /// Tank ran dry
    pub fn out_of_fuel(self) -> bool {
        matches!(self, Self::OutOfFuel)
    }

    /// Impact force of a crash, if any
    pub fn impact_force(self) -> Option<u32> {
        match self {
            Self::Crashed { impact_force, .. } => Some(impact_force),
            _ => None,
        }
    }

    /// No further evaluation happens until reset
    pub fn is_terminal(self) -> bool {
        self.grounded()
    }
}

/// Event raised by a state transition, for audio and HUD feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Signal {
    /// Nothing happened this tick
    #[default]
    None,
    /// Landed in a zone
    Won,
    /// Crashed inside a zone
    CrashedInZone,
    /// Crashed outside every zone
    CrashedOutOfZone,
    /// Tank ran dry
    OutOfFuel,
}

/// Outcome of one resolver pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Flight state after this pass
    pub state: FlightState,
    /// Transition event, [`Signal::None`] if the state did not change
    pub signal: Signal,
    /// Points earned by this transition
    pub score_delta: u32,
    /// Upward push to apply this tick while resting outside a zone
    pub corrective_force: Option<Vec3>,
    /// Bounds of every terrain leaf the body overlapped
    pub contacts: Vec<AABB>,
}

impl Resolution {
    /// Apply this resolution to the body and its pending forces
    ///
    /// Terminal states freeze the body and discard pending forces; otherwise
    /// any corrective force is added to the pending forces.
    pub fn apply(&self, body: &mut RigidBodyState, forces: &mut BodyForces) {
        if self.state.is_terminal() {
            body.freeze();
            forces.clear();
        } else if let Some(push) = self.corrective_force {
            forces.add_force(push);
        }
    }
}

/// Classifies terrain contact into flight outcomes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    /// Vertical speeds strictly below this count as gentle
    pub landing_speed_threshold: f32,
    /// Points for landing in a zone
    pub win_score: u32,
    /// Points for crashing inside a zone
    pub in_zone_crash_score: u32,
    /// Force applied while resting gently outside a zone
    pub hover_force: Vec3,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            landing_speed_threshold: 8.0,
            win_score: 500,
            in_zone_crash_score: 250,
            hover_force: Vec3::new(0.0, 10.0, 0.0),
        }
    }
}

impl CollisionResolver {
    /// Classify the body's contact with the terrain
    ///
    /// `body_box` is the rocket's world-space bounds. Only the vertical
    /// component of velocity is considered.
    pub fn resolve(
        &self,
        body_box: &AABB,
        body: &RigidBodyState,
        zones: &[LandingZone],
        octree: &Octree,
    ) -> Resolution {
        let mut contacts = Vec::new();
        if !octree.intersect_box(body_box, &mut contacts) {
            return Resolution::default();
        }

        let in_zone = zones.iter().any(|zone| zone.contains(body.position));
        let v = body.vertical_speed();
        let gentle = v.abs() < self.landing_speed_threshold;
        log::trace!(
            "Terrain contact: {} leaves, v = {v:.2}, in_zone = {in_zone}",
            contacts.len()
        );

        let (state, signal, score_delta) = match (in_zone, gentle) {
            (true, true) if v <= 0.0 => (FlightState::Landed, Signal::Won, self.win_score),
            (true, _) => (
                FlightState::Crashed {
                    in_zone: true,
                    impact_force: impact_force(v),
                },
                Signal::CrashedInZone,
                self.in_zone_crash_score,
            ),
            (false, true) => {
                return Resolution {
                    corrective_force: Some(self.hover_force),
                    contacts,
                    ..Resolution::default()
                };
            }
            (false, false) => (
                FlightState::Crashed {
                    in_zone: false,
                    impact_force: impact_force(v),
                },
                Signal::CrashedOutOfZone,
                0,
            ),
        };

        log::info!("Flight ended: {state:?} at {:?}, +{score_delta} points", body.position);
        Resolution {
            state,
            signal,
            score_delta,
            corrective_force: None,
            contacts,
        }
    }

    /// Force the out-of-fuel outcome and freeze the body
    pub fn out_of_fuel(&self, body: &mut RigidBodyState) -> Resolution {
        body.freeze();
        log::info!("Out of fuel at {:?}", body.position);
        Resolution {
            state: FlightState::OutOfFuel,
            signal: Signal::OutOfFuel,
            ..Resolution::default()
        }
    }
}

fn impact_force(vertical_speed: f32) -> u32 {
    vertical_speed.abs().round() as u32
}
