//! The composite vessel: hull, balloons, turret, decorative cloth, and the
//! per-frame state machine tying them together.

mod aim;
mod autopilot;
mod composite;
mod health;
mod motion;
mod projectile;
mod tuning;

pub use aim::{aim_at_ndc, clamp_player_aim, mirrored_lift};
pub use autopilot::{proximity_heuristic, select_target, Autopilot};
pub use composite::{CompositeVessel, ControlMode};
pub use health::{BalloonTier, Health, VesselPart};
pub use motion::{gravity_offset, FloatingBob, Momentum};
pub use projectile::{launch, Launch, Projectile};
pub use tuning::{AutopilotTuning, BalloonSpec, CannonSpec, ClothDecoration, ProjectilePolicy, VesselTuning};

use bevy_math::Vec3;

use crate::collab::VesselId;

/// Hull positions of every vessel, captured before the vessels update so
/// each one sees the same frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullPositions(Vec<(VesselId, Vec3)>);

impl HullPositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: VesselId, position: Vec3) {
        match self.0.iter_mut().find(|(v, _)| *v == id) {
            Some(entry) => entry.1 = position,
            None => self.0.push((id, position)),
        }
    }

    pub fn get(&self, id: VesselId) -> Option<Vec3> {
        self.0.iter().find(|(v, _)| *v == id).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(VesselId, Vec3)> {
        self.0.iter()
    }
}
