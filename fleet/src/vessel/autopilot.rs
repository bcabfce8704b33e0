use bevy_math::Vec3;

use super::tuning::AutopilotTuning;
use super::HullPositions;
use crate::collab::{PhysicsWorld, VesselId};

/// Cheap "closeness" score used for target selection and firing range.
///
/// This is not Euclidean distance: it compares squared coordinates
/// (`sqrt(| |ax²| - |bx²| | + | |ay²| - |by²| |)`) and is kept exactly that
/// way because the AI's engagement behaviour is tuned against it.
pub fn proximity_heuristic(a: Vec3, b: Vec3) -> f32 {
    let dx = ((a.x * a.x).abs() - (b.x * b.x).abs()).abs();
    let dy = ((a.y * a.y).abs() - (b.y * b.y).abs()).abs();
    (dx + dy).sqrt()
}

/// Pick the nearer of two opponents by [`proximity_heuristic`]. Ties go to
/// the second candidate.
pub fn select_target(own: Vec3, first: (VesselId, Vec3), second: (VesselId, Vec3)) -> VesselId {
    if proximity_heuristic(own, first.1) < proximity_heuristic(own, second.1) {
        first.0
    } else {
        second.0
    }
}

/// State of the autonomous pursuit/aim controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Autopilot {
    pub opponents: [VesselId; 2],
    pub target: VesselId,
    pub fire_timer: f32,
}

impl Autopilot {
    pub fn new(opponents: [VesselId; 2], own: Vec3, hulls: &HullPositions, fire_threshold: f32) -> Self {
        let mut pilot = Self { opponents, target: opponents[0], fire_timer: fire_threshold };
        pilot.retarget(own, hulls);
        pilot
    }

    /// Re-evaluate which opponent to chase. Opponents without a known hull
    /// position are skipped.
    pub fn retarget(&mut self, own: Vec3, hulls: &HullPositions) -> Option<Vec3> {
        let [a, b] = self.opponents;
        self.target = match (hulls.get(a), hulls.get(b)) {
            (Some(pa), Some(pb)) => select_target(own, (a, pa), (b, pb)),
            (Some(_), None) => a,
            (None, Some(_)) => b,
            (None, None) => return None,
        };
        hulls.get(self.target)
    }

    /// Displacement towards `target` for this frame. Each axis only moves when
    /// its probe ray reports a clear path.
    pub fn steer<P: PhysicsWorld>(
        &self,
        physics: &P,
        me: VesselId,
        own: Vec3,
        target: Vec3,
        tuning: &AutopilotTuning,
        dt_factor: f32,
    ) -> Vec3 {
        let speed = tuning.speed * dt_factor;
        let mut delta = Vec3::ZERO;
        let off = tuning.vertical_probe_offset;

        if target.y - tuning.vertical_band > own.y {
            let origin = own + Vec3::new(off, off, 0.0);
            if physics.raycast(origin, Vec3::Y, tuning.vertical_probe_range, Some(me)).is_none() {
                delta.y += speed;
            }
        }
        if target.y + tuning.vertical_band < own.y {
            let origin = own + Vec3::new(off, -off, 0.0);
            if physics.raycast(origin, Vec3::NEG_Y, tuning.vertical_probe_range, Some(me)).is_none() {
                delta.y -= speed;
            }
        }

        let dx = target.x - own.x;
        if dx.abs() > tuning.engage_range {
            let dir = Vec3::new(dx.signum(), 0.0, 0.0);
            let origin = own + dir * tuning.forward_probe_offset;
            if physics.raycast(origin, dir, tuning.forward_probe_range, Some(me)).is_none() {
                delta.x += dir.x * speed;
            }
        }
        delta
    }
}
