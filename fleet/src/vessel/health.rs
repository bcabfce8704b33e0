use serde::{Deserialize, Serialize};

use super::tuning::VesselTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BalloonTier {
    Big,
    Mid,
    Small,
}

impl BalloonTier {
    pub const ALL: [BalloonTier; 3] = [BalloonTier::Big, BalloonTier::Mid, BalloonTier::Small];

    pub fn index(self) -> usize {
        match self {
            BalloonTier::Big => 0,
            BalloonTier::Mid => 1,
            BalloonTier::Small => 2,
        }
    }
}

/// Damage selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselPart {
    Hull,
    Balloon(BalloonTier),
}

/// Four independent health counters. Health only ever goes down (no floor);
/// only its sign matters to gameplay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    hull: f32,
    balloons: [f32; 3],
}

impl Health {
    pub fn new(hull: f32, balloons: [f32; 3]) -> Self {
        Self { hull, balloons }
    }

    pub fn from_tuning(tuning: &VesselTuning) -> Self {
        Self::new(tuning.hull_health, tuning.balloons.each_ref().map(|b| b.health))
    }

    pub fn get(&self, part: VesselPart) -> f32 {
        match part {
            VesselPart::Hull => self.hull,
            VesselPart::Balloon(tier) => self.balloons[tier.index()],
        }
    }

    pub fn damage(&mut self, part: VesselPart, amount: f32) {
        match part {
            VesselPart::Hull => self.hull -= amount,
            VesselPart::Balloon(tier) => self.balloons[tier.index()] -= amount,
        }
    }

    pub fn is_depleted(&self, part: VesselPart) -> bool {
        self.get(part) <= 0.0
    }

    /// Coarse aggregate for display: sum of all counters, truncated, halved.
    pub fn total_display(&self) -> i32 {
        let sum = self.hull + self.balloons.iter().sum::<f32>();
        (sum as i32) / 2
    }

    /// Which still-attached balloons must be cut loose this frame.
    ///
    /// A destroyed hull drops every balloon regardless of balloon health;
    /// otherwise each balloon goes when its own counter is depleted.
    /// Detached balloons are never selected again.
    pub fn release_plan(&self, attached: [bool; 3]) -> [bool; 3] {
        let hull_down = self.is_depleted(VesselPart::Hull);
        BalloonTier::ALL.map(|tier| {
            attached[tier.index()]
                && (hull_down || self.is_depleted(VesselPart::Balloon(tier)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_truncates_before_halving() {
        let h = Health::new(7.5, [0.0, 0.0, 0.0]);
        assert_eq!(h.total_display(), 3);
        let full = Health::from_tuning(&VesselTuning::default());
        // (150 + 50 + 35 + 15) / 2
        assert_eq!(full.total_display(), 125);
    }

    #[test]
    fn hull_loss_drops_every_attached_balloon() {
        let h = Health::new(0.0, [50.0, 35.0, 15.0]);
        assert_eq!(h.release_plan([true, true, true]), [true, true, true]);
        assert_eq!(h.release_plan([true, false, true]), [true, false, true]);
    }

    #[test]
    fn balloons_released_individually_while_hull_stands() {
        let h = Health::new(10.0, [50.0, -1.0, 0.0]);
        assert_eq!(h.release_plan([true, true, true]), [false, true, true]);
        assert_eq!(h.release_plan([true, false, false]), [false, false, false]);
    }
}
