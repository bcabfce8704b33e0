use std::f32::consts::PI;

use crate::input::FrameInput;

use super::tuning::VesselTuning;

/// Downward drift per frame for the current set of attached balloons.
pub fn gravity_offset(tuning: &VesselTuning, attached: [bool; 3]) -> f32 {
    tuning
        .balloons
        .iter()
        .zip(attached)
        .filter(|(_, on)| *on)
        .fold(tuning.base_gravity_offset, |acc, (b, _)| acc - b.gravity_share)
}

/// Sinusoidal vertical bob. The phase walks back and forth across `[0, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingBob {
    phase: f32,
    step: f32,
}

impl FloatingBob {
    pub fn new(phase: f32, step: f32) -> Self {
        Self { phase, step }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Displacement for this frame, then advance the phase.
    pub fn advance(&mut self, amplitude: f32, dt_factor: f32) -> f32 {
        let value = amplitude * self.phase.sin() * self.step * dt_factor;
        self.phase += self.step;
        if self.phase > PI || self.phase < 0.0 {
            self.step = -self.step;
        }
        value
    }
}

/// Player-driven momentum on two independent axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Momentum {
    pub vertical: f32,
    pub horizontal: f32,
}

impl Momentum {
    pub fn steer(&mut self, input: &FrameInput, tuning: &VesselTuning, dt_factor: f32) {
        let step = tuning.momentum_step * dt_factor;
        let decay = tuning.momentum_decay * dt_factor;
        let cap = tuning.momentum_cap;
        self.vertical = steer_axis(self.vertical, input.up, input.down, step, decay, cap);
        self.horizontal = steer_axis(self.horizontal, input.right, input.left, step, decay, cap);
    }
}

fn steer_axis(value: f32, positive: bool, negative: bool, step: f32, decay: f32, cap: f32) -> f32 {
    let mut v = value;
    if positive {
        v += step;
    }
    if negative {
        v -= step;
    }
    if !positive && !negative {
        v = if v > 0.0 { (v - decay).max(0.0) } else { (v + decay).min(0.0) };
    }
    v.clamp(-cap, cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_offset_shrinks_with_each_attached_balloon() {
        let t = VesselTuning::default();
        assert!(gravity_offset(&t, [true, true, true]).abs() < 1e-6);
        assert!((gravity_offset(&t, [false, false, false]) - 0.3).abs() < 1e-6);
        assert!((gravity_offset(&t, [false, true, true]) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn bob_stays_bounded_and_turns_around() {
        let mut bob = FloatingBob::new(0.0, 0.005);
        let mut max = 0.0f32;
        for _ in 0..5000 {
            let v = bob.advance(7.0, 1.0);
            max = max.max(v.abs());
            assert!(bob.phase() > -0.01 && bob.phase() < PI + 0.01, "phase={}", bob.phase());
        }
        assert!(max <= 7.0 * 0.005 + 1e-6, "max={max}");
    }

    #[test]
    fn idle_axis_decays_to_rest_without_overshoot() {
        let mut v = 0.0012;
        for _ in 0..10 {
            v = steer_axis(v, false, false, 0.01, 0.0005, 0.1);
            assert!(v >= 0.0);
        }
        assert_eq!(v, 0.0);
    }
}
