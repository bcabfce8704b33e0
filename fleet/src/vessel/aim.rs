use std::f32::consts::PI;

use bevy_math::{Vec2, Vec3};

use crate::input::CameraView;
use crate::math::{screen_angle_deg, world_to_ndc};

/// Turret angle (degrees) from the barrel's projected position towards a
/// point already in NDC.
pub fn aim_at_ndc(camera: &CameraView, barrel: Vec3, target_ndc: Vec2) -> f32 {
    let barrel_ndc = world_to_ndc(camera.view_proj, barrel);
    screen_angle_deg(barrel_ndc, target_ndc)
}

pub fn clamp_player_aim(angle_deg: f32, min_deg: f32, max_deg: f32) -> f32 {
    angle_deg.clamp(min_deg, max_deg)
}

/// Vertical launch factor for a right-facing turret: folds the stored aim
/// vector (radians, as produced by `atan2`) back around π so the shot leaves
/// to the right.
pub fn mirrored_lift(aim_vector: f32) -> f32 {
    if aim_vector < 0.0 {
        PI + aim_vector
    } else {
        -(PI - aim_vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_aim_is_clamped_to_turret_arc() {
        assert_eq!(clamp_player_aim(80.0, -45.0, 22.0), 22.0);
        assert_eq!(clamp_player_aim(-170.0, -45.0, 22.0), -45.0);
        assert_eq!(clamp_player_aim(10.0, -45.0, 22.0), 10.0);
    }

    #[test]
    fn mirrored_lift_is_zero_for_a_level_shot_to_the_right() {
        // A target straight to the right gives atan2(0, -x) = ±π.
        assert!(mirrored_lift(PI).abs() < 1e-6);
        assert!(mirrored_lift(-PI).abs() < 1e-6);
        // Target slightly above and to the right: angle just below -π + ε,
        // lift becomes a small positive value.
        assert!(mirrored_lift(-PI + 0.1) > 0.0);
    }
}
