use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use super::health::BalloonTier;
use crate::cloth::ClothSettings;
use crate::collab::PhysicsMaterial;

/// Per-tier balloon parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalloonSpec {
    pub radius: f32,
    pub mass: f32,
    /// Upward force applied every frame, attached or not.
    pub lift: f32,
    pub health: f32,
    /// How much this balloon cancels of the base gravity offset while attached.
    pub gravity_share: f32,
    /// Joint anchor in hull-local space.
    pub anchor: Vec3,
    /// Divisor mapping health to the 0..10 display scale.
    pub display_divisor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CannonSpec {
    pub power: f32,
    pub damage: f32,
    pub projectile_radius: f32,
    pub projectile_mass: f32,
    /// Radius of the trigger shell reporting impacts; slightly larger than the ball.
    pub trigger_radius: f32,
    /// Distance from the barrel pivot to the muzzle.
    pub muzzle_offset: f32,
    /// Muzzle X offset used when facing right.
    pub mirrored_muzzle_x: f32,
    /// Constant downward force on every live projectile.
    pub drop_force: f32,
    /// Reload threshold in timer units.
    pub reload: f32,
    /// Reload timer gain per frame while the trigger is released.
    pub reload_tick: f32,
}

impl Default for CannonSpec {
    fn default() -> Self {
        Self {
            power: 400.0,
            damage: 4.0,
            projectile_radius: 2.0,
            projectile_mass: 1.0,
            trigger_radius: 2.1,
            muzzle_offset: 5.0,
            mirrored_muzzle_x: 10.0,
            drop_force: 100.0,
            reload: 3.5,
            reload_tick: 0.01,
        }
    }
}

/// Projectile reclaim policy. Projectiles are despawned once they exceed
/// `ttl_secs` or when more than `max_live` are in flight (oldest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectilePolicy {
    pub ttl_secs: f32,
    pub max_live: usize,
}

impl Default for ProjectilePolicy {
    fn default() -> Self {
        Self { ttl_secs: 12.0, max_live: 24 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotTuning {
    /// Movement per reference frame.
    pub speed: f32,
    /// Vertical dead band before the autopilot levels with its target.
    pub vertical_band: f32,
    /// Horizontal stand-off distance; also the firing range.
    pub engage_range: f32,
    /// Offset of the vertical probes from the hull, on both axes.
    pub vertical_probe_offset: f32,
    pub vertical_probe_range: f32,
    pub forward_probe_offset: f32,
    pub forward_probe_range: f32,
    pub fire_threshold: f32,
}

impl Default for AutopilotTuning {
    fn default() -> Self {
        Self {
            speed: 0.08,
            vertical_band: 50.0,
            engage_range: 150.0,
            vertical_probe_offset: 40.0,
            vertical_probe_range: 50.0,
            forward_probe_offset: 150.0,
            forward_probe_range: 100.0,
            fire_threshold: 3.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothDecoration {
    pub width: f32,
    pub length: f32,
    pub resolution: u32,
    pub external_acceleration: f32,
    pub settings: ClothSettings,
}

impl Default for ClothDecoration {
    fn default() -> Self {
        Self {
            width: 8.0,
            length: 12.0,
            resolution: 10,
            external_acceleration: 0.0,
            settings: ClothSettings::default(),
        }
    }
}

/// Everything that shapes a vessel's behaviour. Defaults reproduce the
/// shipped galleon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselTuning {
    pub hull_health: f32,
    pub hull_display_divisor: f32,
    /// Hull offset from the vessel origin at spawn.
    pub hull_drop: Vec3,
    pub hull_collision_asset: String,
    pub hull_half_extents: Vec3,
    pub material: PhysicsMaterial,
    /// Big, mid, small.
    pub balloons: [BalloonSpec; 3],
    pub base_gravity_offset: f32,

    pub control_zone_half_extents: Vec3,
    pub control_zone_anchor: Vec3,

    pub float_amplitude: f32,
    pub float_step: f32,

    pub momentum_step: f32,
    pub momentum_cap: f32,
    pub momentum_decay: f32,

    pub aim_min_deg: f32,
    pub aim_max_deg: f32,

    /// Offsets from the hull for a left-facing vessel; X is mirrored when facing right.
    pub turret_base_offset: Vec3,
    pub turret_barrel_offset: Vec3,
    pub turret_base_half_extents: Vec3,
    pub turret_barrel_half_extents: Vec3,
    pub cloth_offset: Vec3,

    pub cannon: CannonSpec,
    pub projectiles: ProjectilePolicy,
    pub autopilot: AutopilotTuning,
    pub cloth: ClothDecoration,
}

impl VesselTuning {
    pub fn balloon(&self, tier: BalloonTier) -> &BalloonSpec {
        &self.balloons[tier.index()]
    }
}

impl Default for VesselTuning {
    fn default() -> Self {
        Self {
            hull_health: 150.0,
            hull_display_divisor: 1.5,
            hull_drop: Vec3::new(0.0, -5.0, 0.0),
            hull_collision_asset: "meshes/galleon.collision".to_string(),
            hull_half_extents: Vec3::new(38.0, 10.0, 10.0),
            material: PhysicsMaterial::default(),
            balloons: [
                BalloonSpec {
                    radius: 30.0,
                    mass: 1.0,
                    lift: 400.0,
                    health: 50.0,
                    gravity_share: 0.15,
                    anchor: Vec3::new(25.0, 57.0, 0.0),
                    display_divisor: 5.0,
                },
                BalloonSpec {
                    radius: 18.0,
                    mass: 1.0,
                    lift: 300.0,
                    health: 35.0,
                    gravity_share: 0.10,
                    anchor: Vec3::new(-30.0, 39.0, 0.0),
                    display_divisor: 3.5,
                },
                BalloonSpec {
                    radius: 10.0,
                    mass: 1.0,
                    lift: 150.0,
                    health: 15.0,
                    gravity_share: 0.05,
                    anchor: Vec3::new(-22.0, 71.0, 0.0),
                    display_divisor: 1.5,
                },
            ],
            base_gravity_offset: 0.3,

            control_zone_half_extents: Vec3::new(8.0, 45.0, 5.0),
            control_zone_anchor: Vec3::new(2.0, 10.0, 0.0),

            float_amplitude: 7.0,
            float_step: 0.005,

            momentum_step: 0.01,
            momentum_cap: 0.1,
            momentum_decay: 0.0005,

            aim_min_deg: -45.0,
            aim_max_deg: 22.0,

            turret_base_offset: Vec3::new(-36.0, 11.0, 0.0),
            turret_barrel_offset: Vec3::new(-36.0, 15.0, 0.0),
            turret_base_half_extents: Vec3::new(1.5, 4.0, 1.5),
            turret_barrel_half_extents: Vec3::new(1.5, 5.0, 1.5),
            cloth_offset: Vec3::new(40.0, -10.0, 0.0),

            cannon: CannonSpec::default(),
            projectiles: ProjectilePolicy::default(),
            autopilot: AutopilotTuning::default(),
            cloth: ClothDecoration::default(),
        }
    }
}
