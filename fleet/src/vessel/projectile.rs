use std::f32::consts::PI;

use bevy_math::Vec3;

use super::aim::mirrored_lift;
use super::tuning::CannonSpec;
use crate::collab::{BodyHandle, ProjectileId};
use crate::scene::EntityId;

/// A fired cannonball.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub entity: EntityId,
    pub body: BodyHandle,
    pub damage: f32,
    /// Seconds since launch.
    pub age: f32,
    active: bool,
}

impl Projectile {
    pub fn new(id: ProjectileId, entity: EntityId, body: BodyHandle, damage: f32) -> Self {
        Self { id, entity, body, damage, age: 0.0, active: true }
    }

    /// False once the projectile has dealt its damage.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Consume the projectile's hit. Returns the damage on the first call and
    /// `None` afterwards.
    pub fn strike(&mut self) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(self.damage)
    }
}

/// Spawn point and launch impulse for a shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub position: Vec3,
    pub impulse: Vec3,
}

/// Work out where a shot leaves the barrel and how hard it is kicked.
///
/// Left-facing turrets project the muzzle along the barrel angle and fire
/// back along it. Right-facing turrets spawn ahead of the barrel and derive
/// the vertical kick from the stored aim vector via [`mirrored_lift`].
pub fn launch(
    facing_left: bool,
    barrel: Vec3,
    barrel_angle: f32,
    aim_vector: f32,
    cannon: &CannonSpec,
) -> Launch {
    if facing_left {
        let (sin, cos) = barrel_angle.sin_cos();
        Launch {
            position: Vec3::new(
                barrel.x - cos * cannon.muzzle_offset,
                barrel.y - sin * cannon.muzzle_offset,
                0.0,
            ),
            impulse: Vec3::new(-cos * cannon.power, -sin * cannon.power * 2.0, 0.0),
        }
    } else {
        let sin = (barrel_angle + PI).sin();
        Launch {
            position: Vec3::new(
                barrel.x + cannon.mirrored_muzzle_x,
                barrel.y + sin * cannon.muzzle_offset,
                0.0,
            ),
            impulse: Vec3::new(cannon.power, mirrored_lift(aim_vector) * 100.0, 0.0),
        }
    }
}
