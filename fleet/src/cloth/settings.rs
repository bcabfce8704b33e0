use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::collab::{ClothFlag, ClothSimulation, CollisionPlane, StretchPhase};

/// Solver parameters applied once a cloth simulation has been created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothSettings {
    pub solver_frequency: f32,
    pub inertia_scale: f32,
    pub scene_collision: bool,
    pub swept_contact: bool,
    /// Stretch stiffness per phase: vertical, horizontal, shearing, bending.
    pub stretch_stiffness: [f32; 4],
    pub collision_plane: CollisionPlane,
    pub self_collision_distance: f32,
    pub drag: f32,
    /// Direction the fabric builder treats as "down".
    pub gravity_dir: Vec3,
}

impl Default for ClothSettings {
    fn default() -> Self {
        Self {
            solver_frequency: 240.0,
            inertia_scale: 0.5,
            scene_collision: true,
            swept_contact: true,
            stretch_stiffness: [1.0, 0.9, 0.75, 0.5],
            collision_plane: CollisionPlane { normal: Vec3::new(0.0, -1.0, 0.0), distance: 0.0 },
            self_collision_distance: 0.02,
            drag: 0.2,
            gravity_dir: Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

impl ClothSettings {
    pub(super) fn apply<S: ClothSimulation>(&self, sim: &mut S, external_acceleration: Vec3) {
        sim.set_solver_frequency(self.solver_frequency);
        sim.set_inertia_scale(self.inertia_scale);
        sim.set_flag(ClothFlag::SceneCollision, self.scene_collision);
        sim.set_flag(ClothFlag::SweptContact, self.swept_contact);
        for phase in StretchPhase::ALL {
            sim.set_stretch_stiffness(phase, self.stretch_stiffness[phase.index()]);
        }
        sim.add_collision_plane(self.collision_plane);
        // The convex references the first (and only) plane.
        sim.add_collision_convex(1 << 0);
        sim.set_external_acceleration(external_acceleration);
        sim.set_self_collision_distance(self.self_collision_distance);
        sim.set_drag_coefficient(self.drag);
    }
}
