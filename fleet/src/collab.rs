//! Contracts for the engine services the gameplay core consumes.
//!
//! Nothing in here is implemented by the core itself. An engine adapter (or
//! the reference collaborators in [`crate::sandbox`]) provides the rigid-body
//! world and the deformable-surface solver.

use std::ops::Deref;

use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::vessel::BalloonTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VesselId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointHandle(pub u32);

/// Typed identity carried on every collider. Collision routing matches on
/// these instead of comparing tag strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColliderTag {
    Hull(VesselId),
    Balloon(VesselId, BalloonTier),
    ControlZone(VesselId),
    Turret(VesselId),
    Projectile(VesselId, ProjectileId),
    Player,
    Scenery,
}

impl ColliderTag {
    /// The vessel this collider belongs to, if any.
    pub fn vessel(&self) -> Option<VesselId> {
        match *self {
            ColliderTag::Hull(v)
            | ColliderTag::Balloon(v, _)
            | ColliderTag::ControlZone(v)
            | ColliderTag::Turret(v)
            | ColliderTag::Projectile(v, _) => Some(v),
            ColliderTag::Player | ColliderTag::Scenery => None,
        }
    }
}

// ----- Rigid bodies -----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Moved explicitly by gameplay code; ignores forces.
    Kinematic,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec3,
    pub mass: f32,
}

impl BodyDesc {
    pub fn kinematic(position: Vec3) -> Self {
        Self { kind: BodyKind::Kinematic, position, mass: 1.0 }
    }

    pub fn dynamic(position: Vec3, mass: f32) -> Self {
        Self { kind: BodyKind::Dynamic, position, mass }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self { static_friction: 0.5, dynamic_friction: 0.5, restitution: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Static triangle mesh loaded by the engine from `asset`. `half_extents`
    /// bounds the mesh for collaborators that cannot load the asset.
    TriangleMesh { asset: String, half_extents: Vec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColliderDesc {
    pub shape: Shape,
    pub material: PhysicsMaterial,
    /// Trigger volumes never collide; they only report enter/leave.
    pub is_trigger: bool,
    pub tag: ColliderTag,
}

impl ColliderDesc {
    pub fn solid(shape: Shape, material: PhysicsMaterial, tag: ColliderTag) -> Self {
        Self { shape, material, is_trigger: false, tag }
    }

    pub fn trigger(shape: Shape, material: PhysicsMaterial, tag: ColliderTag) -> Self {
        Self { shape, material, is_trigger: true, tag }
    }
}

/// Per-axis motion locks. `true` means the axis is frozen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisLocks {
    pub translation: [bool; 3],
    pub rotation: [bool; 3],
}

impl AxisLocks {
    /// Free to spin about the forward (Z) axis only.
    pub const ROLL_ONLY: Self = Self { translation: [false; 3], rotation: [true, true, false] };
    /// Confined to the XY firing plane.
    pub const PLANAR_XY: Self = Self { translation: [false, false, true], rotation: [false; 3] };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, integrated over the next step.
    Force,
    /// Instantaneous change in momentum.
    Impulse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub tag: ColliderTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    Enter,
    Leave,
}

/// Overlap report: `trigger` is the trigger collider, `other` whatever touched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub trigger: ColliderTag,
    pub other: ColliderTag,
    pub action: TriggerAction,
}

/// Rigid-body, joint and query services.
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;
    fn attach_collider(&mut self, body: BodyHandle, collider: ColliderDesc);
    fn remove_body(&mut self, body: BodyHandle);
    fn set_axis_locks(&mut self, body: BodyHandle, locks: AxisLocks);
    fn body_position(&self, body: BodyHandle) -> Option<Vec3>;
    /// Teleport a body (kinematic bodies use this as their move target).
    fn set_body_position(&mut self, body: BodyHandle, position: Vec3);
    fn set_body_rotation(&mut self, body: BodyHandle, rotation: Quat);
    fn add_force(&mut self, body: BodyHandle, force: Vec3, mode: ForceMode);
    /// Breakable fixed joint pinning `b` to `a` at the given local anchors.
    fn create_fixed_joint(
        &mut self,
        a: BodyHandle,
        local_a: Vec3,
        b: BodyHandle,
        local_b: Vec3,
    ) -> JointHandle;
    fn release_joint(&mut self, joint: JointHandle);
    /// Closest blocking hit along `direction` (unit length) within
    /// `max_distance`. Triggers and colliders owned by `exclude` are skipped.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<VesselId>,
    ) -> Option<RayHit>;
    fn drain_trigger_events(&mut self) -> Vec<TriggerEvent>;
}

// ----- Deformable surfaces -----

/// One mass point of a deformable surface. `inv_mass == 0` pins it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub position: Vec3,
    pub inv_mass: f32,
}

impl Particle {
    pub const fn new(position: Vec3, inv_mass: f32) -> Self {
        Self { position, inv_mass }
    }

    pub fn is_pinned(&self) -> bool {
        self.inv_mass == 0.0
    }
}

/// Topology + mass description handed to the solver to build a fabric.
#[derive(Debug, Clone, Copy)]
pub struct FabricDesc<'a> {
    pub particles: &'a [Particle],
    /// Quads as (top-left, top-right, bottom-right, bottom-left).
    pub quads: &'a [[u32; 4]],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClothFlag {
    SceneCollision,
    SweptContact,
}

/// Flags passed at simulation creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClothFlags {
    pub scene_collision: bool,
    pub swept_contact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StretchPhase {
    Vertical,
    Horizontal,
    Shearing,
    Bending,
}

impl StretchPhase {
    pub const ALL: [StretchPhase; 4] = [
        StretchPhase::Vertical,
        StretchPhase::Horizontal,
        StretchPhase::Shearing,
        StretchPhase::Bending,
    ];

    pub fn index(self) -> usize {
        match self {
            StretchPhase::Vertical => 0,
            StretchPhase::Horizontal => 1,
            StretchPhase::Shearing => 2,
            StretchPhase::Bending => 3,
        }
    }
}

/// Plane `normal · p + distance = 0` in the cloth's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionPlane {
    pub normal: Vec3,
    pub distance: f32,
}

/// Builds fabrics and binds them into live simulations.
pub trait ClothSolver {
    type Fabric;
    type Simulation: ClothSimulation;

    fn build_fabric(&mut self, desc: FabricDesc<'_>, gravity_dir: Vec3) -> Self::Fabric;
    fn create_simulation(
        &mut self,
        pose: Vec3,
        fabric: &Self::Fabric,
        particles: &[Particle],
        flags: ClothFlags,
    ) -> Self::Simulation;
}

/// A live deformable surface.
pub trait ClothSimulation {
    /// Scoped read access to the live particle buffer; unlocks on drop.
    type ParticleGuard<'a>: Deref<Target = [Particle]>
    where
        Self: 'a;

    fn set_solver_frequency(&mut self, hz: f32);
    fn set_inertia_scale(&mut self, scale: f32);
    fn set_flag(&mut self, flag: ClothFlag, enabled: bool);
    fn set_stretch_stiffness(&mut self, phase: StretchPhase, stiffness: f32);
    fn add_collision_plane(&mut self, plane: CollisionPlane);
    /// Convex made of the planes selected by `plane_mask` (bit i = plane i).
    fn add_collision_convex(&mut self, plane_mask: u32);
    fn set_external_acceleration(&mut self, acceleration: Vec3);
    fn set_self_collision_distance(&mut self, distance: f32);
    fn set_drag_coefficient(&mut self, drag: f32);
    fn set_target_pose(&mut self, position: Vec3);
    fn lock_particles(&self) -> Self::ParticleGuard<'_>;
}
