//! Gameplay core for the skyfleet prototype.
//!
//! No windowing or renderer types live here. Rigid bodies and the cloth
//! solver are consumed through the traits in [`collab`]; [`sandbox`] has
//! headless implementations of both.

mod math;
pub use math::{pixels_to_ndc, screen_angle_deg, world_to_ndc, Rgba};

mod error;
pub use error::FleetError;

pub mod collab;
pub use collab::{
    AxisLocks, BodyDesc, BodyHandle, BodyKind, ClothFlag, ClothFlags, ClothSimulation,
    ClothSolver, ColliderDesc, ColliderTag, CollisionPlane, FabricDesc, ForceMode, JointHandle,
    Particle, PhysicsMaterial, PhysicsWorld, ProjectileId, RayHit, Shape, StretchPhase,
    TriggerAction, TriggerEvent, VesselId,
};

mod input;
pub use input::{CameraView, FrameInfo, FrameInput};

pub mod scene;
pub use scene::{EntityId, Scene, Transform};

pub mod cloth;
pub use cloth::{ClothSettings, ClothSurface, QuadMesh, QuadVertex};

pub mod vessel;
pub use vessel::{
    BalloonTier, CompositeVessel, ControlMode, HullPositions, VesselPart, VesselTuning,
};

mod scheduler;
pub use scheduler::Fleet;

pub mod sandbox;
