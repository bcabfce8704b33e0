//! Reference collaborators for headless runs and tests.
//!
//! Just enough rigid-body and cloth behaviour for the vessel logic to run end
//! to end without an engine.

mod cloth;
mod physics;

pub use cloth::{SandboxClothSimulation, SandboxClothSolver, SandboxFabric};
pub use physics::{SandboxPhysics, SandboxStats};

use crate::input::{CameraView, FrameInfo, FrameInput};
use crate::scheduler::Fleet;
use crate::vessel::VesselTuning;

/// A fleet wired to the sandbox collaborators.
pub type SandboxFleet = Fleet<SandboxPhysics, SandboxClothSolver>;

impl Fleet<SandboxPhysics, SandboxClothSolver> {
    pub fn sandbox(tuning: VesselTuning, seed: u64) -> Self {
        Fleet::new(SandboxPhysics::default(), SandboxClothSolver::default(), tuning, seed)
    }

    /// Gameplay step, then physics and cloth, then pull positions back.
    pub fn advance(&mut self, frame: &FrameInfo, input: &FrameInput, camera: &CameraView) {
        self.step(frame, input, camera);
        self.physics_mut().step(frame.delta_seconds);
        self.cloth_solver_mut().step(frame.delta_seconds);
        self.sync_from_physics();
    }
}
