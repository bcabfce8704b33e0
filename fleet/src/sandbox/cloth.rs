use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use bevy_math::Vec3;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::debug;

use crate::collab::{
    ClothFlag, ClothFlags, ClothSimulation, ClothSolver, CollisionPlane, FabricDesc, Particle,
    StretchPhase,
};

const CONSTRAINT_ITERATIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Constraint {
    a: u32,
    b: u32,
    rest: f32,
    phase: StretchPhase,
}

/// Distance constraints cooked from a quad grid.
#[derive(Debug, Clone)]
pub struct SandboxFabric {
    constraints: Arc<[Constraint]>,
    gravity_dir: Vec3,
}

impl SandboxFabric {
    pub fn constraint_count(&self, phase: StretchPhase) -> usize {
        self.constraints.iter().filter(|c| c.phase == phase).count()
    }

    pub fn gravity_dir(&self) -> Vec3 {
        self.gravity_dir
    }
}

#[derive(Debug)]
struct ClothState {
    particles: Vec<Particle>,
    previous: Vec<Vec3>,
    constraints: Arc<[Constraint]>,
    flags: ClothFlags,

    solver_frequency: f32,
    inertia_scale: f32,
    stiffness: [f32; 4],
    planes: Vec<CollisionPlane>,
    convexes: Vec<u32>,
    external_acceleration: Vec3,
    self_collision_distance: f32,
    drag: f32,

    pose: Vec3,
    last_pose: Vec3,
}

impl ClothState {
    fn step(&mut self, gravity: Vec3, dt: f32) {
        // Carry part of the frame motion into the free particles.
        let moved = self.pose - self.last_pose;
        self.last_pose = self.pose;
        if moved != Vec3::ZERO {
            let lag = moved * self.inertia_scale;
            for (p, prev) in self.particles.iter_mut().zip(&mut self.previous) {
                if !p.is_pinned() {
                    p.position -= lag;
                    *prev -= lag;
                }
            }
        }

        let substeps = (self.solver_frequency * dt).ceil().max(1.0) as usize;
        let h = dt / substeps as f32;
        let accel = gravity + self.external_acceleration;
        let keep = (1.0 - self.drag * h).clamp(0.0, 1.0);

        for _ in 0..substeps {
            for (p, prev) in self.particles.iter_mut().zip(&mut self.previous) {
                if p.is_pinned() {
                    continue;
                }
                let velocity = (p.position - *prev) * keep;
                *prev = p.position;
                p.position += velocity + accel * h * h;
            }
            for _ in 0..CONSTRAINT_ITERATIONS {
                self.relax();
            }
            self.collide();
        }
    }

    fn relax(&mut self) {
        for c in self.constraints.iter() {
            let (a, b) = (c.a as usize, c.b as usize);
            let (pa, pb) = (self.particles[a], self.particles[b]);
            let w = pa.inv_mass + pb.inv_mass;
            if w <= 0.0 {
                continue;
            }
            let delta = pb.position - pa.position;
            let len = delta.length();
            if len <= f32::EPSILON {
                continue;
            }
            let correction = delta * ((len - c.rest) / len) * self.stiffness[c.phase.index()];
            self.particles[a].position += correction * (pa.inv_mass / w);
            self.particles[b].position -= correction * (pb.inv_mass / w);
        }
    }

    fn collide(&mut self) {
        for &mask in &self.convexes {
            let planes: Vec<CollisionPlane> = self
                .planes
                .iter()
                .enumerate()
                .filter(|(i, _)| *i < 32 && mask & (1 << i) != 0)
                .map(|(_, plane)| *plane)
                .collect();
            if planes.is_empty() {
                continue;
            }
            for p in self.particles.iter_mut().filter(|p| !p.is_pinned()) {
                let inside = planes.iter().all(|pl| pl.normal.dot(p.position) + pl.distance < 0.0);
                if !inside {
                    continue;
                }
                // Push out through the shallowest plane.
                let (plane, depth) = planes
                    .iter()
                    .map(|pl| (pl, pl.normal.dot(p.position) + pl.distance))
                    .fold((planes[0], f32::NEG_INFINITY), |best, (pl, d)| {
                        if d > best.1 { (*pl, d) } else { best }
                    });
                p.position -= plane.normal * depth;
            }
        }
    }
}

/// Verlet cloth solver for headless runs. Particles live in the cloth's local
/// frame; self collision distance is stored but not simulated.
#[derive(Debug)]
pub struct SandboxClothSolver {
    gravity: Vec3,
    simulations: Vec<Weak<Mutex<ClothState>>>,
}

impl Default for SandboxClothSolver {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl SandboxClothSolver {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity, simulations: Vec::new() }
    }

    /// Advance every live simulation.
    pub fn step(&mut self, dt: f32) {
        self.simulations.retain(|weak| weak.strong_count() > 0);
        for weak in &self.simulations {
            if let Some(state) = weak.upgrade() {
                state.lock().step(self.gravity, dt);
            }
        }
    }

    pub fn live_simulations(&self) -> usize {
        self.simulations.iter().filter(|w| w.strong_count() > 0).count()
    }
}

impl ClothSolver for SandboxClothSolver {
    type Fabric = SandboxFabric;
    type Simulation = SandboxClothSimulation;

    fn build_fabric(&mut self, desc: FabricDesc<'_>, gravity_dir: Vec3) -> SandboxFabric {
        let constraints = cook_constraints(desc.particles, desc.quads);
        debug!(constraints = constraints.len(), "fabric cooked");
        SandboxFabric { constraints: constraints.into(), gravity_dir }
    }

    fn create_simulation(
        &mut self,
        pose: Vec3,
        fabric: &SandboxFabric,
        particles: &[Particle],
        flags: ClothFlags,
    ) -> SandboxClothSimulation {
        let state = Arc::new(Mutex::new(ClothState {
            particles: particles.to_vec(),
            previous: particles.iter().map(|p| p.position).collect(),
            constraints: fabric.constraints.clone(),
            flags,
            solver_frequency: 60.0,
            inertia_scale: 1.0,
            stiffness: [1.0; 4],
            planes: Vec::new(),
            convexes: Vec::new(),
            external_acceleration: Vec3::ZERO,
            self_collision_distance: 0.0,
            drag: 0.0,
            pose,
            last_pose: pose,
        }));
        self.simulations.push(Arc::downgrade(&state));
        SandboxClothSimulation { state }
    }
}

/// Handle to one live sandbox cloth.
#[derive(Debug)]
pub struct SandboxClothSimulation {
    state: Arc<Mutex<ClothState>>,
}

impl SandboxClothSimulation {
    pub fn pose(&self) -> Vec3 {
        self.state.lock().pose
    }

    pub fn flags(&self) -> ClothFlags {
        self.state.lock().flags
    }

    pub fn solver_frequency(&self) -> f32 {
        self.state.lock().solver_frequency
    }

    pub fn stretch_stiffness(&self, phase: StretchPhase) -> f32 {
        self.state.lock().stiffness[phase.index()]
    }

    pub fn collision_planes(&self) -> Vec<CollisionPlane> {
        self.state.lock().planes.clone()
    }

    pub fn external_acceleration(&self) -> Vec3 {
        self.state.lock().external_acceleration
    }

    pub fn self_collision_distance(&self) -> f32 {
        self.state.lock().self_collision_distance
    }

    pub fn drag(&self) -> f32 {
        self.state.lock().drag
    }
}

impl ClothSimulation for SandboxClothSimulation {
    type ParticleGuard<'a> = MappedMutexGuard<'a, [Particle]>;

    fn set_solver_frequency(&mut self, hz: f32) {
        self.state.lock().solver_frequency = hz.max(1.0);
    }

    fn set_inertia_scale(&mut self, scale: f32) {
        self.state.lock().inertia_scale = scale.clamp(0.0, 1.0);
    }

    fn set_flag(&mut self, flag: ClothFlag, enabled: bool) {
        let mut state = self.state.lock();
        match flag {
            ClothFlag::SceneCollision => state.flags.scene_collision = enabled,
            ClothFlag::SweptContact => state.flags.swept_contact = enabled,
        }
    }

    fn set_stretch_stiffness(&mut self, phase: StretchPhase, stiffness: f32) {
        self.state.lock().stiffness[phase.index()] = stiffness.clamp(0.0, 1.0);
    }

    fn add_collision_plane(&mut self, plane: CollisionPlane) {
        self.state.lock().planes.push(plane);
    }

    fn add_collision_convex(&mut self, plane_mask: u32) {
        self.state.lock().convexes.push(plane_mask);
    }

    fn set_external_acceleration(&mut self, acceleration: Vec3) {
        self.state.lock().external_acceleration = acceleration;
    }

    fn set_self_collision_distance(&mut self, distance: f32) {
        self.state.lock().self_collision_distance = distance;
    }

    fn set_drag_coefficient(&mut self, drag: f32) {
        self.state.lock().drag = drag.max(0.0);
    }

    fn set_target_pose(&mut self, position: Vec3) {
        self.state.lock().pose = position;
    }

    fn lock_particles(&self) -> MappedMutexGuard<'_, [Particle]> {
        MutexGuard::map(self.state.lock(), |state| state.particles.as_mut_slice())
    }
}

/// Structural (vertical/horizontal), shear and bending constraints for a quad grid.
fn cook_constraints(particles: &[Particle], quads: &[[u32; 4]]) -> Vec<Constraint> {
    let mut right = BTreeMap::new();
    let mut down = BTreeMap::new();
    let mut out = Vec::new();
    let push = |out: &mut Vec<Constraint>, a: u32, b: u32, phase: StretchPhase| {
        let (Some(pa), Some(pb)) = (particles.get(a as usize), particles.get(b as usize)) else {
            return;
        };
        out.push(Constraint { a, b, rest: pa.position.distance(pb.position), phase });
    };

    for &[tl, tr, br, bl] in quads {
        right.insert(tl, tr);
        right.insert(bl, br);
        down.insert(tl, bl);
        down.insert(tr, br);
        push(&mut out, tl, br, StretchPhase::Shearing);
        push(&mut out, tr, bl, StretchPhase::Shearing);
    }
    for (&a, &b) in &down {
        push(&mut out, a, b, StretchPhase::Vertical);
        if let Some(&c) = down.get(&b) {
            push(&mut out, a, c, StretchPhase::Bending);
        }
    }
    for (&a, &b) in &right {
        push(&mut out, a, b, StretchPhase::Horizontal);
        if let Some(&c) = right.get(&b) {
            push(&mut out, a, c, StretchPhase::Bending);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::{build_grid, vertex_res};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fabric_has_every_constraint_family() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = build_grid(4.0, 4.0, 1, &mut rng);
        let vr = vertex_res(1);
        let mut solver = SandboxClothSolver::default();
        let fabric = solver.build_fabric(
            FabricDesc { particles: &grid.particles, quads: &grid.quads },
            Vec3::NEG_Y,
        );
        // 3x3 vertices: 6 vertical, 6 horizontal, 2 per quad shearing, 3+3 bending.
        assert_eq!(vr, 3);
        assert_eq!(fabric.constraint_count(StretchPhase::Vertical), 6);
        assert_eq!(fabric.constraint_count(StretchPhase::Horizontal), 6);
        assert_eq!(fabric.constraint_count(StretchPhase::Shearing), 8);
        assert_eq!(fabric.constraint_count(StretchPhase::Bending), 6);
    }

    #[test]
    fn pinned_row_holds_and_cloth_stays_below_the_pole() {
        let mut rng = StdRng::seed_from_u64(9);
        let grid = build_grid(8.0, 12.0, 4, &mut rng);
        let mut solver = SandboxClothSolver::default();
        let fabric = solver.build_fabric(
            FabricDesc { particles: &grid.particles, quads: &grid.quads },
            Vec3::NEG_Y,
        );
        let mut sim =
            solver.create_simulation(Vec3::ZERO, &fabric, &grid.particles, ClothFlags::default());
        sim.set_solver_frequency(240.0);
        sim.add_collision_plane(CollisionPlane { normal: Vec3::NEG_Y, distance: 0.0 });
        sim.add_collision_convex(1);
        sim.set_external_acceleration(Vec3::new(0.0, 30.0, 0.0));

        for _ in 0..120 {
            solver.step(1.0 / 60.0);
        }
        let live = sim.lock_particles();
        for (before, now) in grid.particles.iter().zip(live.iter()) {
            if before.is_pinned() {
                assert_eq!(before.position, now.position);
            }
            assert!(now.position.y <= 1e-4, "particle rose above the pole: {:?}", now.position);
            assert!(now.position.is_finite());
        }
    }

    #[test]
    fn dropped_simulation_leaves_the_solver() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = build_grid(1.0, 1.0, 0, &mut rng);
        let mut solver = SandboxClothSolver::default();
        let fabric = solver.build_fabric(
            FabricDesc { particles: &grid.particles, quads: &grid.quads },
            Vec3::NEG_Y,
        );
        let sim = solver.create_simulation(Vec3::ZERO, &fabric, &grid.particles, ClothFlags::default());
        assert_eq!(solver.live_simulations(), 1);
        drop(sim);
        solver.step(0.016);
        assert_eq!(solver.live_simulations(), 0);
    }
}
