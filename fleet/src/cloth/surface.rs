use bevy_math::Vec3;
use rand::Rng;
use tracing::debug;

use super::mesh::{QuadMesh, QuadVertex};
use super::normals::{unit_normals, weighted_normals};
use super::settings::ClothSettings;
use super::topology::{build_grid, vertex_res, MAX_RESOLUTION};
use crate::collab::{ClothFlags, ClothSimulation, ClothSolver, FabricDesc, Particle};
use crate::error::FleetError;
use crate::math::Rgba;

// Normalizer divisors used at setup and per frame. The setup result is
// normalized afterwards, so only the per-frame value affects shading.
const SETUP_NORMALIZER: f32 = 3.0;
const FRAME_NORMALIZER: f32 = 1.0;

/// A rectangular cloth driven by an external deformable-body solver and
/// mirrored into a [`QuadMesh`] every frame.
pub struct ClothSurface<S> {
    width: f32,
    length: f32,
    resolution: u32,
    color: Rgba,
    external_acceleration: Vec3,
    settings: ClothSettings,

    particles: Vec<Particle>,
    quads: Vec<[u32; 4]>,
    normals: Vec<Vec3>,
    mesh: QuadMesh,
    simulation: Option<S>,
}

impl<S: ClothSimulation> ClothSurface<S> {
    /// Store the cloth parameters. No simulation state exists until [`Self::setup`].
    pub fn new(
        width: f32,
        length: f32,
        resolution: u32,
        color: Rgba,
        external_acceleration: f32,
    ) -> Result<Self, FleetError> {
        for (what, value) in [("width", width), ("length", length)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FleetError::InvalidClothDimension { what, value });
            }
        }
        if resolution > MAX_RESOLUTION {
            return Err(FleetError::ResolutionTooLarge { resolution, max: MAX_RESOLUTION });
        }
        if !color.is_finite() {
            return Err(FleetError::NonFinite { what: "cloth color" });
        }
        if !external_acceleration.is_finite() {
            return Err(FleetError::NonFinite { what: "cloth external acceleration" });
        }

        Ok(Self {
            width,
            length,
            resolution,
            color,
            external_acceleration: Vec3::splat(external_acceleration),
            settings: ClothSettings::default(),
            particles: Vec::new(),
            quads: Vec::new(),
            normals: Vec::new(),
            mesh: QuadMesh::default(),
            simulation: None,
        })
    }

    pub fn with_settings(mut self, settings: ClothSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Generate the grid, hand it to the solver and build the initial mesh.
    pub fn setup<C, R>(&mut self, solver: &mut C, world_position: Vec3, rng: &mut R)
    where
        C: ClothSolver<Simulation = S>,
        R: Rng,
    {
        let grid = build_grid(self.width, self.length, self.resolution, rng);
        self.particles = grid.particles;
        self.quads = grid.quads;

        let mut simulation = {
            // The fabric only lives long enough to seed the simulation.
            let fabric = solver.build_fabric(
                FabricDesc { particles: &self.particles, quads: &self.quads },
                self.settings.gravity_dir,
            );
            let flags = ClothFlags::default();
            solver.create_simulation(world_position, &fabric, &self.particles, flags)
        };
        self.settings.apply(&mut simulation, self.external_acceleration);

        unit_normals(&self.particles, &self.quads, SETUP_NORMALIZER, &mut self.normals);
        self.mesh = QuadMesh::with_capacity(self.quads.len());
        rebuild_mesh(&mut self.mesh, &self.particles, &self.quads, &self.normals, self.color);
        self.mesh.mark_for_upload();

        debug!(
            particles = self.particles.len(),
            quads = self.quads.len(),
            "cloth surface set up"
        );
        self.simulation = Some(simulation);
    }

    /// Follow `world_position` and mirror the live particles into the mesh.
    /// Rotation is not forwarded to the solver.
    pub fn update(&mut self, world_position: Vec3) {
        let Some(simulation) = self.simulation.as_mut() else {
            return;
        };
        simulation.set_target_pose(world_position);

        let live = simulation.lock_particles();
        weighted_normals(&live, &self.quads, FRAME_NORMALIZER, &mut self.normals);
        self.mesh.clear();
        rebuild_mesh(&mut self.mesh, &live, &self.quads, &self.normals, self.color);
        self.mesh.mark_for_upload();
    }

    pub fn set_external_acceleration(&mut self, acceleration: Vec3) {
        self.external_acceleration = acceleration;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_external_acceleration(acceleration);
        }
    }

    pub fn set_uniform_external_acceleration(&mut self, magnitude: f32) {
        self.set_external_acceleration(Vec3::splat(magnitude));
    }

    pub fn is_set_up(&self) -> bool {
        self.simulation.is_some()
    }

    pub fn vertex_res(&self) -> usize {
        vertex_res(self.resolution)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_res() * self.vertex_res()
    }

    pub fn quad_count(&self) -> usize {
        let cells = self.vertex_res() - 1;
        cells * cells
    }

    pub fn index_count(&self) -> usize {
        self.quad_count() * 4
    }

    /// Rest-pose particles produced at setup.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn quads(&self) -> &[[u32; 4]] {
        &self.quads
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn mesh(&self) -> &QuadMesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut QuadMesh {
        &mut self.mesh
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn external_acceleration(&self) -> Vec3 {
        self.external_acceleration
    }

    pub fn simulation(&self) -> Option<&S> {
        self.simulation.as_ref()
    }
}

fn rebuild_mesh(
    mesh: &mut QuadMesh,
    particles: &[Particle],
    quads: &[[u32; 4]],
    normals: &[Vec3],
    color: Rgba,
) {
    for quad in quads {
        mesh.add_quad(quad.map(|i| QuadVertex {
            position: particles[i as usize].position,
            normal: normals[i as usize],
            color,
        }));
    }
}
