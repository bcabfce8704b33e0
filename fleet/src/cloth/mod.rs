//! Particle-grid cloth proxy: topology, normals and render-mesh sync.

mod mesh;
mod normals;
mod settings;
mod surface;
mod topology;

pub use mesh::{QuadMesh, QuadVertex};
pub use normals::{unit_normals, weighted_normals};
pub use settings::ClothSettings;
pub use surface::ClothSurface;
pub use topology::{build_grid, quad_indices, vertex_res, ClothGrid, MAX_RESOLUTION};
