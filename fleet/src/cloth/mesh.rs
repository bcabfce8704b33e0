use bevy_math::Vec3;

use crate::math::Rgba;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Rgba,
}

/// Dynamically rebuilt list of independent quads (no shared vertices).
///
/// The renderer polls [`QuadMesh::take_upload`]; a new revision is published
/// by [`QuadMesh::mark_for_upload`].
#[derive(Debug, Clone, Default)]
pub struct QuadMesh {
    vertices: Vec<QuadVertex>,
    revision: u64,
    uploaded: u64,
}

impl QuadMesh {
    pub fn with_capacity(quads: usize) -> Self {
        Self { vertices: Vec::with_capacity(quads * 4), ..Default::default() }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn add_quad(&mut self, quad: [QuadVertex; 4]) {
        self.vertices.extend_from_slice(&quad);
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn quads(&self) -> impl Iterator<Item = &[QuadVertex]> {
        self.vertices.chunks_exact(4)
    }

    pub fn mark_for_upload(&mut self) {
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Vertices changed since the last call, if any.
    pub fn take_upload(&mut self) -> Option<&[QuadVertex]> {
        if self.uploaded == self.revision {
            return None;
        }
        self.uploaded = self.revision;
        Some(&self.vertices)
    }
}
