use bevy_math::Vec3;

use crate::collab::Particle;

/// Face-weighted vertex normals, rebuilt from scratch.
///
/// Each quad contributes `(p1 - p0) x (p2 - p0) / normalizer` to all four of
/// its corners. The result is left unnormalized; the per-frame mesh refresh
/// uses it as is.
pub fn weighted_normals(
    particles: &[Particle],
    quads: &[[u32; 4]],
    normalizer: f32,
    out: &mut Vec<Vec3>,
) {
    out.clear();
    out.resize(particles.len(), Vec3::ZERO);
    let inv = normalizer.recip();
    for quad in quads {
        let p0 = particles[quad[0] as usize].position;
        let p1 = particles[quad[1] as usize].position;
        let p2 = particles[quad[2] as usize].position;
        let n = (p1 - p0).cross(p2 - p0) * inv;
        for &i in quad {
            out[i as usize] += n;
        }
    }
}

/// [`weighted_normals`] followed by a per-vertex normalize.
pub fn unit_normals(particles: &[Particle], quads: &[[u32; 4]], normalizer: f32, out: &mut Vec<Vec3>) {
    weighted_normals(particles, quads, normalizer, out);
    for n in out.iter_mut() {
        *n = n.normalize_or_zero();
    }
}
