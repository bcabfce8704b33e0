use bevy_math::Vec3;
use rand::Rng;

use crate::collab::Particle;

/// Largest accepted grid resolution (interior columns).
pub const MAX_RESOLUTION: u32 = 512;

/// Particles per grid edge for a given resolution.
pub fn vertex_res(resolution: u32) -> usize {
    resolution as usize + 2
}

#[derive(Debug, Clone)]
pub struct ClothGrid {
    pub vertex_res: usize,
    pub particles: Vec<Particle>,
    pub quads: Vec<[u32; 4]>,
}

impl ClothGrid {
    pub fn index_count(&self) -> usize {
        self.quads.len() * 4
    }
}

/// Lay out a `vertex_res x vertex_res` particle sheet on the XY plane.
///
/// X spans `[-width/2, width/2]`, Y hangs down from 0 to `-length`. Every
/// particle gets an inverse mass drawn from `[1.0, 1.01]`; the top row is
/// pinned.
pub fn build_grid<R: Rng>(width: f32, length: f32, resolution: u32, rng: &mut R) -> ClothGrid {
    let res = vertex_res(resolution);
    let half_width = width * 0.5;
    let step_x = width / (res - 1) as f32;
    let step_y = length / (res - 1) as f32;

    let mut particles = Vec::with_capacity(res * res);
    for y in 0..res {
        for x in 0..res {
            let position = Vec3::new(-half_width + x as f32 * step_x, -(y as f32) * step_y, 0.0);
            particles.push(Particle::new(position, rng.gen_range(1.0..=1.01)));
        }
    }
    for p in particles.iter_mut().take(res) {
        p.inv_mass = 0.0;
    }

    ClothGrid { vertex_res: res, particles, quads: quad_indices(res) }
}

/// Row-major quads, each wound top-left, top-right, bottom-right, bottom-left.
pub fn quad_indices(vertex_res: usize) -> Vec<[u32; 4]> {
    let cells = vertex_res.saturating_sub(1);
    let mut quads = Vec::with_capacity(cells * cells);
    for y in 0..cells {
        for x in 0..cells {
            let top = (y * vertex_res + x) as u32;
            let bottom = ((y + 1) * vertex_res + x) as u32;
            quads.push([top, top + 1, bottom + 1, bottom]);
        }
    }
    quads
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn quads_wind_clockwise_from_top_left() {
        let quads = quad_indices(3);
        assert_eq!(quads.len(), 4);
        assert_eq!(quads[0], [0, 1, 4, 3]);
        assert_eq!(quads[3], [4, 5, 8, 7]);
    }

    #[test]
    fn only_the_top_row_is_pinned() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = build_grid(4.0, 2.0, 1, &mut rng);
        assert_eq!(grid.vertex_res, 3);
        assert_eq!(grid.index_count(), 16);
        for (i, p) in grid.particles.iter().enumerate() {
            if i < 3 {
                assert_eq!(p.inv_mass, 0.0, "particle {i} should be pinned");
            } else {
                assert!((1.0..=1.01).contains(&p.inv_mass), "particle {i}: {}", p.inv_mass);
            }
        }
    }
}
