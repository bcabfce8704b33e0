use bevy_math::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Linear RGBA colour carried on every cloth vertex and balloon tint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn grey(v: f32) -> Self {
        Self::new(v, v, v, 1.0)
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::grey(1.0)
    }
}

/// Project a world point into normalized device coordinates.
///
/// Only X/Y of `point` are used; the point is lifted onto the z = 1 plane
/// before the perspective divide, matching how turret aim has always been
/// computed.
pub fn world_to_ndc(view_proj: Mat4, point: Vec3) -> Vec2 {
    view_proj
        .project_point3(Vec3::new(point.x, point.y, 1.0))
        .truncate()
}

/// Convert a mouse position in window pixels (origin top-left) to NDC.
pub fn pixels_to_ndc(mouse: Vec2, viewport: Vec2) -> Vec2 {
    let half = (viewport * 0.5).max(Vec2::splat(1e-3));
    Vec2::new((mouse.x - half.x) / half.x, (half.y - mouse.y) / half.y)
}

/// Angle in degrees of the screen-space vector pointing from `to` back to `from`.
pub fn screen_angle_deg(from: Vec2, to: Vec2) -> f32 {
    (from.y - to.y).atan2(from.x - to.x).to_degrees()
}
