use bevy_math::{Mat4, Vec2, Vec3};

/// Snapshot of the player's inputs for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// True only on the frame the control action was triggered.
    pub toggle_control: bool,
    /// Mouse position in window pixels, origin top-left.
    pub mouse_position: Vec2,
    pub fire: bool,
}

/// Frame timing. Gameplay tuning is expressed per reference frame, so motion
/// is scaled by `dt_factor` (≈ 1 when running at the reference rate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub delta_seconds: f32,
    pub fps: f32,
}

impl FrameInfo {
    pub fn fixed(hz: f32) -> Self {
        let hz = hz.max(1.0);
        Self { delta_seconds: 1.0 / hz, fps: hz }
    }

    pub fn dt_factor(&self) -> f32 {
        self.fps * self.delta_seconds
    }
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self::fixed(60.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view_proj: Mat4,
    /// Window size in pixels.
    pub viewport: Vec2,
}

impl CameraView {
    /// Side-on orthographic camera looking down -Z at `center`, showing
    /// `half_extents` world units either side.
    pub fn orthographic(center: Vec2, half_extents: Vec2, viewport: Vec2) -> Self {
        let eye = Vec3::new(center.x, center.y, 500.0);
        let view = Mat4::look_at_rh(eye, Vec3::new(center.x, center.y, 0.0), Vec3::Y);
        let proj = Mat4::orthographic_rh(
            -half_extents.x,
            half_extents.x,
            -half_extents.y,
            half_extents.y,
            0.1,
            1000.0,
        );
        Self { view_proj: proj * view, viewport }
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self::orthographic(Vec2::ZERO, Vec2::new(400.0, 225.0), Vec2::new(1280.0, 720.0))
    }
}
