//! 2D Viewport
//!
//! A region of the window that shows the world through a camera. The
//! viewport owns the world↔window transform and the world-space box that
//! culling code tests against.

use glam::Vec2;

/// Camera-backed window region.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    /// Window-space center of the region.
    pub center: Vec2,
    /// Window-space size of the region.
    pub size: Vec2,
    /// World position the camera looks at.
    pub cam_pos: Vec2,
    /// Pixels per world unit.
    pub cam_zoom: f32,
    /// Extra world units added around the visible box, so things just
    /// past the edge still count as on-screen.
    pub box_margin: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            size: Vec2::ZERO,
            cam_pos: Vec2::ZERO,
            cam_zoom: 1.0,
            box_margin: 0.0,
        }
    }
}

impl Viewport {
    /// Viewport covering a whole window of the given size.
    pub fn full_window(window_size: Vec2) -> Self {
        Self {
            center: window_size / 2.0,
            size: window_size,
            ..Default::default()
        }
    }

    pub fn with_camera(mut self, cam_pos: Vec2, cam_zoom: f32) -> Self {
        self.cam_pos = cam_pos;
        self.cam_zoom = cam_zoom;
        self
    }

    /// Zero-area or zero-zoom viewports see nothing and cull nothing.
    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0 || self.cam_zoom <= 0.0
    }

    pub fn world_to_window(&self, p: Vec2) -> Vec2 {
        (p - self.cam_pos) * self.cam_zoom + self.center
    }

    pub fn window_to_world(&self, p: Vec2) -> Vec2 {
        if self.cam_zoom == 0.0 {
            return self.cam_pos;
        }
        (p - self.center) / self.cam_zoom + self.cam_pos
    }

    /// World-space `(top_left, bottom_right)` of what the camera sees,
    /// margin included.
    pub fn world_box(&self) -> (Vec2, Vec2) {
        let half = self.size / 2.0;
        let tl = self.window_to_world(self.center - half) - Vec2::splat(self.box_margin);
        let br = self.window_to_world(self.center + half) + Vec2::splat(self.box_margin);
        (tl, br)
    }

    /// Whether a world point is inside the box. Degenerate viewports
    /// contain everything.
    pub fn contains_world_point(&self, p: Vec2) -> bool {
        if self.is_degenerate() {
            return true;
        }
        let (tl, br) = self.world_box();
        p.x >= tl.x && p.x <= br.x && p.y >= tl.y && p.y <= br.y
    }
}
