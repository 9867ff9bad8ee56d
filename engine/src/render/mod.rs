//! Render Module
//!
//! The drawing seam between the engine core and a 2D backend. Engine code
//! draws through the [`Renderer`] trait only; [`MeshRenderer`] implements it by
//! tessellating everything into colored vertex batches a GPU backend can upload
//! as-is.
//!
//! Blend mode, clip rectangle and render target are ambient renderer state.
//! Code that changes them for a scoped draw does so through [`BlendGuard`],
//! [`ClipGuard`] and [`TargetGuard`], which restore the previous state when
//! dropped, including during unwinding.

pub mod mesh;

use std::ops::{Deref, DerefMut};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::Color;

pub use mesh::{BatchKey, ColoredVertex, DrawBatch, MeshRenderer, TextRun};

/// How drawn pixels combine with what is already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Alpha,
    /// Source color scaled by its alpha, added to the destination.
    Additive,
    /// Color channels add, alpha channel accumulates as
    /// `dst_a + src_a * (1 - dst_a)`. Used for edge offset buffers so
    /// overlapping strips don't double-darken.
    OffsetAccumulate,
}

/// Clip rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ClipRect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }
}

/// Handle to an off-screen buffer owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Where draw calls land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderTarget {
    #[default]
    Backbuffer,
    Buffer(BufferId),
}

/// Texture sampled by a primitive draw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Texture {
    Bitmap(String),
    Buffer(BufferId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimKind {
    TriangleList,
    TriangleFan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Immediate-mode 2D drawing interface.
pub trait Renderer {
    /// Draws a bitmap centered on `center`. A negative `size.y` keeps the
    /// bitmap's aspect ratio based on `size.x`.
    fn draw_bitmap(&mut self, bitmap: &str, center: Vec2, size: Vec2, angle: f32, tint: Color);

    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn draw_filled_rectangle(&mut self, tl: Vec2, br: Vec2, color: Color);

    fn draw_line(&mut self, p1: Vec2, p2: Vec2, color: Color, thickness: f32);

    /// Rounded rectangle. A thickness of 0 fills it.
    fn draw_rounded_rectangle(
        &mut self,
        center: Vec2,
        size: Vec2,
        radius: f32,
        color: Color,
        thickness: f32,
    );

    /// Text fitted inside `max_size` around `center`, then scaled by `scale`.
    fn draw_text(
        &mut self,
        text: &str,
        center: Vec2,
        max_size: Vec2,
        align: TextAlign,
        color: Color,
        scale: Vec2,
    );

    fn draw_prim(&mut self, vertices: &[ColoredVertex], kind: PrimKind, texture: Option<Texture>);

    fn clip_rect(&self) -> Option<ClipRect>;
    fn set_clip_rect(&mut self, clip: Option<ClipRect>);

    fn blend_mode(&self) -> BlendMode;
    fn set_blend_mode(&mut self, mode: BlendMode);

    fn target(&self) -> RenderTarget;
    fn set_target(&mut self, target: RenderTarget);

    /// Clears the current target.
    fn clear(&mut self, color: Color);
}

macro_rules! scoped_state_guard {
    ($(#[$doc:meta])* $name:ident, $state:ty, $get:ident, $set:ident) => {
        $(#[$doc])*
        pub struct $name<'a, R: Renderer + ?Sized> {
            renderer: &'a mut R,
            previous: $state,
        }

        impl<'a, R: Renderer + ?Sized> $name<'a, R> {
            pub fn new(renderer: &'a mut R, value: $state) -> Self {
                let previous = renderer.$get();
                renderer.$set(value);
                Self { renderer, previous }
            }
        }

        impl<R: Renderer + ?Sized> Deref for $name<'_, R> {
            type Target = R;
            fn deref(&self) -> &R {
                self.renderer
            }
        }

        impl<R: Renderer + ?Sized> DerefMut for $name<'_, R> {
            fn deref_mut(&mut self) -> &mut R {
                self.renderer
            }
        }

        impl<R: Renderer + ?Sized> Drop for $name<'_, R> {
            fn drop(&mut self) {
                self.renderer.$set(self.previous);
            }
        }
    };
}

scoped_state_guard!(
    /// Sets a blend mode and restores the old one on drop.
    BlendGuard,
    BlendMode,
    blend_mode,
    set_blend_mode
);

scoped_state_guard!(
    /// Sets a clip rectangle and restores the old one on drop.
    ClipGuard,
    Option<ClipRect>,
    clip_rect,
    set_clip_rect
);

scoped_state_guard!(
    /// Redirects drawing to a target and restores the old one on drop.
    TargetGuard,
    RenderTarget,
    target,
    set_target
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_guard_restores() {
        let mut r = MeshRenderer::new();
        {
            let mut g = BlendGuard::new(&mut r, BlendMode::Additive);
            assert_eq!(g.blend_mode(), BlendMode::Additive);
            g.draw_filled_circle(Vec2::ZERO, 2.0, Color::WHITE);
        }
        assert_eq!(r.blend_mode(), BlendMode::Alpha);
        assert_eq!(r.batches()[0].key.blend, BlendMode::Additive);
    }

    #[test]
    fn test_guards_nest() {
        let mut r = MeshRenderer::new();
        let clip = ClipRect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
        {
            let mut outer = ClipGuard::new(&mut r, Some(clip));
            {
                let inner = TargetGuard::new(&mut *outer, RenderTarget::Buffer(BufferId(3)));
                assert_eq!(inner.clip_rect(), Some(clip));
                assert_eq!(inner.target(), RenderTarget::Buffer(BufferId(3)));
            }
            assert_eq!(outer.target(), RenderTarget::Backbuffer);
        }
        assert_eq!(r.clip_rect(), None);
    }

    #[test]
    fn test_guard_restores_on_panic() {
        let mut r = MeshRenderer::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = BlendGuard::new(&mut r, BlendMode::Additive);
            panic!("draw failed");
        }));
        assert!(result.is_err());
        assert_eq!(r.blend_mode(), BlendMode::Alpha);
    }

    #[test]
    fn test_guard_over_trait_object() {
        let mut r = MeshRenderer::new();
        let dyn_r: &mut dyn Renderer = &mut r;
        {
            let _g = BlendGuard::new(dyn_r, BlendMode::OffsetAccumulate);
        }
        assert_eq!(r.blend_mode(), BlendMode::Alpha);
    }
}
