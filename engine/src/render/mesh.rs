//! Mesh Renderer
//!
//! A [`Renderer`] that records draw calls as indexed triangle batches of
//! [`ColoredVertex`]. Consecutive draws that share blend mode, clip, target
//! and texture land in the same [`DrawBatch`]. Text is not tessellated; it is
//! recorded as [`TextRun`]s for the backend's glyph renderer.

use std::collections::HashMap;
use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use static_assertions::const_assert_eq;

use super::{BlendMode, ClipRect, PrimKind, RenderTarget, Renderer, TextAlign, Texture};
use crate::math::{rotate_point, Color};

/// Segments used for full circles.
const CIRCLE_SEGMENTS: usize = 24;
/// Segments used per rounded corner.
const CORNER_SEGMENTS: usize = 4;

/// Vertex layout shared with the GPU backend.
///
/// Layout (32 bytes):
/// - position: vec2<f32> (8 bytes)
/// - uv: vec2<f32> (8 bytes)
/// - color: vec4<f32> (16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<ColoredVertex>(), 32);

impl ColoredVertex {
    pub fn new(position: Vec2, uv: Vec2, color: Color) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
            color: color.to_array(),
        }
    }

    pub fn untextured(position: Vec2, color: Color) -> Self {
        Self::new(position, Vec2::ZERO, color)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }
}

/// State shared by every triangle in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchKey {
    pub blend: BlendMode,
    pub clip: Option<ClipRect>,
    pub target: RenderTarget,
    pub texture: Option<Texture>,
}

/// A text draw, left for the backend to lay out.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub center: Vec2,
    pub max_size: Vec2,
    pub align: TextAlign,
    pub color: Color,
    pub scale: Vec2,
}

/// Triangles and text sharing one [`BatchKey`].
#[derive(Debug, Clone)]
pub struct DrawBatch {
    pub key: BatchKey,
    pub vertices: Vec<ColoredVertex>,
    pub indices: Vec<u32>,
    pub texts: Vec<TextRun>,
}

impl DrawBatch {
    fn new(key: BatchKey) -> Self {
        Self {
            key,
            vertices: Vec::new(),
            indices: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Records draw calls into batches.
#[derive(Debug, Default)]
pub struct MeshRenderer {
    blend: BlendMode,
    clip: Option<ClipRect>,
    target: RenderTarget,
    batches: Vec<DrawBatch>,
    /// Targets cleared this frame, in order.
    clears: Vec<(RenderTarget, Color)>,
    /// Known bitmap dimensions, for aspect-preserving draws.
    bitmap_sizes: HashMap<String, Vec2>,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a bitmap's pixel size.
    pub fn register_bitmap(&mut self, name: &str, size: Vec2) {
        self.bitmap_sizes.insert(name.to_string(), size);
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    pub fn clears(&self) -> &[(RenderTarget, Color)] {
        &self.clears
    }

    /// Batches drawn into a specific target.
    pub fn batches_for(&self, target: RenderTarget) -> impl Iterator<Item = &DrawBatch> {
        self.batches.iter().filter(move |b| b.key.target == target)
    }

    pub fn total_triangles(&self) -> usize {
        self.batches.iter().map(DrawBatch::triangle_count).sum()
    }

    /// Drops everything recorded. State (blend, clip, target) is kept.
    pub fn reset_frame(&mut self) {
        self.batches.clear();
        self.clears.clear();
    }

    /// Takes the recorded batches, leaving the renderer empty.
    pub fn take_batches(&mut self) -> Vec<DrawBatch> {
        std::mem::take(&mut self.batches)
    }

    fn batch(&mut self, texture: Option<Texture>) -> &mut DrawBatch {
        let key = BatchKey {
            blend: self.blend,
            clip: self.clip,
            target: self.target,
            texture,
        };
        let reuse = self.batches.last().is_some_and(|b| b.key == key);
        if !reuse {
            self.batches.push(DrawBatch::new(key));
        }
        let last = self.batches.len() - 1;
        &mut self.batches[last]
    }

    /// Helper to add a quad (two triangles) to the current batch.
    fn add_quad(&mut self, corners: [Vec2; 4], uvs: [Vec2; 4], color: Color, texture: Option<Texture>) {
        let batch = self.batch(texture);
        let base = batch.vertices.len() as u32;
        for (p, uv) in corners.iter().zip(uvs) {
            batch.vertices.push(ColoredVertex::new(*p, uv, color));
        }
        batch
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn add_fan(&mut self, center: Vec2, rim: &[Vec2], color: Color) {
        if rim.len() < 2 {
            return;
        }
        let batch = self.batch(None);
        let base = batch.vertices.len() as u32;
        batch.vertices.push(ColoredVertex::untextured(center, color));
        for p in rim {
            batch.vertices.push(ColoredVertex::untextured(*p, color));
        }
        let n = rim.len() as u32;
        for i in 0..n {
            let next = (i + 1) % n;
            batch.indices.extend_from_slice(&[base, base + 1 + i, base + 1 + next]);
        }
    }

    fn rounded_rect_outline(center: Vec2, size: Vec2, radius: f32) -> Vec<Vec2> {
        let half = size / 2.0;
        let r = radius.min(half.x).min(half.y).max(0.0);
        let inner = half - Vec2::splat(r);
        // Corner centers, clockwise from bottom-right (+Y is down).
        let corners = [
            (Vec2::new(inner.x, inner.y), 0.0),
            (Vec2::new(-inner.x, inner.y), TAU / 4.0),
            (Vec2::new(-inner.x, -inner.y), TAU / 2.0),
            (Vec2::new(inner.x, -inner.y), TAU * 3.0 / 4.0),
        ];
        let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
        for (c, start) in corners {
            for s in 0..=CORNER_SEGMENTS {
                let a = start + (TAU / 4.0) * s as f32 / CORNER_SEGMENTS as f32;
                points.push(center + c + Vec2::new(a.cos(), a.sin()) * r);
            }
        }
        points
    }
}

impl Renderer for MeshRenderer {
    fn draw_bitmap(&mut self, bitmap: &str, center: Vec2, size: Vec2, angle: f32, tint: Color) {
        let mut size = size;
        if size.y < 0.0 {
            let aspect = self
                .bitmap_sizes
                .get(bitmap)
                .filter(|s| s.x > 0.0)
                .map(|s| s.y / s.x)
                .unwrap_or(1.0);
            size.y = size.x * aspect;
        }
        let half = size / 2.0;
        let local = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ];
        let corners = local.map(|p| center + rotate_point(p, angle));
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
        self.add_quad(corners, uvs, tint, Some(Texture::Bitmap(bitmap.to_string())));
    }

    fn draw_filled_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let rim: Vec<Vec2> = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let a = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
                center + Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        self.add_fan(center, &rim, color);
    }

    fn draw_filled_rectangle(&mut self, tl: Vec2, br: Vec2, color: Color) {
        let corners = [tl, Vec2::new(br.x, tl.y), br, Vec2::new(tl.x, br.y)];
        self.add_quad(corners, [Vec2::ZERO; 4], color, None);
    }

    fn draw_line(&mut self, p1: Vec2, p2: Vec2, color: Color, thickness: f32) {
        let dir = (p2 - p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let n = dir.perp() * (thickness / 2.0);
        self.add_quad([p1 + n, p2 + n, p2 - n, p1 - n], [Vec2::ZERO; 4], color, None);
    }

    fn draw_rounded_rectangle(
        &mut self,
        center: Vec2,
        size: Vec2,
        radius: f32,
        color: Color,
        thickness: f32,
    ) {
        let outline = Self::rounded_rect_outline(center, size, radius);
        if thickness <= 0.0 {
            self.add_fan(center, &outline, color);
            return;
        }
        for i in 0..outline.len() {
            let next = outline[(i + 1) % outline.len()];
            self.draw_line(outline[i], next, color, thickness);
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        center: Vec2,
        max_size: Vec2,
        align: TextAlign,
        color: Color,
        scale: Vec2,
    ) {
        if text.is_empty() {
            return;
        }
        self.batch(None).texts.push(TextRun {
            text: text.to_string(),
            center,
            max_size,
            align,
            color,
            scale,
        });
    }

    fn draw_prim(&mut self, vertices: &[ColoredVertex], kind: PrimKind, texture: Option<Texture>) {
        if vertices.len() < 3 {
            return;
        }
        let batch = self.batch(texture);
        let base = batch.vertices.len() as u32;
        batch.vertices.extend_from_slice(vertices);
        let n = vertices.len() as u32;
        match kind {
            PrimKind::TriangleList => {
                batch.indices.extend((0..n - n % 3).map(|i| base + i));
            }
            PrimKind::TriangleFan => {
                for i in 1..n - 1 {
                    batch.indices.extend_from_slice(&[base, base + i, base + i + 1]);
                }
            }
        }
    }

    fn clip_rect(&self) -> Option<ClipRect> {
        self.clip
    }

    fn set_clip_rect(&mut self, clip: Option<ClipRect>) {
        self.clip = clip;
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn target(&self) -> RenderTarget {
        self.target
    }

    fn set_target(&mut self, target: RenderTarget) {
        self.target = target;
    }

    fn clear(&mut self, color: Color) {
        let target = self.target;
        self.batches.retain(|b| b.key.target != target);
        self.clears.push((target, color));
    }
}
