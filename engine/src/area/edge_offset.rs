//! Edge Offset Effects
//!
//! Wall shadows, ledge smoothing and liquid foam are ribbons drawn along
//! chains of edges, offset to one side. Each edge draws a "rectangle" from
//! its two vertexes outwards. At each end, the rectangle either merges with
//! a facing neighbor's, skews to sit flush against a same-side neighbor, or
//! gets an elbow to bridge a wide bend.
//!
//! The per-edge geometry is cached in [`EdgeOffsetCache`] and rebuilt only
//! for edges touching vertexes that changed. Drawing happens in two passes:
//! edges are accumulated into an off-screen buffer, then sectors sample that
//! buffer as a mask.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use glam::Vec2;

use super::effects::OffsetEffect;
use super::Area;
use crate::camera::Viewport;
use crate::math::{
    coordinates_to_angle, get_angle_between, get_angle_cw_diff, lines_intersect, normalize_angle,
    rectangles_intersect, rotate_point, Color,
};
use crate::render::{
    BlendGuard, BlendMode, BufferId, ColoredVertex, PrimKind, RenderTarget, Renderer, TargetGuard, Texture,
};

/// Alpha at the far side of an effect.
const END_OPACITY: f32 = 0.0;

/// Bends sharper than this get a two-triangle elbow. Slightly above
/// TAU / 8 so square corners don't flip between one and two.
const TWO_TRIANGLE_ELBOW_THRESHOLD: f32 = TAU / 8.00001;

/// Merging is skipped this close to a straight line, where the
/// intersection becomes unstable.
const MERGE_ANGLE_EPSILON: f32 = 0.0001;

/// Cached geometry of one edge's effect.
///
/// Index 0 of each array is the end at the vertex processed first, the one
/// from which the affected sector is on the left when facing the other end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeOffsetCache {
    /// Rectangle length per end. 0 draws nothing for that end.
    pub lengths: [f32; 2],
    pub angles: [f32; 2],
    pub colors: [Color; 2],
    /// Elbow length per end. 0 for no elbow.
    pub elbow_lengths: [f32; 2],
    pub elbow_angles: [f32; 2],
    /// Which of the edge's vertexes is end 0.
    pub first_end_vertex_idx: usize,
}

impl Default for EdgeOffsetCache {
    fn default() -> Self {
        Self {
            lengths: [0.0; 2],
            angles: [0.0; 2],
            colors: [Color::TRANSPARENT; 2],
            elbow_lengths: [0.0; 2],
            elbow_angles: [0.0; 2],
            first_end_vertex_idx: 0,
        }
    }
}

impl EdgeOffsetCache {
    /// A fresh cache list, one entry per edge of the area.
    pub fn for_area(area: &Area) -> Vec<EdgeOffsetCache> {
        vec![EdgeOffsetCache::default(); area.edges.len()]
    }

    pub fn is_empty(&self) -> bool {
        self.lengths == [0.0; 2]
    }
}

/// How one end of an effect is shaped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndInfo {
    pub angle: f32,
    pub length: f32,
    pub color: Color,
    /// 0 if no elbow is needed.
    pub elbow_angle: f32,
    /// 0 if no elbow is needed.
    pub elbow_length: f32,
}

/// Closest neighboring edge around a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextEdge {
    pub edge_idx: usize,
    /// Angle from the vertex to the edge's other vertex.
    pub angle: f32,
    /// Angle between the pivot and the edge, in the search direction.
    pub diff: f32,
}

/// Closest neighboring edge that also casts the effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextEffectEdge {
    pub edge_idx: usize,
    pub angle: f32,
    pub diff: f32,
    /// Angle that edge's effect is cast at.
    pub base_effect_angle: f32,
    /// Standing on the vertex facing the edge, whether the effect goes
    /// clockwise.
    pub effect_cw: bool,
}

/// Finds the first edge around `vertex` starting from `pivot_angle`, going
/// clockwise or counterclockwise, skipping `ignore`.
pub fn get_next_edge(
    area: &Area,
    vertex: usize,
    pivot_angle: f32,
    clockwise: bool,
    ignore: Option<usize>,
) -> Option<NextEdge> {
    let v_pos = area.vertex_pos(vertex);
    let mut best: Option<NextEdge> = None;

    for &e in &area.vertexes.get(vertex)?.edge_idxs {
        if Some(e) == ignore {
            continue;
        }
        let other = area.edges[e].other_vertex(vertex);
        let angle = get_angle_between(v_pos, area.vertex_pos(other));
        let diff = if clockwise {
            get_angle_cw_diff(pivot_angle, angle)
        } else {
            get_angle_cw_diff(angle, pivot_angle)
        };
        if best.is_none_or(|b| diff < b.diff) {
            best = Some(NextEdge { edge_idx: e, angle, diff });
        }
    }

    best
}

/// Like [`get_next_edge`], but only considers edges that cast `effect`.
pub fn get_next_offset_effect_edge(
    area: &Area,
    vertex: usize,
    pivot_angle: f32,
    clockwise: bool,
    ignore: Option<usize>,
    effect: &dyn OffsetEffect,
) -> Option<NextEffectEdge> {
    let v_pos = area.vertex_pos(vertex);
    let mut best: Option<NextEffectEdge> = None;

    for &e in &area.vertexes.get(vertex)?.edge_idxs {
        if Some(e) == ignore {
            continue;
        }
        let Some(sides) = effect.check(area, e) else {
            continue;
        };
        let edge = &area.edges[e];
        let unaffected_sector_idx = if edge.sectors[0] == sides.unaffected { 0 } else { 1 };
        let other_vertex_idx = if edge.vertexes[0] == vertex { 1 } else { 0 };
        let effect_cw = other_vertex_idx != unaffected_sector_idx;

        let angle = get_angle_between(v_pos, area.vertex_pos(edge.vertexes[other_vertex_idx]));
        let diff = if clockwise {
            get_angle_cw_diff(pivot_angle, angle)
        } else {
            get_angle_cw_diff(angle, pivot_angle)
        };
        if best.is_none_or(|b| diff < b.diff) {
            let base_effect_angle = if effect_cw {
                normalize_angle(angle + TAU / 4.0)
            } else {
                normalize_angle(angle - TAU / 4.0)
            };
            best = Some(NextEffectEdge { edge_idx: e, angle, diff, base_effect_angle, effect_cw });
        }
    }

    best
}

/// Works out the shape of one end of an edge's effect.
///
/// `end_idx` 0 is the end from which the affected sector is on the left
/// when facing the other end. `edge_process_angle` is the angle from this
/// end towards the opposite one.
pub fn get_edge_offset_edge_info(
    area: &Area,
    edge_idx: usize,
    end_vertex: usize,
    end_idx: usize,
    edge_process_angle: f32,
    effect: &dyn OffsetEffect,
) -> EndInfo {
    let mut info = EndInfo {
        angle: 0.0,
        length: 0.0,
        color: effect.color(area, edge_idx),
        elbow_angle: 0.0,
        elbow_length: 0.0,
    };

    let base_effect_length = effect.length(area, edge_idx);
    let base_effect_angle = normalize_angle(if end_idx == 0 {
        edge_process_angle - TAU / 4.0
    } else {
        edge_process_angle + TAU / 4.0
    });
    let edge_effect_cw = end_idx == 1;

    let next = get_next_offset_effect_edge(
        area,
        end_vertex,
        edge_process_angle,
        edge_effect_cw,
        Some(edge_idx),
        effect,
    );

    let Some(next) = next else {
        // Nothing to connect to. Shrink instead of hiding, so lone edges
        // still show something.
        info.angle = base_effect_angle;
        info.length = base_effect_length / 5.0;
        return info;
    };

    let opposite_handed = next.effect_cw != edge_effect_cw;
    let next_color = effect.color(area, next.edge_idx);

    if opposite_handed && next.diff < TAU / 2.0 - MERGE_ANGLE_EPSILON {
        // Facing effects: both ends meet where their far lines cross.
        let mid_length = (base_effect_length + effect.length(area, next.edge_idx)) / 2.0;
        let (angle, length) = get_edge_offset_intersection(
            area,
            edge_idx,
            next.edge_idx,
            end_vertex,
            base_effect_angle,
            next.base_effect_angle,
            mid_length,
        );
        info.angle = angle;
        info.length = length;
        info.color = info.color.lerp(next_color, 0.5);
    } else if !opposite_handed && next.diff < TAU / 4.0 {
        // The neighbor's effect covers ours; skew to lie flush with it.
        info.angle = next.angle;
        info.length = base_effect_length / next.diff.sin();
    } else {
        info.angle = base_effect_angle;
        info.length = base_effect_length;

        if opposite_handed {
            // Too wide to merge. Each edge draws half of an elbow.
            let mid_length = (base_effect_length + effect.length(area, next.edge_idx)) / 2.0;
            info.length = mid_length;
            info.elbow_length = mid_length;
            info.elbow_angle = if end_idx == 0 {
                next.angle + get_angle_cw_diff(next.angle, edge_process_angle) / 2.0
            } else {
                edge_process_angle + get_angle_cw_diff(edge_process_angle, next.angle) / 2.0
            };
            info.color = info.color.lerp(next_color, 0.5);
        } else {
            // Same side but far away. This edge draws the whole elbow up to
            // the neighbor.
            info.elbow_angle = next.angle;
            info.elbow_length = base_effect_length;
        }
    }

    info
}

/// Where the far lines of two effects sharing `common_vertex` cross,
/// as `(angle, length)` from that vertex.
///
/// Lines rather than segments are intersected, so very short edges still
/// produce a point. The position along the first edge is clamped to it.
/// Parallel lines yield `(0, 0)`.
pub fn get_edge_offset_intersection(
    area: &Area,
    e1: usize,
    e2: usize,
    common_vertex: usize,
    base_effect_angle1: f32,
    base_effect_angle2: f32,
    effect_length: f32,
) -> (f32, f32) {
    let common = area.vertex_pos(common_vertex);

    let far_line = |e: usize, angle: f32| -> (Vec2, Vec2) {
        let other = area.vertex_pos(area.edges[e].other_vertex(common_vertex));
        let offset = Vec2::new(angle.cos(), angle.sin()) * effect_length;
        (common + offset, other + offset)
    };
    let (p0, p1) = far_line(e1, base_effect_angle1);
    let (q0, q1) = far_line(e2, base_effect_angle2);

    match lines_intersect(p0, p1, q0, q1) {
        Some((r, _)) => {
            let r = r.clamp(0.0, 1.0);
            let p = p0 + (p1 - p0) * r;
            coordinates_to_angle(p - common)
        }
        None => (0.0, 0.0),
    }
}

/// Rebuilds the caches of every edge touching a dirty vertex. Other
/// entries are left alone.
pub fn update_offset_effect_caches<'a>(
    area: &Area,
    caches: &mut [EdgeOffsetCache],
    dirty_vertexes: impl IntoIterator<Item = &'a usize>,
    effect: &dyn OffsetEffect,
) {
    let edges: BTreeSet<usize> = dirty_vertexes
        .into_iter()
        .filter_map(|v| area.vertexes.get(*v))
        .flat_map(|v| v.edge_idxs.iter().copied())
        .collect();

    for e in edges {
        let Some(cache) = caches.get_mut(e) else {
            log::warn!("No offset effect cache for edge {e}");
            continue;
        };
        let edge = &area.edges[e];

        let Some(sides) = effect.check(area, e) else {
            cache.lengths = [0.0; 2];
            continue;
        };

        // Process the ends so that, facing from the first to the second,
        // the affected sector is on the left.
        let ends = if edge.sectors[0] == Some(sides.affected) {
            cache.first_end_vertex_idx = 0;
            [edge.vertexes[0], edge.vertexes[1]]
        } else {
            cache.first_end_vertex_idx = 1;
            [edge.vertexes[1], edge.vertexes[0]]
        };
        let process_angle = get_angle_between(area.vertex_pos(ends[0]), area.vertex_pos(ends[1]));

        for end in 0..2 {
            let angle = if end == 0 { process_angle } else { process_angle + TAU / 2.0 };
            let info = get_edge_offset_edge_info(area, e, ends[end], end, angle, effect);
            cache.lengths[end] = info.length;
            cache.angles[end] = normalize_angle(info.angle);
            cache.colors[end] = info.color;
            cache.elbow_angles[end] = normalize_angle(info.elbow_angle);
            cache.elbow_lengths[end] = info.elbow_length;
        }
    }
}

/// Draws one edge's effect in window coordinates onto the current target.
pub fn draw_edge_offset_on_buffer(
    area: &Area,
    caches: &[EdgeOffsetCache],
    e_idx: usize,
    view: &Viewport,
    renderer: &mut dyn Renderer,
) {
    let (Some(cache), Some(edge)) = (caches.get(e_idx), area.edges.get(e_idx)) else {
        return;
    };
    if cache.is_empty() {
        return;
    }

    let end_vertexes = if cache.first_end_vertex_idx == 0 {
        [edge.vertexes[0], edge.vertexes[1]]
    } else {
        [edge.vertexes[1], edge.vertexes[0]]
    };
    let end_pos = end_vertexes.map(|v| area.vertex_pos(v));
    let mut end_rel = [Vec2::ZERO; 2];
    let mut elbow_tris = [0usize; 2];
    let mut elbow_rel = [[Vec2::ZERO; 2]; 2];
    let colors = cache.colors;

    for end in 0..2 {
        let length = cache.lengths[end];
        if length == 0.0 {
            continue;
        }
        let angle = cache.angles[end];
        let elbow_length = cache.elbow_lengths[end];
        let elbow_angle = cache.elbow_angles[end];

        end_rel[end] = rotate_point(Vec2::new(length, 0.0), angle);

        if elbow_length > 0.0 {
            let rect_to_elbow_diff = if end == 0 {
                get_angle_cw_diff(elbow_angle, angle)
            } else {
                get_angle_cw_diff(angle, elbow_angle)
            };
            if rect_to_elbow_diff > TWO_TRIANGLE_ELBOW_THRESHOLD {
                elbow_tris[end] = 2;
                let mid = if end == 0 {
                    angle - rect_to_elbow_diff / 2.0
                } else {
                    angle + rect_to_elbow_diff / 2.0
                };
                elbow_rel[end][0] = rotate_point(Vec2::new(elbow_length, 0.0), mid);
            } else {
                elbow_tris[end] = 1;
            }
            elbow_rel[end][elbow_tris[end] - 1] = rotate_point(Vec2::new(elbow_length, 0.0), elbow_angle);
        }
    }

    let vert = |world: Vec2, color: Color| ColoredVertex::untextured(view.world_to_window(world), color);
    let faded = |c: Color| c.with_alpha(END_OPACITY);

    let rect = [
        vert(end_pos[0], colors[0]),
        vert(end_pos[1], colors[1]),
        vert(end_pos[1] + end_rel[1], faded(colors[1])),
        vert(end_pos[0] + end_rel[0], faded(colors[0])),
    ];
    renderer.draw_prim(&rect, PrimKind::TriangleFan, None);

    // Elbow fans: the vertex, the rectangle's tip, then the elbow points.
    let tips = [rect[3], rect[2]];
    for end in 0..2 {
        if elbow_tris[end] == 0 {
            continue;
        }
        let mut fan = vec![rect[end], tips[end]];
        for rel in &elbow_rel[end][..elbow_tris[end]] {
            fan.push(vert(end_pos[end] + *rel, faded(colors[end])));
        }
        renderer.draw_prim(&fan, PrimKind::TriangleFan, None);
    }
}

/// Draws the effects of every on-camera edge into `buffer`.
///
/// Edges are collected from sectors whose bounding box touches the camera.
/// Sectors only partly on camera also test each edge's own box. Drawing uses
/// [`BlendMode::OffsetAccumulate`]; blend mode and target are restored
/// afterwards.
#[allow(clippy::too_many_arguments)]
pub fn update_offset_effect_buffer(
    area: &Area,
    cam_tl: Vec2,
    cam_br: Vec2,
    caches: &[EdgeOffsetCache],
    buffer: BufferId,
    clear_first: bool,
    view: &Viewport,
    renderer: &mut dyn Renderer,
) {
    let mut edges = BTreeSet::new();

    for sector in &area.sectors {
        let [s_tl, s_br] = sector.bbox;
        if !rectangles_intersect(s_tl, s_br, cam_tl, cam_br) {
            continue;
        }
        let fully_on_camera =
            s_tl.x > cam_tl.x && s_br.x < cam_br.x && s_tl.y > cam_tl.y && s_br.y < cam_br.y;

        for &e in &sector.edge_idxs {
            if !fully_on_camera {
                let [a, b] = area.edges[e].vertexes.map(|v| area.vertex_pos(v));
                if !rectangles_intersect(a.min(b), a.max(b), cam_tl, cam_br) {
                    continue;
                }
            }
            edges.insert(e);
        }
    }

    let mut target = TargetGuard::new(renderer, RenderTarget::Buffer(buffer));
    let mut blend = BlendGuard::new(&mut *target, BlendMode::OffsetAccumulate);

    if clear_first {
        blend.clear(Color::TRANSPARENT);
    }
    for e in edges {
        draw_edge_offset_on_buffer(area, caches, e, view, &mut *blend);
    }
}

/// Draws a sector's triangles, textured with the effect buffer.
///
/// Positions are world coordinates; texture coordinates are the matching
/// window pixels, since that is how the buffer was drawn. Bottomless pits
/// are skipped.
pub fn draw_sector_edge_offsets(
    area: &Area,
    sector_idx: usize,
    buffer: BufferId,
    opacity: f32,
    view: &Viewport,
    renderer: &mut dyn Renderer,
) {
    let Some(sector) = area.sectors.get(sector_idx) else {
        return;
    };
    if sector.is_bottomless_pit || sector.triangles.is_empty() {
        return;
    }

    let tint = Color::WHITE.with_alpha(opacity);
    let vertexes: Vec<ColoredVertex> = sector
        .triangles
        .iter()
        .flatten()
        .map(|&v| {
            let world = area.vertex_pos(v);
            ColoredVertex::new(world, view.world_to_window(world), tint)
        })
        .collect();

    renderer.draw_prim(&vertexes, PrimKind::TriangleList, Some(Texture::Buffer(buffer)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Edge, LedgeSmoothing, Sector, WallShadow};
    use crate::render::MeshRenderer;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    /// A single edge from (0,0) to (100,0) with a tall sector above
    /// (negative Y) and a low one below.
    fn single_wall() -> Area {
        let mut area = Area::new();
        let high = area.add_sector(Sector::new(200.0));
        let low = area.add_sector(Sector::new(0.0));
        let a = area.add_vertex(Vec2::ZERO);
        let b = area.add_vertex(Vec2::new(100.0, 0.0));
        let mut e = Edge::new(a, b);
        e.wall_shadow_length = 20.0;
        area.add_edge(e, [Some(high), Some(low)]);
        area
    }

    /// An L-shaped wall: (0,100) → (0,0) → (100,0), the high ground outside
    /// the corner and the low floor inside (positive X and Y).
    fn corner(inner_low: bool) -> Area {
        let mut area = Area::new();
        let high = area.add_sector(Sector::new(200.0));
        let low = area.add_sector(Sector::new(0.0));
        let a = area.add_vertex(Vec2::new(0.0, 100.0));
        let c = area.add_vertex(Vec2::ZERO);
        let b = area.add_vertex(Vec2::new(100.0, 0.0));
        let (left, right) = if inner_low { (high, low) } else { (low, high) };
        let mut e1 = Edge::new(a, c);
        e1.wall_shadow_length = 20.0;
        let mut e2 = Edge::new(c, b);
        e2.wall_shadow_length = 20.0;
        // a→c faces -Y: left is -X. c→b faces +X: left is -Y.
        area.add_edge(e1, [Some(left), Some(right)]);
        area.add_edge(e2, [Some(left), Some(right)]);
        area
    }

    #[test]
    fn test_lone_edge_shrinks_both_ends() {
        let area = single_wall();
        let mut caches = EdgeOffsetCache::for_area(&area);
        update_offset_effect_caches(&area, &mut caches, &[0, 1], &WallShadow::default());
        let c = caches[0];
        // The low sector is sector 1, so processing starts from vertex 1.
        assert_eq!(c.first_end_vertex_idx, 1);
        assert!(approx(c.lengths[0], 4.0));
        assert!(approx(c.lengths[1], 4.0));
        // Cast towards +Y, into the low sector.
        assert!(approx(c.angles[0], TAU / 4.0));
        assert!(approx(c.angles[1], TAU / 4.0));
    }

    #[test]
    fn test_failed_check_zeroes_lengths() {
        let mut area = single_wall();
        let mut caches = EdgeOffsetCache::for_area(&area);
        caches[0].lengths = [5.0, 5.0];
        area.edges[0].wall_shadow_length = 0.0;
        update_offset_effect_caches(&area, &mut caches, &[0], &WallShadow::default());
        assert!(caches[0].is_empty());
    }

    #[test]
    fn test_only_dirty_vertexes_update() {
        let area = corner(true);
        let mut caches = EdgeOffsetCache::for_area(&area);
        // Vertex 0 only touches edge 0.
        update_offset_effect_caches(&area, &mut caches, &[0], &WallShadow::default());
        assert!(!caches[0].is_empty());
        assert!(caches[1].is_empty());
    }

    #[test]
    fn test_inner_corner_merges() {
        let area = corner(true);
        let mut caches = EdgeOffsetCache::for_area(&area);
        update_offset_effect_caches(&area, &mut caches, &[0, 1, 2], &WallShadow::default());
        // Both effects end at the corner of the inset square, (20, 20).
        let corner_end = |e: usize| -> Vec2 {
            let c = caches[e];
            let ends = if c.first_end_vertex_idx == 0 {
                area.edges[e].vertexes
            } else {
                [area.edges[e].vertexes[1], area.edges[e].vertexes[0]]
            };
            let end = if ends[0] == 1 { 0 } else { 1 };
            area.vertex_pos(1) + rotate_point(Vec2::new(c.lengths[end], 0.0), c.angles[end])
        };
        assert!((corner_end(0) - Vec2::new(20.0, 20.0)).length() < 1e-2);
        assert!((corner_end(1) - Vec2::new(20.0, 20.0)).length() < 1e-2);
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let area = corner(true);
        let fx = WallShadow::default();
        let sides0 = fx.check(&area, 0).unwrap();
        assert_eq!(sides0.affected, 1);
        // Edge 0 casts towards +X, edge 1 towards +Y.
        let (a1, l1) = get_edge_offset_intersection(&area, 0, 1, 1, 0.0, TAU / 4.0, 20.0);
        let (a2, l2) = get_edge_offset_intersection(&area, 1, 0, 1, TAU / 4.0, 0.0, 20.0);
        let p1 = rotate_point(Vec2::new(l1, 0.0), a1);
        let p2 = rotate_point(Vec2::new(l2, 0.0), a2);
        assert!((p1 - p2).length() < 1e-3);
        assert!((p1 - Vec2::new(20.0, 20.0)).length() < 1e-3);
    }

    #[test]
    fn test_parallel_intersection_falls_back_to_zero() {
        let mut area = Area::new();
        let a = area.add_vertex(Vec2::new(-10.0, 0.0));
        let c = area.add_vertex(Vec2::ZERO);
        let b = area.add_vertex(Vec2::new(10.0, 0.0));
        area.add_edge(Edge::new(a, c), [None, None]);
        area.add_edge(Edge::new(c, b), [None, None]);
        assert_eq!(
            get_edge_offset_intersection(&area, 0, 1, c, TAU / 4.0, TAU / 4.0, 5.0),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_outer_corner_gets_elbow() {
        let area = corner(false);
        let mut caches = EdgeOffsetCache::for_area(&area);
        update_offset_effect_caches(&area, &mut caches, &[0, 1, 2], &WallShadow::default());
        let has_elbow = caches.iter().any(|c| c.elbow_lengths.iter().any(|l| *l > 0.0));
        assert!(has_elbow);

        let mut r = MeshRenderer::new();
        let view = Viewport::full_window(Vec2::new(400.0, 400.0));
        for e in 0..2 {
            draw_edge_offset_on_buffer(&area, &caches, e, &view, &mut r);
        }
        // Two rectangles of two triangles, plus at least one elbow triangle
        // per edge.
        assert!(r.total_triangles() >= 6);
    }

    #[test]
    fn test_next_edge_directions() {
        let area = corner(true);
        // Around the corner vertex, from angle 0 (towards b).
        let cw = get_next_edge(&area, 1, 0.0, true, Some(1)).unwrap();
        assert_eq!(cw.edge_idx, 0);
        assert!(approx(cw.diff, TAU / 4.0));
        let ccw = get_next_edge(&area, 1, 0.0, false, Some(1)).unwrap();
        assert!(approx(ccw.diff, TAU * 3.0 / 4.0));
        assert!(get_next_edge(&area, 0, 0.0, true, Some(0)).is_none());
    }

    #[test]
    fn test_update_buffer_restores_state() {
        let mut area = corner(true);
        area.calculate_bboxes();
        let mut caches = EdgeOffsetCache::for_area(&area);
        update_offset_effect_caches(&area, &mut caches, &[0, 1, 2], &WallShadow::default());
        let view = Viewport::full_window(Vec2::new(400.0, 400.0));
        let mut r = MeshRenderer::new();
        update_offset_effect_buffer(
            &area,
            Vec2::splat(-500.0),
            Vec2::splat(500.0),
            &caches,
            BufferId(7),
            true,
            &view,
            &mut r,
        );
        assert_eq!(r.blend_mode(), BlendMode::Alpha);
        assert_eq!(r.target(), RenderTarget::Backbuffer);
        let drawn: Vec<_> = r.batches_for(RenderTarget::Buffer(BufferId(7))).collect();
        assert!(!drawn.is_empty());
        assert!(drawn.iter().all(|b| b.key.blend == BlendMode::OffsetAccumulate));
        assert_eq!(r.clears().len(), 1);
    }

    #[test]
    fn test_off_camera_edges_skipped() {
        let mut area = corner(true);
        area.calculate_bboxes();
        let mut caches = EdgeOffsetCache::for_area(&area);
        update_offset_effect_caches(&area, &mut caches, &[0, 1, 2], &LedgeSmoothing);
        let view = Viewport::full_window(Vec2::new(400.0, 400.0));
        let mut r = MeshRenderer::new();
        update_offset_effect_buffer(
            &area,
            Vec2::splat(1000.0),
            Vec2::splat(2000.0),
            &caches,
            BufferId(1),
            false,
            &view,
            &mut r,
        );
        assert_eq!(r.total_triangles(), 0);
    }

    #[test]
    fn test_sector_draw_skips_pits() {
        let mut area = Area::new();
        let s = area.add_sector(Sector::new(0.0));
        let v: Vec<usize> = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)]
            .into_iter()
            .map(|p| area.add_vertex(p))
            .collect();
        area.sectors[s].triangles.push([v[0], v[1], v[2]]);
        let view = Viewport::full_window(Vec2::new(100.0, 100.0));

        let mut r = MeshRenderer::new();
        draw_sector_edge_offsets(&area, s, BufferId(2), 0.5, &view, &mut r);
        assert_eq!(r.total_triangles(), 1);
        assert_eq!(r.batches()[0].key.texture, Some(Texture::Buffer(BufferId(2))));
        assert_eq!(r.batches()[0].vertices[1].uv, [60.0, 50.0]);

        area.sectors[s].is_bottomless_pit = true;
        let mut r = MeshRenderer::new();
        draw_sector_edge_offsets(&area, s, BufferId(2), 0.5, &view, &mut r);
        assert_eq!(r.total_triangles(), 0);
    }
}
