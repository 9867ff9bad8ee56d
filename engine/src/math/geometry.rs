//! 2D Geometry Helpers
//!
//! Angle arithmetic, line intersection, ring sampling and directional
//! selection. Angles are radians, counter-clockwise from +X, with +Y pointing
//! down the screen as in the rest of the engine.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Wraps an angle into [0, TAU).
pub fn normalize_angle(a: f32) -> f32 {
    let a = a % TAU;
    if a < 0.0 { a + TAU } else { a }
}

/// Angle of a vector.
#[inline]
pub fn get_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Angle from `center` to `focus`.
#[inline]
pub fn get_angle_between(center: Vec2, focus: Vec2) -> f32 {
    get_angle(focus - center)
}

/// How far clockwise (in increasing-angle direction) `a2` is from `a1`,
/// in [0, TAU).
pub fn get_angle_cw_diff(a1: f32, a2: f32) -> f32 {
    let mut a1 = normalize_angle(a1);
    let a2 = normalize_angle(a2);
    if a1 > a2 {
        a1 -= TAU;
    }
    a2 - a1
}

/// Smallest absolute difference between two angles, in [0, PI].
pub fn get_angle_smallest_diff(a1: f32, a2: f32) -> f32 {
    PI - ((normalize_angle(a1) - normalize_angle(a2)).abs() - PI).abs()
}

pub fn rotate_point(p: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * p.x - s * p.y, s * p.x + c * p.y)
}

pub fn angle_to_coordinates(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::new(angle.cos() * magnitude, angle.sin() * magnitude)
}

/// Returns `(angle, magnitude)`.
pub fn coordinates_to_angle(v: Vec2) -> (f32, f32) {
    (get_angle(v), v.length())
}

/// Angle subtended by a chord of `linear_dist` on a circle of `radius`.
pub fn linear_dist_to_angular(linear_dist: f32, radius: f32) -> f32 {
    2.0 * (linear_dist / (2.0 * radius)).atan()
}

/// Maps `input` from [in_start, in_end] onto [out_start, out_end].
pub fn interpolate_number(input: f32, in_start: f32, in_end: f32, out_start: f32, out_end: f32) -> f32 {
    out_start + ((input - in_start) / (in_end - in_start)) * (out_end - out_start)
}

/// Intersects two infinite lines.
///
/// Returns the parametric positions `(r1, r2)` of the intersection along each
/// line (0 at the first point, 1 at the second), or `None` when parallel.
pub fn lines_intersect(l1p1: Vec2, l1p2: Vec2, l2p1: Vec2, l2p2: Vec2) -> Option<(f32, f32)> {
    let div = (l2p2.y - l2p1.y) * (l1p2.x - l1p1.x) - (l2p2.x - l2p1.x) * (l1p2.y - l1p1.y);
    if div == 0.0 {
        return None;
    }
    let r1 = ((l2p2.x - l2p1.x) * (l1p1.y - l2p1.y) - (l2p2.y - l2p1.y) * (l1p1.x - l2p1.x)) / div;
    let r2 = ((l1p2.x - l1p1.x) * (l1p1.y - l2p1.y) - (l1p2.y - l1p1.y) * (l1p1.x - l2p1.x)) / div;
    Some((r1, r2))
}

/// Intersection point of two segments, if they cross.
pub fn line_segs_intersect(l1p1: Vec2, l1p2: Vec2, l2p1: Vec2, l2p2: Vec2) -> Option<Vec2> {
    let (r1, r2) = lines_intersect(l1p1, l1p2, l2p1, l2p2)?;
    if (0.0..=1.0).contains(&r1) && (0.0..=1.0).contains(&r2) {
        Some(l1p1 + (l1p2 - l1p1) * r1)
    } else {
        None
    }
}

/// Axis-aligned box overlap test (touching counts).
pub fn rectangles_intersect(tl1: Vec2, br1: Vec2, tl2: Vec2, br2: Vec2) -> bool {
    !(tl1.x > br2.x || br1.x < tl2.x || tl1.y > br2.y || br1.y < tl2.y)
}

pub fn is_point_in_rectangle(p: Vec2, tl: Vec2, br: Vec2) -> bool {
    p.x >= tl.x && p.x <= br.x && p.y >= tl.y && p.y <= br.y
}

/// Point in a ring at the middle radius, placed across the arc by `ratio`.
pub fn get_ratio_point_in_ring(inner: f32, outer: f32, arc: f32, arc_rot: f32, ratio: f32) -> Vec2 {
    let radius = (inner + outer) / 2.0;
    let angle1 = -arc / 2.0 + arc_rot;
    let angle2 = arc / 2.0 + arc_rot;
    angle_to_coordinates((angle2 - angle1) * ratio + angle1, radius)
}

/// Uniformly distributed point in a ring, given two random floats in [0, 1].
pub fn get_random_point_in_ring(
    inner: f32,
    outer: f32,
    arc: f32,
    arc_rot: f32,
    radius_rand: f32,
    angle_rand: f32,
) -> Vec2 {
    let r = inner + (outer - inner) * radius_rand.sqrt();
    let theta = interpolate_number(angle_rand, 0.0, 1.0, -arc / 2.0 + arc_rot, arc / 2.0 + arc_rot);
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Random inputs for [`get_random_point_in_rectangular_ring`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RectRingRolls {
    /// Axis used when both strips have zero area (0 or 1).
    pub axis_int: usize,
    pub axis_float: f32,
    pub px: f32,
    pub py: f32,
    /// 0 keeps the east/south strip, anything else mirrors to west/north.
    pub side_int: usize,
}

/// Uniformly distributed point in a rectangular ring.
///
/// The ring is split into four strips in a pinwheel. Opposite strips have the
/// same area, so only an axis is picked (weighted by area) and then a side.
pub fn get_random_point_in_rectangular_ring(inner: Vec2, outer: Vec2, rolls: RectRingRolls) -> Vec2 {
    let thickness = outer - inner;
    let sizes = [
        Vec2::new(thickness.x, outer.y * 2.0 - thickness.y),
        Vec2::new(outer.x * 2.0 - thickness.x, thickness.y),
    ];
    let areas = [sizes[0].x * sizes[0].y, sizes[1].x * sizes[1].y];

    let axis = if areas[0] == 0.0 && areas[1] == 0.0 {
        rolls.axis_int.min(1)
    } else {
        get_random_idx_with_weights(&areas, rolls.axis_float)
    };

    let in_rect = Vec2::new(rolls.px * sizes[axis].x, rolls.py * sizes[axis].y);
    let p = if axis == 0 {
        Vec2::new(inner.x + in_rect.x, -outer.y + in_rect.y)
    } else {
        Vec2::new(-inner.x + in_rect.x, inner.y + in_rect.y)
    };

    if rolls.side_int == 0 { p } else { -p }
}

/// Deterministic weighted pick from a float in [0, 1]. Returns 0 on failure.
pub fn get_random_idx_with_weights(weights: &[f32], point: f32) -> usize {
    let sum: f32 = weights.iter().sum();
    let mut r = point * sum;
    for (i, w) in weights.iter().enumerate() {
        if r < *w {
            return i;
        }
        r -= w;
    }
    0
}

/// Picks the item closest to `selected` in `direction`.
///
/// Items inside a blind spot cone (between 0.17 and 0.33 turns off-axis) are
/// never picked. Items behind the selection are looped around `loop_region`
/// so navigation wraps. Returns `selected` if nothing qualifies.
pub fn select_next_item_directionally(
    coords: &[Vec2],
    selected: usize,
    direction: f32,
    loop_region: Vec2,
) -> usize {
    const MIN_BLINDSPOT_ANGLE: f32 = TAU * 0.17;
    const MAX_BLINDSPOT_ANGLE: f32 = TAU * 0.33;

    let Some(&sel) = coords.get(selected) else {
        return selected;
    };
    let dir = normalize_angle(direction);
    let mut best_score = f32::MAX;
    let mut best = selected;

    for (i, &base) in coords.iter().enumerate() {
        if i == selected {
            continue;
        }
        let rel = rotate_point(base - sel, -dir);
        let rel_angle = get_angle(Vec2::new(rel.x, rel.y.abs()));
        if (MIN_BLINDSPOT_ANGLE..=MAX_BLINDSPOT_ANGLE).contains(&rel_angle) {
            continue;
        }

        if rel.x > 0.0 {
            let score = rel.x + rel.y.abs();
            if score < best_score {
                best_score = score;
                best = i;
            }
            continue;
        }

        for c in -1..=1 {
            for r in -1..=1 {
                if c == 0 && r == 0 {
                    continue;
                }
                let looped = base + Vec2::new(loop_region.x * c as f32, loop_region.y * r as f32);
                let rel = rotate_point(looped - sel, -dir);
                if rel.x < 0.0 {
                    continue;
                }
                let score = rel.x + rel.y.abs();
                if score < best_score {
                    best_score = score;
                    best = i;
                }
            }
        }
    }

    best
}

/// Robert Jenkins' 32 bit integer hash.
pub fn hash_nr(input: u32) -> u32 {
    let mut n = input.wrapping_add(0x7ED5_5D16).wrapping_add(input << 12);
    n = (n ^ 0xC761_C23C) ^ (n >> 19);
    n = n.wrapping_add(0x1656_67B1).wrapping_add(n << 5);
    n = n.wrapping_add(0xD3A2_646C) ^ (n << 9);
    n = n.wrapping_add(0xFD70_46C5).wrapping_add(n << 3);
    n = (n ^ 0xB55A_4F09) ^ (n >> 16);
    n
}

/// Two-input variant of [`hash_nr`].
pub fn hash_nr2(input1: u32, input2: u32) -> u32 {
    let n1 = hash_nr(input1);
    let mut n2 = input2.wrapping_add(0x5D79_5E0E).wrapping_add(input2 << 12);
    n2 = (n2 ^ 0xC07C_34BD) ^ (n2 >> 19);
    n2 = n2.wrapping_add(0x4969_B10A).wrapping_add(n2 << 5);
    n2 = n2.wrapping_add(0x583E_B559) ^ (n2 << 9);
    n2 = n2.wrapping_add(0x72F5_6900).wrapping_add(n2 << 3);
    n2 = (n2 ^ 0x8B12_1972) ^ (n2 >> 16);
    n1.wrapping_mul(n2)
}
