//! Offset effect kinds.
//!
//! Each effect decides per edge whether it applies, which side it lands
//! on, how long it is and what color it has. The geometry engine in
//! [`super::edge_offset`] is shared by all of them.

use super::{Area, GeometryConfig};
use crate::math::{hash_nr2, Color, LARGE_FLOAT};

/// Sides of an edge as seen by an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectSides {
    /// Sector the effect is drawn on.
    pub affected: usize,
    /// Sector on the other side, if any.
    pub unaffected: Option<usize>,
}

/// A ribbon-like effect cast by edges onto one of their sectors.
pub trait OffsetEffect {
    /// Returns the sides if the edge casts this effect.
    fn check(&self, area: &Area, edge_idx: usize) -> Option<EffectSides>;
    fn length(&self, area: &Area, edge_idx: usize) -> f32;
    fn color(&self, area: &Area, edge_idx: usize) -> Color;
}

/// Shadow cast by a tall sector onto a lower neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallShadow {
    pub step_height: f32,
    pub auto_length_mult: f32,
    pub min_auto_length: f32,
    pub max_auto_length: f32,
}

impl Default for WallShadow {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl WallShadow {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            step_height: config.step_height,
            auto_length_mult: config.shadow_auto_length_mult,
            min_auto_length: config.shadow_min_auto_length,
            max_auto_length: config.shadow_max_auto_length,
        }
    }
}

impl OffsetEffect for WallShadow {
    fn check(&self, area: &Area, edge_idx: usize) -> Option<EffectSides> {
        let edge = area.edges.get(edge_idx)?;
        if edge.wall_shadow_length <= 0.0 {
            return None;
        }
        let (s0, s1) = (edge.sectors[0]?, edge.sectors[1]?);
        let (sec0, sec1) = (area.sectors.get(s0)?, area.sectors.get(s1)?);
        if sec0.is_bottomless_pit || sec1.is_bottomless_pit || sec0.z == sec1.z {
            return None;
        }

        let (high, low) = if sec0.z > sec1.z { (s0, s1) } else { (s1, s0) };
        if edge.wall_shadow_length == LARGE_FLOAT
            && area.sectors[high].z <= area.sectors[low].z + self.step_height
        {
            return None;
        }
        Some(EffectSides { affected: low, unaffected: Some(high) })
    }

    fn length(&self, area: &Area, edge_idx: usize) -> f32 {
        let Some(edge) = area.edges.get(edge_idx) else {
            return 0.0;
        };
        if edge.wall_shadow_length != LARGE_FLOAT {
            return edge.wall_shadow_length;
        }
        let (Some(a), Some(b)) = (area.sector(edge.sectors[0]), area.sector(edge.sectors[1])) else {
            return 0.0;
        };
        ((a.z - b.z).abs() * self.auto_length_mult).clamp(self.min_auto_length, self.max_auto_length)
    }

    fn color(&self, area: &Area, edge_idx: usize) -> Color {
        area.edges.get(edge_idx).map(|e| e.wall_shadow_color).unwrap_or(Color::TRANSPARENT)
    }
}

/// Soft gradient along the top of a ledge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgeSmoothing;

impl OffsetEffect for LedgeSmoothing {
    fn check(&self, area: &Area, edge_idx: usize) -> Option<EffectSides> {
        let edge = area.edges.get(edge_idx)?;
        if edge.ledge_smoothing_length <= 0.0 {
            return None;
        }
        let [s0, s1] = edge.sectors;
        let open = |s: Option<usize>| area.sector(s).is_none_or(|sec| sec.is_bottomless_pit);
        let solid = |s: Option<usize>| area.sector(s).is_some();

        if solid(s0) && open(s1) {
            return Some(EffectSides { affected: s0?, unaffected: s1 });
        }
        if solid(s1) && open(s0) {
            return Some(EffectSides { affected: s1?, unaffected: s0 });
        }
        let (z0, z1) = (area.sector(s0)?.z, area.sector(s1)?.z);
        if z0 > z1 {
            Some(EffectSides { affected: s0?, unaffected: s1 })
        } else if z1 > z0 {
            Some(EffectSides { affected: s1?, unaffected: s0 })
        } else {
            None
        }
    }

    fn length(&self, area: &Area, edge_idx: usize) -> f32 {
        area.edges.get(edge_idx).map(|e| e.ledge_smoothing_length).unwrap_or(0.0)
    }

    fn color(&self, area: &Area, edge_idx: usize) -> Color {
        area.edges.get(edge_idx).map(|e| e.ledge_smoothing_color).unwrap_or(Color::TRANSPARENT)
    }
}

/// Foam where liquid meets dry ground. The length ripples over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidLimit {
    /// Seconds the area has been running.
    pub time: f32,
    pub length_base: f32,
    pub amplitude: f32,
}

impl Default for LiquidLimit {
    fn default() -> Self {
        Self::new(&GeometryConfig::default(), 0.0)
    }
}

impl LiquidLimit {
    pub const COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.75);

    pub fn new(config: &GeometryConfig, time: f32) -> Self {
        Self {
            time,
            length_base: config.liquid_limit_length_base,
            amplitude: config.liquid_limit_amplitude,
        }
    }
}

impl OffsetEffect for LiquidLimit {
    fn check(&self, area: &Area, edge_idx: usize) -> Option<EffectSides> {
        let edge = area.edges.get(edge_idx)?;
        let (s0, s1) = (edge.sectors[0]?, edge.sectors[1]?);
        let liquid = [area.sectors.get(s0)?.has_liquid, area.sectors.get(s1)?.has_liquid];
        match liquid {
            [true, false] => Some(EffectSides { affected: s0, unaffected: Some(s1) }),
            [false, true] => Some(EffectSides { affected: s1, unaffected: Some(s0) }),
            _ => None,
        }
    }

    fn length(&self, area: &Area, edge_idx: usize) -> f32 {
        let Some(edge) = area.edges.get(edge_idx) else {
            return 0.0;
        };
        // Phase from the top-left-most vertex, which neighbors rarely share.
        let min = area.vertex_pos(edge.vertexes[0]).min(area.vertex_pos(edge.vertexes[1]));
        let r = (hash_nr2(min.x as i32 as u32, min.y as i32 as u32) as f32 / u32::MAX as f32) * 5.0;
        self.length_base + self.amplitude * (self.time * 2.0 + r).sin()
    }

    fn color(&self, _area: &Area, _edge_idx: usize) -> Color {
        Self::COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Edge, Sector};
    use glam::Vec2;

    /// Two sectors sharing one edge.
    fn pair(z0: f32, z1: f32) -> Area {
        let mut area = Area::new();
        let s0 = area.add_sector(Sector::new(z0));
        let s1 = area.add_sector(Sector::new(z1));
        let a = area.add_vertex(Vec2::ZERO);
        let b = area.add_vertex(Vec2::new(100.0, 0.0));
        area.add_edge(Edge::new(a, b), [Some(s0), Some(s1)]);
        area
    }

    #[test]
    fn test_wall_shadow_auto() {
        let fx = WallShadow::default();
        let area = pair(0.0, 40.0);
        assert_eq!(fx.check(&area, 0), None);

        let area = pair(0.0, 200.0);
        assert_eq!(fx.check(&area, 0), Some(EffectSides { affected: 0, unaffected: Some(1) }));
        assert_eq!(fx.length(&area, 0), 40.0);

        let area = pair(0.0, 1000.0);
        assert_eq!(fx.length(&area, 0), 50.0);
    }

    #[test]
    fn test_wall_shadow_fixed_and_disabled() {
        let fx = WallShadow::default();
        let mut area = pair(10.0, 0.0);
        area.edges[0].wall_shadow_length = 30.0;
        assert_eq!(fx.check(&area, 0).map(|s| s.affected), Some(1));
        assert_eq!(fx.length(&area, 0), 30.0);

        area.edges[0].wall_shadow_length = 0.0;
        assert_eq!(fx.check(&area, 0), None);
    }

    #[test]
    fn test_wall_shadow_pit_or_void() {
        let fx = WallShadow::default();
        let mut area = pair(0.0, 200.0);
        area.sectors[0].is_bottomless_pit = true;
        assert_eq!(fx.check(&area, 0), None);
        area.edges[0].sectors[0] = None;
        assert_eq!(fx.check(&area, 0), None);
    }

    #[test]
    fn test_ledge_smoothing() {
        let fx = LedgeSmoothing;
        let mut area = pair(0.0, 20.0);
        assert_eq!(fx.check(&area, 0), None);
        area.edges[0].ledge_smoothing_length = 10.0;
        assert_eq!(fx.check(&area, 0).map(|s| s.affected), Some(1));

        area.sectors[1].is_bottomless_pit = true;
        assert_eq!(fx.check(&area, 0).map(|s| s.affected), Some(0));

        area.edges[0].sectors[1] = None;
        assert_eq!(fx.check(&area, 0), Some(EffectSides { affected: 0, unaffected: None }));

        let mut flat = pair(5.0, 5.0);
        flat.edges[0].ledge_smoothing_length = 10.0;
        assert_eq!(fx.check(&flat, 0), None);
    }

    #[test]
    fn test_liquid_limit() {
        let fx = LiquidLimit::default();
        let mut area = pair(0.0, 0.0);
        assert_eq!(fx.check(&area, 0), None);
        area.sectors[1].has_liquid = true;
        assert_eq!(fx.check(&area, 0).map(|s| s.affected), Some(1));
        area.sectors[0].has_liquid = true;
        assert_eq!(fx.check(&area, 0), None);

        let len = fx.length(&area, 0);
        assert!((3.0..=27.0).contains(&len));
        assert_eq!(fx.color(&area, 0), LiquidLimit::COLOR);
    }

    #[test]
    fn test_liquid_limit_phase_differs_below_origin() {
        let fx = LiquidLimit::default();
        let lengths: Vec<f32> = [Vec2::new(-300.0, -200.0), Vec2::new(-750.0, -40.0), Vec2::new(-1234.0, -987.0)]
            .into_iter()
            .map(|offset| {
                let mut area = pair(0.0, 0.0);
                area.sectors[1].has_liquid = true;
                for v in &mut area.vertexes {
                    v.pos += offset;
                }
                fx.length(&area, 0)
            })
            .collect();
        assert!(lengths.windows(2).any(|w| w[0] != w[1]));
    }
}
