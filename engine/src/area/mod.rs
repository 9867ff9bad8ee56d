//! Area Geometry
//!
//! The level layout: vertexes joined by edges, edges bordering up to two
//! sectors. Sectors are flat polygons at some height, already triangulated
//! by whoever built the area. Everything references everything else by
//! index into the owning [`Area`].
//!
//! Submodules:
//! - [`effects`]: which edges get which visual offset effect.
//! - [`edge_offset`]: the geometry and drawing of those effects.

pub mod edge_offset;
pub mod effects;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::{Color, LARGE_FLOAT};

pub use edge_offset::{
    draw_edge_offset_on_buffer, draw_sector_edge_offsets, get_edge_offset_edge_info,
    get_edge_offset_intersection, get_next_edge, get_next_offset_effect_edge,
    update_offset_effect_buffer, update_offset_effect_caches, EdgeOffsetCache, EndInfo,
    NextEdge, NextEffectEdge,
};
pub use effects::{EffectSides, LedgeSmoothing, LiquidLimit, OffsetEffect, WallShadow};

/// Area geometry tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Height difference a walker can step up without jumping. Auto-length
    /// wall shadows only appear above this.
    pub step_height: f32,
    /// Auto shadow length per unit of height difference.
    pub shadow_auto_length_mult: f32,
    pub shadow_min_auto_length: f32,
    pub shadow_max_auto_length: f32,
    /// Resting length of the foam along liquid edges.
    pub liquid_limit_length_base: f32,
    /// How far the foam length swings around its resting length.
    pub liquid_limit_amplitude: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            step_height: 50.0,
            shadow_auto_length_mult: 0.2,
            shadow_min_auto_length: 8.0,
            shadow_max_auto_length: 50.0,
            liquid_limit_length_base: 15.0,
            liquid_limit_amplitude: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Vertex {
    pub pos: Vec2,
    /// Edges that use this vertex.
    pub edge_idxs: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub vertexes: [usize; 2],
    /// Sector on each side. Facing from vertex 0 to vertex 1, sector 0 is
    /// on the left. `None` is the void outside the area.
    pub sectors: [Option<usize>; 2],
    /// 0 or less disables the shadow. [`LARGE_FLOAT`] picks a length from
    /// the height difference.
    pub wall_shadow_length: f32,
    pub wall_shadow_color: Color,
    /// 0 or less disables smoothing.
    pub ledge_smoothing_length: f32,
    pub ledge_smoothing_color: Color,
}

impl Edge {
    pub fn new(v1: usize, v2: usize) -> Self {
        Self {
            vertexes: [v1, v2],
            sectors: [None, None],
            wall_shadow_length: LARGE_FLOAT,
            wall_shadow_color: Color::new(0.0, 0.0, 0.0, 0.45),
            ledge_smoothing_length: 0.0,
            ledge_smoothing_color: Color::new(0.0, 0.0, 0.0, 0.2),
        }
    }

    /// The vertex at the other end from `v`.
    pub fn other_vertex(&self, v: usize) -> usize {
        if self.vertexes[0] == v { self.vertexes[1] } else { self.vertexes[0] }
    }

    pub fn has_vertex(&self, v: usize) -> bool {
        self.vertexes.contains(&v)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Sector {
    pub z: f32,
    pub is_bottomless_pit: bool,
    pub has_liquid: bool,
    pub edge_idxs: Vec<usize>,
    /// Vertex index triples.
    pub triangles: Vec<[usize; 3]>,
    /// World-space `[top_left, bottom_right]`.
    pub bbox: [Vec2; 2],
}

impl Sector {
    pub fn new(z: f32) -> Self {
        Self { z, ..Default::default() }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Area {
    pub vertexes: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub sectors: Vec<Sector>,
}

impl Area {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, pos: Vec2) -> usize {
        self.vertexes.push(Vertex { pos, edge_idxs: Vec::new() });
        self.vertexes.len() - 1
    }

    pub fn add_sector(&mut self, sector: Sector) -> usize {
        self.sectors.push(sector);
        self.sectors.len() - 1
    }

    /// Adds an edge and registers it on its vertexes and sectors.
    pub fn add_edge(&mut self, mut edge: Edge, sectors: [Option<usize>; 2]) -> usize {
        let idx = self.edges.len();
        edge.sectors = sectors;
        for v in edge.vertexes {
            if let Some(vertex) = self.vertexes.get_mut(v) {
                vertex.edge_idxs.push(idx);
            } else {
                log::warn!("Edge {idx} uses unknown vertex {v}");
            }
        }
        for s in sectors.iter().flatten() {
            if let Some(sector) = self.sectors.get_mut(*s) {
                if !sector.edge_idxs.contains(&idx) {
                    sector.edge_idxs.push(idx);
                }
            }
        }
        self.edges.push(edge);
        idx
    }

    pub fn vertex_pos(&self, v: usize) -> Vec2 {
        self.vertexes.get(v).map(|v| v.pos).unwrap_or(Vec2::ZERO)
    }

    pub fn sector(&self, s: Option<usize>) -> Option<&Sector> {
        s.and_then(|s| self.sectors.get(s))
    }

    /// Recomputes every sector's bounding box from its edges.
    pub fn calculate_bboxes(&mut self) {
        for s in 0..self.sectors.len() {
            let mut bbox: Option<[Vec2; 2]> = None;
            for &e in &self.sectors[s].edge_idxs {
                for v in self.edges[e].vertexes {
                    let p = self.vertex_pos(v);
                    bbox = Some(match bbox {
                        Some([tl, br]) => [tl.min(p), br.max(p)],
                        None => [p, p],
                    });
                }
            }
            self.sectors[s].bbox = bbox.unwrap_or([Vec2::ZERO; 2]);
        }
    }

    /// Fan-triangulates a convex sector from its edges' vertexes, sorted by
    /// angle around their centroid.
    pub fn triangulate_convex_sector(&mut self, s: usize) {
        let Some(sector) = self.sectors.get(s) else {
            return;
        };
        let mut verts: Vec<usize> = sector
            .edge_idxs
            .iter()
            .flat_map(|&e| self.edges[e].vertexes)
            .collect();
        verts.sort_unstable();
        verts.dedup();
        if verts.len() < 3 {
            self.sectors[s].triangles.clear();
            return;
        }
        let centroid = verts.iter().map(|&v| self.vertex_pos(v)).sum::<Vec2>() / verts.len() as f32;
        verts.sort_by(|&a, &b| {
            let aa = crate::math::get_angle(self.vertex_pos(a) - centroid);
            let ab = crate::math::get_angle(self.vertex_pos(b) - centroid);
            aa.total_cmp(&ab)
        });
        self.sectors[s].triangles = (1..verts.len() - 1)
            .map(|i| [verts[0], verts[i], verts[i + 1]])
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn square(area: &mut Area, tl: Vec2, size: f32, sector: Option<usize>) -> [usize; 4] {
        let v = [
            area.add_vertex(tl),
            area.add_vertex(tl + Vec2::new(size, 0.0)),
            area.add_vertex(tl + Vec2::new(size, size)),
            area.add_vertex(tl + Vec2::new(0.0, size)),
        ];
        for i in 0..4 {
            // Clockwise on screen, so the inside is on each edge's right.
            area.add_edge(Edge::new(v[i], v[(i + 1) % 4]), [None, sector]);
        }
        v
    }

    #[test]
    fn test_add_edge_registers_indexes() {
        let mut area = Area::new();
        let s = area.add_sector(Sector::new(0.0));
        let v = square(&mut area, Vec2::ZERO, 10.0, Some(s));
        assert_eq!(area.vertexes[v[0]].edge_idxs, vec![0, 3]);
        assert_eq!(area.sectors[s].edge_idxs, vec![0, 1, 2, 3]);
        assert_eq!(area.edges[2].other_vertex(v[2]), v[3]);
    }

    #[test]
    fn test_bboxes() {
        let mut area = Area::new();
        let s = area.add_sector(Sector::new(0.0));
        square(&mut area, Vec2::new(5.0, -5.0), 10.0, Some(s));
        area.calculate_bboxes();
        assert_eq!(area.sectors[s].bbox, [Vec2::new(5.0, -5.0), Vec2::new(15.0, 5.0)]);
    }

    #[test]
    fn test_triangulate_square() {
        let mut area = Area::new();
        let s = area.add_sector(Sector::new(0.0));
        square(&mut area, Vec2::ZERO, 10.0, Some(s));
        area.triangulate_convex_sector(s);
        assert_eq!(area.sectors[s].triangles.len(), 2);
    }

    #[test]
    fn test_geometry_defaults() {
        let c = GeometryConfig::default();
        assert_eq!(c.shadow_min_auto_length, 8.0);
        assert_eq!(c.liquid_limit_amplitude, 12.0);
    }
}
