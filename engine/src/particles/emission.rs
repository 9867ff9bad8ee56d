//! Emission shapes: where new particles appear relative to the generator.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{get_random_point_in_rectangular_ring, get_random_point_in_ring, get_ratio_point_in_ring, RectRingRolls};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmissionShape {
    Circle,
    #[default]
    Rectangle,
}

impl EmissionShape {
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::Circle),
            1 => Some(Self::Rectangle),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Shape and cadence of a generator's emissions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEmission {
    pub shape: EmissionShape,
    /// Particles per emission.
    pub number: usize,
    pub number_deviation: usize,
    /// Seconds between emissions. 0 emits every tick.
    pub interval: f32,
    pub interval_deviation: f32,
    /// Half-extents of the outer rectangle.
    pub rect_outer_dist: Vec2,
    /// Half-extents of the hole in the middle.
    pub rect_inner_dist: Vec2,
    pub circle_outer_dist: f32,
    pub circle_inner_dist: f32,
    /// Arc the circle covers, centered on `circle_arc_rot`.
    pub circle_arc: f32,
    pub circle_arc_rot: f32,
    /// Place circle particles in even steps instead of at random.
    pub evenly_spread: bool,
}

impl Default for ParticleEmission {
    fn default() -> Self {
        Self::new(0.0, 1)
    }
}

impl ParticleEmission {
    pub fn new(interval: f32, number: usize) -> Self {
        Self {
            shape: EmissionShape::Rectangle,
            number,
            number_deviation: 0,
            interval,
            interval_deviation: 0.0,
            rect_outer_dist: Vec2::ZERO,
            rect_inner_dist: Vec2::ZERO,
            circle_outer_dist: 0.0,
            circle_inner_dist: 0.0,
            circle_arc: TAU,
            circle_arc_rot: 0.0,
            evenly_spread: false,
        }
    }

    /// Offset from the generator for a new particle.
    ///
    /// `number_ratio` is the particle's index in the emission over the
    /// emission size. The evenly spread circle uses it and never touches the
    /// RNG; the other shapes ignore it.
    pub fn get_emission_offset<R: Rng + ?Sized>(&self, number_ratio: f32, rng: &mut R) -> Vec2 {
        match self.shape {
            EmissionShape::Circle if self.evenly_spread => get_ratio_point_in_ring(
                self.circle_inner_dist,
                self.circle_outer_dist,
                self.circle_arc,
                self.circle_arc_rot,
                number_ratio,
            ),
            EmissionShape::Circle => get_random_point_in_ring(
                self.circle_inner_dist,
                self.circle_outer_dist,
                self.circle_arc,
                self.circle_arc_rot,
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
            ),
            EmissionShape::Rectangle => get_random_point_in_rectangular_ring(
                self.rect_inner_dist,
                self.rect_outer_dist,
                RectRingRolls {
                    axis_int: rng.gen_range(0..=1),
                    axis_float: rng.gen_range(0.0..=1.0),
                    px: rng.gen_range(0.0..=1.0),
                    py: rng.gen_range(0.0..=1.0),
                    side_int: rng.gen_range(0..=1),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_evenly_spread_circle_quarters() {
        let mut e = ParticleEmission::new(1.0, 4);
        e.shape = EmissionShape::Circle;
        e.circle_outer_dist = 10.0;
        e.evenly_spread = true;
        // The full arc starts at -TAU/2, so ratio 0 sits at 180°.
        let mut rng = StdRng::seed_from_u64(1);
        let points: Vec<Vec2> = [0.0, 0.25, 0.5, 0.75]
            .iter()
            .map(|r| e.get_emission_offset(*r, &mut rng))
            .collect();
        let expected = [
            Vec2::new(-5.0, 0.0),
            Vec2::new(0.0, -5.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(0.0, 5.0),
        ];
        for (p, ex) in points.iter().zip(expected) {
            assert!((*p - ex).length() < 1e-4, "{p:?} vs {ex:?}");
            assert!(p.length() <= 10.0);
        }
    }

    #[test]
    fn test_evenly_spread_ignores_rng() {
        let mut e = ParticleEmission::new(1.0, 4);
        e.shape = EmissionShape::Circle;
        e.circle_outer_dist = 10.0;
        e.evenly_spread = true;
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(e.get_emission_offset(0.3, &mut a), e.get_emission_offset(0.3, &mut b));
    }

    #[test]
    fn test_random_circle_within_ring() {
        let mut e = ParticleEmission::new(1.0, 4);
        e.shape = EmissionShape::Circle;
        e.circle_inner_dist = 5.0;
        e.circle_outer_dist = 10.0;
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let d = e.get_emission_offset(0.0, &mut rng).length();
            assert!((5.0 - 1e-3..=10.0 + 1e-3).contains(&d), "{d}");
        }
    }

    #[test]
    fn test_rectangle_ring_avoids_hole() {
        let mut e = ParticleEmission::new(1.0, 4);
        e.rect_outer_dist = Vec2::new(20.0, 10.0);
        e.rect_inner_dist = Vec2::new(10.0, 5.0);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let p = e.get_emission_offset(0.0, &mut rng);
            assert!(p.x.abs() <= 20.0 + 1e-3 && p.y.abs() <= 10.0 + 1e-3, "{p:?}");
            assert!(p.x.abs() >= 10.0 - 1e-3 || p.y.abs() >= 5.0 - 1e-3, "{p:?}");
        }
    }
}
