//! A single particle.
//!
//! Particles are plain values. Every animated property is a keyframe track
//! sampled by the particle's age ratio `t = 1 - time / duration`.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{angle_to_coordinates, coordinates_to_angle, get_angle, rand_f32, Color, KeyframeInterpolator};
use crate::render::{BlendGuard, BlendMode, Renderer};

/// Eviction priority. Only compared against other particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ParticlePriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleBlendType {
    #[default]
    Normal,
    Additive,
}

impl ParticleBlendType {
    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Self::Additive,
            _ => Self::Normal,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// How the bitmap angle is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleAngleType {
    /// Uses `bmp_angle` as is.
    #[default]
    Fixed,
    /// Faces the direction of travel every tick.
    Direction,
}

impl ParticleAngleType {
    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Self::Direction,
            _ => Self::Fixed,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A short-lived visual point.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Total lifespan in seconds.
    pub duration: f32,
    /// Time left to live. The particle is dead when this is 0.
    pub time: f32,
    pub pos: Vec2,
    pub z: f32,
    /// Where the particle was emitted from. Outwards and orbital speeds
    /// are relative to this.
    pub origin: Vec2,
    pub size: KeyframeInterpolator<f32>,
    pub linear_speed: KeyframeInterpolator<Vec2>,
    pub outwards_speed: KeyframeInterpolator<f32>,
    pub orbital_speed: KeyframeInterpolator<f32>,
    pub color: KeyframeInterpolator<Color>,
    pub friction: f32,
    /// Friction banked over the particle's life so far.
    pub total_friction_applied: Vec2,
    pub blend_type: ParticleBlendType,
    pub priority: ParticlePriority,
    /// Internal name of the bitmap. `None` draws a filled circle.
    pub bitmap: Option<String>,
    pub bmp_angle: f32,
    pub bmp_angle_type: ParticleAngleType,
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0, 0.0, 0.0, ParticlePriority::Medium, Color::WHITE)
    }
}

impl Particle {
    pub fn new(
        pos: Vec2,
        z: f32,
        initial_size: f32,
        duration: f32,
        priority: ParticlePriority,
        initial_color: Color,
    ) -> Self {
        Self {
            duration,
            time: duration,
            pos,
            z,
            origin: Vec2::ZERO,
            size: KeyframeInterpolator::new(initial_size),
            linear_speed: KeyframeInterpolator::new(Vec2::ZERO),
            outwards_speed: KeyframeInterpolator::new(0.0),
            orbital_speed: KeyframeInterpolator::new(0.0),
            color: KeyframeInterpolator::new(initial_color),
            friction: 0.0,
            total_friction_applied: Vec2::ZERO,
            blend_type: ParticleBlendType::Normal,
            priority,
            bitmap: None,
            bmp_angle: 0.0,
            bmp_angle_type: ParticleAngleType::Fixed,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.time == 0.0
    }

    /// Age ratio in [0, 1]. A zero-duration particle counts as fully aged.
    pub fn age_ratio(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.time / self.duration
        }
    }

    /// Advances the particle by `dt` seconds. Dead particles don't move.
    ///
    /// Friction is computed from the combined velocity of the frame and then
    /// banked, so it keeps being subtracted on every later frame.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        self.time -= dt;
        if self.time <= 0.0 {
            self.time = 0.0;
            return;
        }

        let t = 1.0 - self.time / self.duration;

        let mut total_velocity = self.linear_speed.get(t);
        let outwards_angle = if self.pos == self.origin {
            rand_f32(rng, -TAU / 2.0, TAU / 2.0)
        } else {
            get_angle(self.pos - self.origin)
        };
        total_velocity += angle_to_coordinates(outwards_angle, self.outwards_speed.get(t));
        total_velocity += angle_to_coordinates(outwards_angle + TAU / 4.0, self.orbital_speed.get(t));

        total_velocity -= self.total_friction_applied;
        let new_friction = total_velocity * (dt * self.friction);
        self.total_friction_applied += new_friction;
        total_velocity -= new_friction;

        self.pos += total_velocity * dt;

        if self.bmp_angle_type == ParticleAngleType::Direction {
            self.bmp_angle = coordinates_to_angle(total_velocity).0;
        }
    }

    /// Draws the particle in world coordinates.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let t = self.age_ratio();
        let color = self.color.get(t);
        let size = self.size.get(t);
        if size <= 0.0 {
            return;
        }

        match self.blend_type {
            ParticleBlendType::Additive => {
                let mut guard = BlendGuard::new(renderer, BlendMode::Additive);
                self.draw_shape(&mut *guard, size, color);
            }
            ParticleBlendType::Normal => self.draw_shape(renderer, size, color),
        }
    }

    fn draw_shape(&self, renderer: &mut dyn Renderer, size: f32, color: Color) {
        match &self.bitmap {
            Some(bmp) => renderer.draw_bitmap(bmp, self.pos, Vec2::new(size, -1.0), self.bmp_angle, color),
            None => renderer.draw_filled_circle(self.pos, size * 0.5, color),
        }
    }
}
