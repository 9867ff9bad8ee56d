//! Particle Manager
//!
//! Fixed-capacity particle store. Live particles always occupy the slots
//! `[0, count)` and dead ones (time 0) occupy `[count, max_count)`. Removal
//! moves the last live particle into the freed slot, so indexes are only
//! valid until the next `remove` or `tick_all`.

use glam::Vec2;
use rand::Rng;

use super::particle::Particle;
use crate::camera::Viewport;
use crate::math::rectangles_intersect;
use crate::render::Renderer;

/// What happened to a particle offered to [`ParticleManager::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended into free space.
    Appended,
    /// The particle at this index was evicted to make room.
    Evicted(usize),
    /// No room and nothing to evict; the particle was discarded.
    Dropped,
}

impl AddOutcome {
    pub fn was_added(self) -> bool {
        !matches!(self, AddOutcome::Dropped)
    }
}

/// Draw-order record for a particle, sorted by Z with other world content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldComponent {
    pub particle_idx: usize,
    pub z: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ParticleManager {
    particles: Vec<Particle>,
    count: usize,
    /// Cameras used by generators to skip off-screen emissions.
    viewports: Vec<Viewport>,
}

impl ParticleManager {
    pub fn new(max_count: usize) -> Self {
        let mut particles = Vec::with_capacity(max_count);
        particles.resize_with(max_count, Particle::default);
        Self {
            particles,
            count: 0,
            viewports: Vec::new(),
        }
    }

    /// Adds a particle. When full, the first particle (scanning from index 0)
    /// with a strictly lower priority gets evicted. If there is none, the new
    /// particle is dropped.
    pub fn add(&mut self, p: Particle) -> AddOutcome {
        if self.particles.is_empty() {
            return AddOutcome::Dropped;
        }

        let mut outcome = AddOutcome::Appended;
        if self.count == self.particles.len() {
            let Some(victim) = self.particles.iter().position(|old| old.priority < p.priority) else {
                return AddOutcome::Dropped;
            };
            self.remove(victim);
            outcome = AddOutcome::Evicted(victim);
        }

        self.particles[self.count] = p;
        self.count += 1;
        outcome
    }

    /// Kills every particle.
    pub fn clear(&mut self) {
        for p in &mut self.particles {
            p.time = 0.0;
        }
        self.count = 0;
    }

    /// Removes the live particle at `idx`. Out of range indexes are ignored.
    pub fn remove(&mut self, idx: usize) {
        if idx >= self.count {
            return;
        }

        self.particles[idx].time = 0.0;

        if self.count == 1 {
            self.count = 0;
            return;
        }

        let last = self.count - 1;
        self.particles.swap(idx, last);
        self.particles[last].time = 0.0;
        self.count -= 1;
    }

    /// Ticks every live particle and compacts out the ones that died.
    pub fn tick_all<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let mut c = 0;
        while c < self.count {
            self.particles[c].tick(dt, rng);
            if self.particles[c].is_dead() {
                // The slot now holds what was the last live particle.
                self.remove(c);
            } else {
                c += 1;
            }
        }
    }

    /// Appends a draw record for every live particle touching the camera box.
    /// A box with `cam_tl == cam_br` disables culling.
    pub fn fill_component_list(&self, list: &mut Vec<WorldComponent>, cam_tl: Vec2, cam_br: Vec2) {
        for (idx, p) in self.iter().enumerate() {
            if cam_tl != cam_br {
                let size = p.size.get(p.age_ratio());
                if !rectangles_intersect(p.pos - size, p.pos + size, cam_tl, cam_br) {
                    continue;
                }
            }
            list.push(WorldComponent { particle_idx: idx, z: p.z });
        }
    }

    /// Draws the live particle at `idx`.
    pub fn draw(&self, idx: usize, renderer: &mut dyn Renderer) {
        if let Some(p) = self.get(idx) {
            p.draw(renderer);
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn max_count(&self) -> usize {
        self.particles.len()
    }

    pub fn get(&self, idx: usize) -> Option<&Particle> {
        self.particles[..self.count].get(idx)
    }

    /// Live particles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles[..self.count].iter()
    }

    /// Every slot, dead ones included.
    pub fn slots(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    pub fn set_viewports(&mut self, viewports: Vec<Viewport>) {
        self.viewports = viewports;
    }

    /// Whether a world point is inside any viewport. No viewports, or any
    /// degenerate viewport, means everything is visible.
    pub fn is_point_visible(&self, p: Vec2) -> bool {
        self.viewports.is_empty() || self.viewports.iter().any(|v| v.contains_world_point(p))
    }
}
