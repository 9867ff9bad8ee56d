//! Particle Tests - Manager Capacity, Generators and Emission
//!
//! Exercises the particle pipeline through the public API: generators
//! feeding a capped manager, priority eviction, and emission shapes.

use std::f32::consts::TAU;

use glam::Vec2;
use onion_grove_engine::camera::Viewport;
use onion_grove_engine::math::{get_angle, Color};
use onion_grove_engine::particles::{
    AddOutcome, EmissionShape, FollowTarget, Particle, ParticleGenerator, ParticleManager,
    ParticlePriority,
};
use onion_grove_engine::render::MeshRenderer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn particle(priority: ParticlePriority, duration: f32) -> Particle {
    Particle::new(Vec2::ZERO, 0.0, 4.0, duration, priority, Color::WHITE)
}

fn assert_live_prefix(m: &ParticleManager) {
    assert!(m.count() <= m.max_count());
    for (i, p) in m.slots().iter().enumerate() {
        assert_eq!(i < m.count(), p.time > 0.0, "slot {i}");
    }
}

// ============================================================================
// Manager
// ============================================================================

#[test]
fn test_low_particles_make_room_for_high() {
    let mut m = ParticleManager::new(2);
    assert!(m.add(particle(ParticlePriority::Low, 1.0)).was_added());
    assert_eq!(m.count(), 1);
    assert!(m.add(particle(ParticlePriority::Low, 2.0)).was_added());
    assert_eq!(m.count(), 2);

    assert_eq!(m.add(particle(ParticlePriority::High, 3.0)), AddOutcome::Evicted(0));
    assert_eq!(m.count(), 2);
    assert_eq!(m.get(0).map(|p| p.priority), Some(ParticlePriority::Low));
    assert_eq!(m.get(1).map(|p| p.priority), Some(ParticlePriority::High));

    // Nothing is lower than a low one.
    assert_eq!(m.add(particle(ParticlePriority::Low, 4.0)), AddOutcome::Dropped);
    assert_eq!(m.add(particle(ParticlePriority::Medium, 4.0)), AddOutcome::Evicted(0));
    assert_eq!(m.add(particle(ParticlePriority::Medium, 5.0)), AddOutcome::Dropped);
}

#[test]
fn test_random_operations_keep_live_prefix() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut m = ParticleManager::new(16);

    for step in 0..400 {
        match rng.gen_range(0..3) {
            0 => {
                let priority = match rng.gen_range(0..3) {
                    0 => ParticlePriority::Low,
                    1 => ParticlePriority::Medium,
                    _ => ParticlePriority::High,
                };
                m.add(particle(priority, rng.gen_range(0.05..1.5)));
            }
            1 => m.remove(rng.gen_range(0..20)),
            _ => m.tick_all(rng.gen_range(0.0..0.3), &mut rng),
        }
        assert_live_prefix(&m);
        assert!(m.count() <= 16, "step {step}");
    }
}

#[test]
fn test_dead_particles_stay_put() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut p = particle(ParticlePriority::Medium, 0.5);
    p.linear_speed.set_keyframe_value(0, Vec2::new(100.0, 0.0));
    p.tick(1.0, &mut rng);
    assert!(p.is_dead());
    let pos = p.pos;
    p.tick(1.0, &mut rng);
    assert_eq!(p.time, 0.0);
    assert_eq!(p.pos, pos);
}

// ============================================================================
// Generators
// ============================================================================

#[test]
fn test_generator_emits_one_batch_per_interval() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut m = ParticleManager::new(50);
    let mut g = ParticleGenerator::new(1.0, particle(ParticlePriority::Medium, 5.0), 3);
    g.emission_timer = 1.0;

    g.tick(1.0, &mut m, &mut rng);
    assert_eq!(m.count(), 3);
    assert_eq!(g.emission_timer, 1.0);

    // A long hitch still only emits once.
    g.tick(4.5, &mut m, &mut rng);
    assert_eq!(m.count(), 6);
    assert_eq!(g.emission_timer, 1.0);
}

#[test]
fn test_generator_follows_target() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut m = ParticleManager::new(10);
    let mut g = ParticleGenerator::new(0.5, particle(ParticlePriority::Medium, 5.0), 1);
    g.follow = Some(FollowTarget { pos: Vec2::new(40.0, -10.0), z: 3.0 });

    g.tick(0.1, &mut m, &mut rng);
    let p = m.get(0).expect("emitted");
    assert_eq!(p.pos, Vec2::new(40.0, -10.0));
    assert_eq!(p.z, 3.0);
}

#[test]
fn test_generator_skips_offscreen_origin() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut m = ParticleManager::new(10);
    m.set_viewports(vec![Viewport::full_window(Vec2::new(200.0, 100.0)).with_camera(Vec2::ZERO, 1.0)]);

    let mut far = particle(ParticlePriority::Medium, 5.0);
    far.pos = Vec2::new(5000.0, 0.0);
    let g = ParticleGenerator::new(1.0, far, 4);
    assert_eq!(g.emit(&mut m, &mut rng), 0);
    assert_eq!(m.count(), 0);

    let near = ParticleGenerator::new(1.0, particle(ParticlePriority::Medium, 5.0), 4);
    assert_eq!(near.emit(&mut m, &mut rng), 4);
}

#[test]
fn test_evenly_spread_circle() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut g = ParticleGenerator::new(1.0, particle(ParticlePriority::Medium, 5.0), 4);
    g.emission.shape = EmissionShape::Circle;
    g.emission.circle_inner_dist = 0.0;
    g.emission.circle_outer_dist = 10.0;
    g.emission.circle_arc = TAU;
    g.emission.evenly_spread = true;

    let offsets: Vec<Vec2> = [0.0, 0.25, 0.5, 0.75]
        .into_iter()
        .map(|ratio| g.emission.get_emission_offset(ratio, &mut rng))
        .collect();

    let first = get_angle(offsets[0]);
    for (i, offset) in offsets.iter().enumerate() {
        assert!(offset.length() <= 10.0 + 1e-4);
        let diff = (get_angle(*offset) - first - TAU / 4.0 * i as f32).rem_euclid(TAU);
        assert!(diff < 1e-3 || diff > TAU - 1e-3, "particle {i}: {offset}");
    }
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_draw_live_particles() {
    let mut m = ParticleManager::new(4);
    m.add(particle(ParticlePriority::Medium, 1.0));
    m.add(particle(ParticlePriority::Medium, 1.0));

    let mut r = MeshRenderer::new();
    for i in 0..m.count() {
        m.draw(i, &mut r);
    }
    assert!(r.total_triangles() > 0);
}
