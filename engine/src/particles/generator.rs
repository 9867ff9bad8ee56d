//! Particle Generator
//!
//! Emits batches of particles cloned from a base template, with every
//! stochastic property deviated independently per particle. Generators
//! can follow a moving target; the caller refreshes the target snapshot
//! before ticking.

use glam::Vec2;
use rand::Rng;

use super::emission::{EmissionShape, ParticleEmission};
use super::manager::ParticleManager;
use super::particle::{Particle, ParticleAngleType, ParticleBlendType, ParticlePriority};
use crate::data::{DataNode, DataReader, DataWriter};
use crate::math::{rand_dev, rand_f32, rand_i32, rotate_point, KeyframeInterpolator};

/// Position snapshot of whatever a generator follows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FollowTarget {
    pub pos: Vec2,
    pub z: f32,
}

/// Produces particles on a timer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleGenerator {
    pub name: String,
    /// Template every emitted particle starts from.
    pub base_particle: Particle,
    pub emission: ParticleEmission,
    /// Time left until the next emission.
    pub emission_timer: f32,

    /// Followed target, if any.
    pub follow: Option<FollowTarget>,
    /// Angle the offsets and speeds get rotated by, if any.
    pub follow_angle: Option<f32>,
    pub follow_pos_offset: Vec2,
    pub follow_z_offset: f32,

    pub bmp_angle_deviation: f32,
    pub duration_deviation: f32,
    pub friction_deviation: f32,
    pub size_deviation: f32,
    pub outwards_speed_deviation: f32,
    pub orbital_speed_deviation: f32,
    /// Per-axis linear speed deviation.
    pub linear_speed_deviation: Vec2,
    /// Random rotation applied to the linear speed.
    pub linear_speed_angle_deviation: f32,
    /// If true, linear speeds ignore `follow_angle`.
    pub angles_are_absolute: bool,
}

impl Default for ParticleGenerator {
    fn default() -> Self {
        Self::new(0.0, Particle::default(), 1)
    }
}

impl ParticleGenerator {
    pub fn new(interval: f32, base_particle: Particle, number: usize) -> Self {
        Self {
            name: String::new(),
            base_particle,
            emission: ParticleEmission::new(interval, number),
            emission_timer: 0.0,
            follow: None,
            follow_angle: None,
            follow_pos_offset: Vec2::ZERO,
            follow_z_offset: 0.0,
            bmp_angle_deviation: 0.0,
            duration_deviation: 0.0,
            friction_deviation: 0.0,
            size_deviation: 0.0,
            outwards_speed_deviation: 0.0,
            orbital_speed_deviation: 0.0,
            linear_speed_deviation: Vec2::ZERO,
            linear_speed_angle_deviation: 0.0,
            angles_are_absolute: false,
        }
    }

    /// Where particles are emitted from, follow offsets included.
    pub fn effective_origin(&self) -> (Vec2, f32) {
        let mut offset = self.follow_pos_offset;
        if let Some(angle) = self.follow_angle {
            offset = rotate_point(offset, angle);
        }
        (self.base_particle.pos + offset, self.base_particle.z + self.follow_z_offset)
    }

    /// Emits one batch right now, regardless of the timer.
    ///
    /// Nothing is emitted if the origin is outside every viewport of the
    /// manager. Returns how many particles were offered to the manager.
    pub fn emit<R: Rng + ?Sized>(&self, manager: &mut ParticleManager, rng: &mut R) -> usize {
        let (origin, z) = self.effective_origin();

        if !manager.is_point_visible(origin) {
            return 0;
        }

        let dev = self.emission.number_deviation as i32;
        let final_nr = (self.emission.number as i32 + rand_i32(rng, -dev, dev)).max(0) as usize;

        for p in 0..final_nr {
            let mut new_p = self.base_particle.clone();

            new_p.duration = (new_p.duration + rand_dev(rng, self.duration_deviation)).max(0.0);
            new_p.time = new_p.duration;

            if new_p.bmp_angle_type == ParticleAngleType::Fixed {
                new_p.bmp_angle += rand_dev(rng, self.bmp_angle_deviation);
            }
            new_p.friction += rand_dev(rng, self.friction_deviation);

            new_p.origin = origin;
            let mut offset = self.emission.get_emission_offset(p as f32 / final_nr as f32, rng);
            if let Some(angle) = self.follow_angle {
                offset = rotate_point(offset, angle);
            }
            new_p.pos = origin + offset;
            new_p.z = z;

            let size_dev = rand_dev(rng, self.size_deviation);
            new_p.size.map_values(|s| s + size_dev);

            let mut angle_to_use = rand_dev(rng, self.linear_speed_angle_deviation);
            if let Some(angle) = self.follow_angle {
                if !self.angles_are_absolute {
                    angle_to_use += angle;
                }
            }
            let v_dev = Vec2::new(
                rand_dev(rng, self.linear_speed_deviation.x),
                rand_dev(rng, self.linear_speed_deviation.y),
            );
            new_p
                .linear_speed
                .map_values(|v| rotate_point(*v + v_dev, angle_to_use));

            let out_dev = rand_dev(rng, self.outwards_speed_deviation);
            new_p.outwards_speed.map_values(|s| s + out_dev);

            let orb_dev = rand_dev(rng, self.orbital_speed_deviation);
            new_p.orbital_speed.map_values(|s| s + orb_dev);

            manager.add(new_p);
        }

        final_nr
    }

    /// Advances the timer, emitting once if it ran out.
    ///
    /// A tick emits at most one batch no matter how large `dt` is. Missed
    /// intervals are dropped and the timer restarts from now.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, manager: &mut ParticleManager, rng: &mut R) {
        if let Some(target) = self.follow {
            self.base_particle.pos = target.pos;
            self.base_particle.z = target.z;
        }
        self.emission_timer -= dt;
        if self.emission_timer <= 0.0 {
            self.emit(manager, rng);
            self.restart_timer(rng);
        }
    }

    /// Re-rolls the time until the next emission.
    pub fn restart_timer<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let e = &self.emission;
        self.emission_timer = if e.interval_deviation == 0.0 {
            e.interval
        } else {
            rand_f32(
                rng,
                (e.interval - e.interval_deviation).max(0.0),
                e.interval + e.interval_deviation,
            )
        };
    }

    /// Loads the generator from a data node. Missing values keep their
    /// current contents; malformed ones are logged and skipped.
    pub fn load_from_data_node(&mut self, node: &DataNode) {
        let base_node = node.child_by_name("base");
        let emission_node = node.child_by_name("emission");
        let g_rs = DataReader::new(Some(node));
        let p_rs = DataReader::new(base_node);
        let e_rs = DataReader::new(emission_node);

        g_rs.set_string("name", &mut self.name);

        let mut interval = 0.0;
        let mut number = 1usize;
        let mut shape_idx = 0usize;
        e_rs.set("number", &mut number);
        e_rs.set_f32("interval", &mut interval);
        self.emission = ParticleEmission::new(interval, number);
        e_rs.set_f32("interval_deviation", &mut self.emission.interval_deviation);
        e_rs.set("number_deviation", &mut self.emission.number_deviation);
        e_rs.set("shape", &mut shape_idx);

        let shape = EmissionShape::from_index(shape_idx).unwrap_or_else(|| {
            log::error!("Unknown particle emission shape {shape_idx}");
            EmissionShape::Circle
        });
        match shape {
            EmissionShape::Circle => {
                e_rs.set_f32("circle_outer_dist", &mut self.emission.circle_outer_dist);
                e_rs.set_f32("circle_inner_dist", &mut self.emission.circle_inner_dist);
                e_rs.set_f32("circle_arc", &mut self.emission.circle_arc);
                e_rs.set_f32("circle_arc_rot", &mut self.emission.circle_arc_rot);
                e_rs.set_bool("evenly_spread", &mut self.emission.evenly_spread);
            }
            EmissionShape::Rectangle => {
                e_rs.set_point("rect_outer_dist", &mut self.emission.rect_outer_dist);
                e_rs.set_point("rect_inner_dist", &mut self.emission.rect_inner_dist);
            }
        }
        self.emission.shape = shape;

        let base = &mut self.base_particle;
        let mut bitmap = String::new();
        let mut angle_type = base.bmp_angle_type.index();
        let mut blend = base.blend_type.index();
        p_rs.set_string("bitmap", &mut bitmap);
        p_rs.set_degrees("bitmap_angle", &mut base.bmp_angle);
        p_rs.set("bitmap_angle_type", &mut angle_type);
        p_rs.set_f32("duration", &mut base.duration);
        p_rs.set_f32("friction", &mut base.friction);
        p_rs.set("blend_type", &mut blend);
        base.bitmap = (!bitmap.is_empty()).then_some(bitmap);
        base.bmp_angle_type = ParticleAngleType::from_index(angle_type);
        base.blend_type = ParticleBlendType::from_index(blend);

        if let Some(b) = base_node {
            load_track(b, "color", &mut base.color);
            load_track(b, "size", &mut base.size);
            load_track(b, "linear_speed", &mut base.linear_speed);
            load_track(b, "outwards_speed", &mut base.outwards_speed);
            load_track(b, "orbital_speed", &mut base.orbital_speed);
        }

        base.time = base.duration;
        base.priority = ParticlePriority::Medium;

        g_rs.set_degrees("bitmap_angle_deviation", &mut self.bmp_angle_deviation);
        g_rs.set_f32("duration_deviation", &mut self.duration_deviation);
        g_rs.set_f32("friction_deviation", &mut self.friction_deviation);
        g_rs.set_f32("size_deviation", &mut self.size_deviation);
        g_rs.set_degrees("angle_deviation", &mut self.linear_speed_angle_deviation);
        g_rs.set_point("linear_speed_deviation", &mut self.linear_speed_deviation);
        g_rs.set_f32("orbital_speed_deviation", &mut self.orbital_speed_deviation);
        g_rs.set_f32("outwards_speed_deviation", &mut self.outwards_speed_deviation);
        g_rs.set_bool("angles_are_absolute", &mut self.angles_are_absolute);

        log::debug!(
            "Loaded particle generator '{}' ({:?}, {} per emission)",
            self.name,
            self.emission.shape,
            self.emission.number
        );
    }

    pub fn save_to_data_node(&self, node: &mut DataNode) {
        if !self.name.is_empty() {
            node.add_new("name", self.name.clone());
        }

        let e = &self.emission;
        let mut e_gw = DataWriter::new(node.add_new("emission", ""));
        e_gw.write("number", &e.number);
        e_gw.write("number_deviation", &e.number_deviation);
        e_gw.write("interval", &e.interval);
        e_gw.write("interval_deviation", &e.interval_deviation);
        e_gw.write("shape", &e.shape.index());
        match e.shape {
            EmissionShape::Circle => {
                e_gw.write("circle_outer_dist", &e.circle_outer_dist);
                e_gw.write("circle_inner_dist", &e.circle_inner_dist);
                e_gw.write("circle_arc", &e.circle_arc);
                e_gw.write("circle_arc_rot", &e.circle_arc_rot);
                e_gw.write("evenly_spread", &e.evenly_spread);
            }
            EmissionShape::Rectangle => {
                e_gw.write("rect_outer_dist", &e.rect_outer_dist);
                e_gw.write("rect_inner_dist", &e.rect_inner_dist);
            }
        }

        let base = &self.base_particle;
        let base_node = node.add_new("base", "");
        {
            let mut p_gw = DataWriter::new(&mut *base_node);
            p_gw.write("bitmap", &base.bitmap.clone().unwrap_or_default());
            p_gw.write_degrees("bitmap_angle", base.bmp_angle);
            p_gw.write("bitmap_angle_type", &base.bmp_angle_type.index());
            p_gw.write("duration", &base.duration);
            p_gw.write("friction", &base.friction);
            p_gw.write("blend_type", &base.blend_type.index());
        }
        base.color.save_to_data_node(base_node.add_new("color", ""));
        base.size.save_to_data_node(base_node.add_new("size", ""));
        base.linear_speed.save_to_data_node(base_node.add_new("linear_speed", ""));
        base.outwards_speed.save_to_data_node(base_node.add_new("outwards_speed", ""));
        base.orbital_speed.save_to_data_node(base_node.add_new("orbital_speed", ""));

        let mut g_gw = DataWriter::new(node);
        g_gw.write_degrees("bitmap_angle_deviation", self.bmp_angle_deviation);
        g_gw.write("duration_deviation", &self.duration_deviation);
        g_gw.write("friction_deviation", &self.friction_deviation);
        g_gw.write("size_deviation", &self.size_deviation);
        g_gw.write("orbital_speed_deviation", &self.orbital_speed_deviation);
        g_gw.write("outwards_speed_deviation", &self.outwards_speed_deviation);
        g_gw.write_degrees("angle_deviation", self.linear_speed_angle_deviation);
        g_gw.write("linear_speed_deviation", &self.linear_speed_deviation);
        g_gw.write("angles_are_absolute", &self.angles_are_absolute);
    }
}

fn load_track<T>(base_node: &DataNode, name: &str, track: &mut KeyframeInterpolator<T>)
where
    T: crate::math::Interpolate + crate::data::DataValue,
{
    if let Some(n) = base_node.child_by_name(name) {
        track.load_from_data_node(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use crate::math::{Color, Ease};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn base() -> Particle {
        Particle::new(Vec2::ZERO, 0.0, 4.0, 2.0, ParticlePriority::Medium, Color::WHITE)
    }

    #[test]
    fn test_tick_emits_once_and_resets_timer() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = ParticleManager::new(16);
        let mut g = ParticleGenerator::new(1.0, base(), 3);
        g.emission_timer = 1.0;
        g.tick(1.0, &mut m, &mut rng);
        assert_eq!(m.count(), 3);
        assert_eq!(g.emission_timer, 1.0);
    }

    #[test]
    fn test_large_dt_still_emits_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = ParticleManager::new(64);
        let mut g = ParticleGenerator::new(0.1, base(), 2);
        g.tick(5.0, &mut m, &mut rng);
        assert_eq!(m.count(), 2);
    }

    #[test]
    fn test_emit_culled_outside_viewports() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = ParticleManager::new(16);
        m.set_viewports(vec![Viewport::full_window(Vec2::new(100.0, 100.0))]);
        let mut g = ParticleGenerator::new(1.0, base(), 3);
        g.base_particle.pos = Vec2::new(1000.0, 0.0);
        assert_eq!(g.emit(&mut m, &mut rng), 0);
        assert_eq!(m.count(), 0);

        g.base_particle.pos = Vec2::new(10.0, 0.0);
        assert_eq!(g.emit(&mut m, &mut rng), 3);
    }

    #[test]
    fn test_follow_offsets_rotate() {
        let mut g = ParticleGenerator::new(1.0, base(), 1);
        g.follow = Some(FollowTarget { pos: Vec2::new(5.0, 5.0), z: 2.0 });
        g.follow_pos_offset = Vec2::new(10.0, 0.0);
        g.follow_angle = Some(std::f32::consts::FRAC_PI_2);
        g.follow_z_offset = 1.0;
        let mut m = ParticleManager::new(4);
        let mut rng = StdRng::seed_from_u64(1);
        g.emission_timer = 10.0;
        g.tick(0.1, &mut m, &mut rng);
        let (origin, z) = g.effective_origin();
        assert!((origin - Vec2::new(5.0, 15.0)).length() < 1e-4);
        assert_eq!(z, 3.0);
    }

    #[test]
    fn test_deviations_applied_to_all_keyframes() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut m = ParticleManager::new(4);
        let mut p = base();
        p.size.add(1.0, 8.0, Ease::None);
        let mut g = ParticleGenerator::new(1.0, p, 1);
        g.size_deviation = 2.0;
        g.emit(&mut m, &mut rng);
        let emitted = m.get(0).unwrap();
        let d0 = emitted.size.get_keyframe(0).unwrap().1 - 4.0;
        let d1 = emitted.size.get_keyframe(1).unwrap().1 - 8.0;
        assert!((d0 - d1).abs() < 1e-5);
        assert!(d0.abs() <= 2.0);
    }

    #[test]
    fn test_linear_speed_rotated_by_follow_angle() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut m = ParticleManager::new(4);
        let mut p = base();
        p.linear_speed = KeyframeInterpolator::new(Vec2::new(10.0, 0.0));
        let mut g = ParticleGenerator::new(1.0, p, 1);
        g.follow_angle = Some(std::f32::consts::PI);
        g.emit(&mut m, &mut rng);
        let v = m.get(0).unwrap().linear_speed.get(0.0);
        assert!((v - Vec2::new(-10.0, 0.0)).length() < 1e-4);

        g.angles_are_absolute = true;
        m.clear();
        g.emit(&mut m, &mut rng);
        let v = m.get(0).unwrap().linear_speed.get(0.0);
        assert!((v - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_restart_timer_with_deviation() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut g = ParticleGenerator::new(1.0, base(), 1);
        g.emission.interval_deviation = 2.0;
        for _ in 0..50 {
            g.restart_timer(&mut rng);
            assert!((0.0..=3.0).contains(&g.emission_timer));
        }
    }

    #[test]
    fn test_data_round_trip() {
        let mut g = ParticleGenerator::new(0.5, base(), 6);
        g.name = "sparkles".into();
        g.emission.shape = EmissionShape::Circle;
        g.emission.circle_outer_dist = 12.0;
        g.emission.evenly_spread = true;
        g.base_particle.bitmap = Some("sparkle".into());
        g.base_particle.blend_type = ParticleBlendType::Additive;
        g.base_particle.bmp_angle_type = ParticleAngleType::Direction;
        g.base_particle.color.add(1.0, Color::TRANSPARENT, Ease::None);
        g.linear_speed_deviation = Vec2::new(3.0, 4.0);
        g.angles_are_absolute = true;

        let mut node = DataNode::new("generator", "");
        g.save_to_data_node(&mut node);

        let mut loaded = ParticleGenerator::default();
        loaded.load_from_data_node(&node);
        assert_eq!(loaded.name, "sparkles");
        assert_eq!(loaded.emission.shape, EmissionShape::Circle);
        assert_eq!(loaded.emission.number, 6);
        assert_eq!(loaded.emission.circle_outer_dist, 12.0);
        assert!(loaded.emission.evenly_spread);
        assert_eq!(loaded.base_particle.bitmap.as_deref(), Some("sparkle"));
        assert_eq!(loaded.base_particle.blend_type, ParticleBlendType::Additive);
        assert_eq!(loaded.base_particle.bmp_angle_type, ParticleAngleType::Direction);
        assert_eq!(loaded.base_particle.color.keyframe_count(), 2);
        assert_eq!(loaded.linear_speed_deviation, Vec2::new(3.0, 4.0));
        assert!(loaded.angles_are_absolute);
        assert_eq!(loaded.base_particle.time, loaded.base_particle.duration);
    }

    #[test]
    fn test_degrees_in_data() {
        let mut node = DataNode::new("generator", "");
        node.add_new("angle_deviation", "90");
        let mut g = ParticleGenerator::default();
        g.load_from_data_node(&node);
        assert!((g.linear_speed_angle_deviation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
