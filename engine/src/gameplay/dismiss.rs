//! Leader dismiss.
//!
//! Members of a leader's group are sorted into subgroups by type, each
//! subgroup is packed into a hexagonal cluster, and the clusters are laid
//! out in arched rows in front of the leader, like stripes on a rainbow.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{angle_to_coordinates, get_angle, linear_dist_to_angular, rand_f32, Color, Ease};
use crate::particles::{Particle, ParticleManager, ParticlePriority};

/// Subgroups can't spread past this angle around the dismiss direction.
pub const DISMISS_ANGLE_RANGE: f32 = TAU / 2.0;
/// Spacing of members inside a subgroup, relative to a standard diameter.
pub const DISMISS_MEMBER_SIZE_MULTIPLIER: f32 = 0.75;
/// Random offset added to each destination, per axis.
pub const DISMISS_JITTER: f32 = 5.0;

pub const DISMISS_PARTICLE_ALPHA: f32 = 1.0;
pub const DISMISS_PARTICLE_AMOUNT: usize = WHISTLE_DOT_COLORS.len() * 3;
pub const DISMISS_PARTICLE_FRICTION: f32 = 3.2;
pub const DISMISS_PARTICLE_MIN_DURATION: f32 = 1.0;
pub const DISMISS_PARTICLE_MAX_DURATION: f32 = 1.4;
pub const DISMISS_PARTICLE_MIN_SPEED: f32 = 170.0;
pub const DISMISS_PARTICLE_MAX_SPEED: f32 = 210.0;
pub const DISMISS_PARTICLE_SIZE: f32 = 8.0;
pub const DISMISS_PARTICLE_BITMAP: &str = "bright_circle";

/// Whistle dot colors, cycled through by the dismiss burst.
pub const WHISTLE_DOT_COLORS: [[u8; 3]; 6] = [
    [214, 25, 25],
    [242, 134, 48],
    [143, 227, 58],
    [55, 222, 222],
    [30, 30, 219],
    [133, 28, 237],
];

/// Dismiss layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissConfig {
    /// Radius of a standard group member.
    pub member_radius: f32,
    /// Gap between subgroups, and between the leader and the first row.
    pub subgroup_distance: f32,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            member_radius: 5.0,
            subgroup_distance: 48.0,
        }
    }
}

/// What kind of group member this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A regular member, sorted by its subgroup type.
    Subgroup(u32),
    /// Another leader. Leaders leave the group without a destination.
    Leader,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMember {
    pub pos: Vec2,
    pub kind: MemberKind,
}

impl GroupMember {
    pub fn new(pos: Vec2, subgroup_type: u32) -> Self {
        Self {
            pos,
            kind: MemberKind::Subgroup(subgroup_type),
        }
    }

    pub fn leader(pos: Vec2) -> Self {
        Self {
            pos,
            kind: MemberKind::Leader,
        }
    }
}

/// Placement of one subgroup.
#[derive(Debug, Clone, PartialEq)]
pub struct SubgroupPlan {
    pub subgroup_type: u32,
    /// Indexes into the dismissed member list.
    pub members: Vec<usize>,
    pub radius: f32,
    /// Cluster center, relative to the leader.
    pub center: Vec2,
    /// Arched row the subgroup landed on, 0 being closest to the leader.
    pub row: usize,
}

/// Where everyone goes after a dismiss.
#[derive(Debug, Clone, PartialEq)]
pub struct DismissPlan {
    pub base_angle: f32,
    /// Subgroups in order of first appearance in the group.
    pub subgroups: Vec<SubgroupPlan>,
    /// Absolute destination per member, `None` for leaders.
    pub destinations: Vec<Option<Vec2>>,
}

/// Rows needed to fit `n_members` in a hexagonal cluster. The first row
/// is one spot, the second six around it, the third twelve, and so on.
pub fn get_dismiss_rows(n_members: usize) -> usize {
    let mut members_that_fit = 1;
    let mut rows_needed = 1;
    while members_that_fit < n_members {
        rows_needed += 1;
        members_that_fit += 6 * (rows_needed - 1);
    }
    rows_needed
}

/// Radius of a subgroup cluster holding `n_members`.
pub fn subgroup_radius(n_members: usize, config: &DismissConfig) -> f32 {
    let rows = get_dismiss_rows(n_members);
    config.member_radius
        + config.member_radius * 2.0 * DISMISS_MEMBER_SIZE_MULTIPLIER * (rows - 1) as f32
}

#[derive(Debug, Clone, Default)]
struct ArchRow {
    subgroups: Vec<usize>,
    dist: f32,
    thickness: f32,
    angle_occupation: f32,
}

impl ArchRow {
    fn starting_at(dist: f32) -> Self {
        Self {
            dist,
            ..Self::default()
        }
    }

    fn mid_radius(&self, thickness: f32) -> f32 {
        self.dist + thickness / 2.0
    }
}

fn pack_rows(radii: &[f32], gap: f32) -> Vec<ArchRow> {
    let mut rows = Vec::new();
    let mut cur = ArchRow::starting_at(gap);
    let mut next = 0;

    while next < radii.len() {
        let new_thickness = cur.thickness.max(radii[next] * 2.0);

        let old_mid = cur.mid_radius(cur.thickness);
        let mut occupation = 0.0;
        for (i, &s) in cur.subgroups.iter().enumerate() {
            occupation += linear_dist_to_angular(radii[s] * 2.0, old_mid);
            if i + 1 < cur.subgroups.len() {
                occupation += linear_dist_to_angular(gap, old_mid);
            }
        }
        let new_mid = cur.mid_radius(new_thickness);
        if !cur.subgroups.is_empty() {
            occupation += linear_dist_to_angular(gap, new_mid);
        }
        occupation += linear_dist_to_angular(radii[next] * 2.0, new_mid);

        // An empty row always takes the subgroup, however wide.
        let fits = occupation <= DISMISS_ANGLE_RANGE || cur.subgroups.is_empty();
        if fits {
            cur.thickness = new_thickness;
            cur.angle_occupation = occupation;
            cur.subgroups.push(next);
            next += 1;
        }
        if !fits || next == radii.len() {
            let dist = cur.dist + cur.thickness + gap;
            rows.push(std::mem::replace(&mut cur, ArchRow::starting_at(dist)));
        }
    }

    rows
}

/// Plans a dismiss of `members` by a leader standing at `leader_pos`.
///
/// `swarm_angle` is the direction the leader is swarming towards, if any.
/// Otherwise members go away from the leader, towards the center of the
/// group's bounding box. Returns `None` for an empty group.
pub fn plan_dismiss<R: Rng + ?Sized>(
    leader_pos: Vec2,
    swarm_angle: Option<f32>,
    members: &[GroupMember],
    config: &DismissConfig,
    rng: &mut R,
) -> Option<DismissPlan> {
    let first = members.first()?;

    let base_angle = swarm_angle.unwrap_or_else(|| {
        let (min, max) = members
            .iter()
            .fold((first.pos, first.pos), |(min, max), m| (min.min(m.pos), max.max(m.pos)));
        get_angle((min + max) / 2.0 - leader_pos)
    });

    let mut subgroups: Vec<SubgroupPlan> = Vec::new();
    for (idx, member) in members.iter().enumerate() {
        let MemberKind::Subgroup(ty) = member.kind else {
            continue;
        };
        match subgroups.iter_mut().find(|s| s.subgroup_type == ty) {
            Some(s) => s.members.push(idx),
            None => subgroups.push(SubgroupPlan {
                subgroup_type: ty,
                members: vec![idx],
                radius: 0.0,
                center: Vec2::ZERO,
                row: 0,
            }),
        }
    }
    for s in &mut subgroups {
        s.radius = subgroup_radius(s.members.len(), config);
    }

    let radii: Vec<f32> = subgroups.iter().map(|s| s.radius).collect();
    let gap = config.subgroup_distance;
    for (r, row) in pack_rows(&radii, gap).iter().enumerate() {
        let mid = row.mid_radius(row.thickness);
        let mut cur_angle = -row.angle_occupation / 2.0;
        for (i, &s) in row.subgroups.iter().enumerate() {
            let radius = subgroups[s].radius;
            let subgroup_angle = cur_angle + linear_dist_to_angular(radius, mid);
            cur_angle += linear_dist_to_angular(radius * 2.0, mid);
            if i + 1 < row.subgroups.len() {
                cur_angle += linear_dist_to_angular(gap, mid);
            }
            subgroups[s].center = angle_to_coordinates(base_angle + subgroup_angle, mid);
            subgroups[s].row = r;
        }
    }

    let spacing = config.member_radius * 2.0 * DISMISS_MEMBER_SIZE_MULTIPLIER;
    let mut destinations = vec![None; members.len()];
    for s in &subgroups {
        let mut ring = 0;
        let mut spot = 0;
        let mut ring_spots = 1;
        for &m in &s.members {
            let mut dest = if ring == 0 {
                s.center
            } else {
                let angle = spot as f32 / ring_spots as f32 * TAU;
                s.center + angle_to_coordinates(angle, ring as f32 * spacing)
            };
            dest += Vec2::new(
                rand_f32(rng, -DISMISS_JITTER, DISMISS_JITTER),
                rand_f32(rng, -DISMISS_JITTER, DISMISS_JITTER),
            );

            spot += 1;
            if spot == ring_spots {
                ring += 1;
                spot = 0;
                ring_spots = if ring == 1 { 6 } else { ring_spots + 6 };
            }

            destinations[m] = Some(dest + leader_pos);
        }
    }

    Some(DismissPlan {
        base_angle,
        subgroups,
        destinations,
    })
}

/// Spawns the ring of colored dots a dismiss makes. Returns how many
/// particles made it into the manager.
pub fn emit_dismiss_particles<R: Rng + ?Sized>(
    pos: Vec2,
    z: f32,
    manager: &mut ParticleManager,
    rng: &mut R,
) -> usize {
    let mut added = 0;
    for p in 0..DISMISS_PARTICLE_AMOUNT {
        let [r, g, b] = WHISTLE_DOT_COLORS[p % WHISTLE_DOT_COLORS.len()];
        let color = Color::from_rgba8(r, g, b, 255).with_alpha(DISMISS_PARTICLE_ALPHA);
        let duration = rand_f32(rng, DISMISS_PARTICLE_MIN_DURATION, DISMISS_PARTICLE_MAX_DURATION);

        let mut par = Particle::new(
            pos,
            z,
            DISMISS_PARTICLE_SIZE,
            duration,
            ParticlePriority::Medium,
            color,
        );
        par.color.add(1.0, color.with_alpha(0.0), Ease::None);
        par.friction = DISMISS_PARTICLE_FRICTION;
        par.bitmap = Some(DISMISS_PARTICLE_BITMAP.to_string());

        let speed = rand_f32(rng, DISMISS_PARTICLE_MIN_SPEED, DISMISS_PARTICLE_MAX_SPEED);
        let angle = TAU / DISMISS_PARTICLE_AMOUNT as f32 * p as f32;
        par.linear_speed.set_keyframe_value(0, angle_to_coordinates(angle, speed));

        if manager.add(par).was_added() {
            added += 1;
        }
    }
    added
}

/// A leader and the group following them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Leader {
    pub pos: Vec2,
    pub z: f32,
    pub height: f32,
    pub group: Vec<GroupMember>,
}

impl Leader {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }

    /// Dismisses the whole group. Members leave the group, and the burst
    /// is emitted at the leader's mid-height. Does nothing without a group.
    pub fn dismiss<R: Rng + ?Sized>(
        &mut self,
        swarm_angle: Option<f32>,
        config: &DismissConfig,
        particles: &mut ParticleManager,
        rng: &mut R,
    ) -> Option<DismissPlan> {
        let plan = plan_dismiss(self.pos, swarm_angle, &self.group, config, rng)?;
        self.group.clear();
        let emitted = emit_dismiss_particles(self.pos, self.z + self.height / 2.0, particles, rng);
        log::debug!(
            "Dismissed {} subgroups, {emitted} particles",
            plan.subgroups.len()
        );
        Some(plan)
    }
}
