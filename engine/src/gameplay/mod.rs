//! Gameplay Module
//!
//! Mob behavior built on top of the engine systems. For now this is the
//! leader's dismiss, which lays out the group with the geometry helpers and
//! celebrates with a particle burst.

pub mod dismiss;

pub use dismiss::{
    emit_dismiss_particles, get_dismiss_rows, plan_dismiss, subgroup_radius, DismissConfig,
    DismissPlan, GroupMember, Leader, MemberKind, SubgroupPlan, DISMISS_PARTICLE_AMOUNT,
};
