//! Particle System
//!
//! Generators emit batches of keyframe-animated particles into a
//! fixed-capacity manager, which ticks them, evicts by priority when full,
//! and hands out Z-sortable draw records.

pub mod emission;
pub mod generator;
pub mod manager;
pub mod particle;

pub use emission::{EmissionShape, ParticleEmission};
pub use generator::{FollowTarget, ParticleGenerator};
pub use manager::{AddOutcome, ParticleManager, WorldComponent};
pub use particle::{Particle, ParticleAngleType, ParticleBlendType, ParticlePriority};
