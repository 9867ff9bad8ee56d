//! Math Module
//!
//! Colors, easing, keyframe tracks, 2D geometry and RNG helpers shared by
//! every engine subsystem.

pub mod color;
pub mod easing;
pub mod geometry;
pub mod keyframe;
pub mod random;

pub use color::Color;
pub use easing::{ease, Ease};
pub use geometry::*;
pub use keyframe::{Interpolate, KeyframeInterpolator};
pub use random::{rand_dev, rand_f32, rand_i32};

/// Marks "not set" or "automatic" for lengths and distances.
pub const LARGE_FLOAT: f32 = 999_999.0;
