//! Onion Grove Engine Library
//!
//! The core of a top-down creature-herding game: particles, area geometry
//! effects, player controls and a widget GUI, all driven by explicit
//! per-frame ticks and drawn through a backend-agnostic renderer.
//!
//! # Modules
//!
//! - [`math`] - Colors, easing, keyframe tracks, 2D geometry and RNG helpers
//! - [`particles`] - Particles, emission shapes, generators and the capped manager
//! - [`area`] - Area layout and the edge offset effects (wall shadows, ledge smoothing, liquid limits)
//! - [`input`] - Input sources, binds, player actions and the controls mediator
//! - [`gui`] - Hierarchical GUI items and their manager
//! - [`gameplay`] - Mob behavior built on the above (leader dismiss)
//! - [`render`] - The drawing seam and a vertex-batching implementation
//! - [`camera`] - Viewports for culling
//! - [`data`] - Generic data trees for loading and saving content
//! - [`config`], [`error`], [`logging`], [`timing`] - Ambient support
//!
//! # Example
//!
//! ```ignore
//! use onion_grove_engine::config::EngineConfig;
//! use onion_grove_engine::input::ControlsMediator;
//! use onion_grove_engine::particles::ParticleManager;
//!
//! onion_grove_engine::logging::init();
//! let config = EngineConfig::load_or_default(Path::new("engine.json"));
//! let mut particles = ParticleManager::new(config.particles.max_count);
//! let mut controls = ControlsMediator::new(config.controls.clone());
//! controls.load_default_binds(1);
//!
//! loop {
//!     for action in controls.new_frame(dt) {
//!         // React to actions
//!     }
//!     particles.tick_all(dt, &mut rng);
//! }
//! ```

pub mod area;
pub mod camera;
pub mod config;
pub mod data;
pub mod error;
pub mod gameplay;
pub mod gui;
pub mod input;
pub mod logging;
pub mod math;
pub mod particles;
pub mod render;
pub mod timing;

// Re-export the types most hosts touch
pub use config::EngineConfig;
pub use error::{ConfigError, ControlsError, DataError};
pub use math::{Color, Ease, KeyframeInterpolator};
pub use render::{MeshRenderer, Renderer};
