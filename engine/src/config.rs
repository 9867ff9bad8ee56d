//! Engine Configuration
//!
//! Centralized tuning values for the engine subsystems, loadable from a JSON
//! file. Every section falls back to its defaults when missing, so a config
//! file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::area::GeometryConfig;
use crate::error::ConfigError;
use crate::gameplay::DismissConfig;
use crate::gui::GuiConfig;
use crate::input::ControlsOptions;

/// Particle system settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Capacity of the gameplay particle manager.
    pub max_count: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self { max_count: 1500 }
    }
}

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub particles: ParticleConfig,
    pub controls: ControlsOptions,
    pub gui: GuiConfig,
    pub geometry: GeometryConfig,
    pub dismiss: DismissConfig,
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Loads `path`, or returns defaults if it can't be read.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Using default engine config ({}: {e})", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.particles.max_count, 1500);
        assert_eq!(c.controls.stick_max_deadzone, 1.0);
        assert_eq!(c.gui.auto_repeat.fastest_interval, 0.011);
        assert_eq!(c.geometry.step_height, 50.0);
        assert_eq!(c.dismiss.subgroup_distance, 48.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = EngineConfig::from_json_str(r#"{ "particles": { "max_count": 20 } }"#).unwrap();
        assert_eq!(c.particles.max_count, 20);
        assert_eq!(c.controls, ControlsOptions::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut c = EngineConfig::default();
        c.controls.stick_min_deadzone = 0.2;
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), c);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }
}
