//! Engine tuning, loadable from TOML.
//!
//! Every field has a default, so a config file only lists what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use salvo_core::constants::*;

/// Anti-oscillation tuning for seeker guidance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Bearing error (degrees) beyond which the turn command is scaled down.
    pub damping_threshold_deg: f64,
    /// Bearing error (degrees) beyond which the turn direction is latched.
    pub latch_threshold_deg: f64,
    /// How long a latched direction is held.
    pub latch_ticks: u32,
    /// Floor of the damped turn scale.
    pub min_turn_scale: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            damping_threshold_deg: GUIDANCE_DAMPING_THRESHOLD_DEG,
            latch_threshold_deg: GUIDANCE_LATCH_THRESHOLD_DEG,
            latch_ticks: GUIDANCE_LATCH_TICKS,
            min_turn_scale: GUIDANCE_MIN_TURN_SCALE,
        }
    }
}

/// Munition impact detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Test the whole segment flown this tick instead of only its end point.
    pub swept: bool,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self { swept: true }
    }
}

/// Configuration for an engagement engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub guidance: GuidanceConfig,
    pub impact: ImpactConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
