//! Scene and host configuration
//!
//! Loaded from a JSON file, then overridden from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Environment variable overriding the starting ammo
pub const ENV_INITIAL_AMMO: &str = "SPACE_CANNON_INITIAL_AMMO";
/// Environment variable overriding the starting score
pub const ENV_INITIAL_SCORE: &str = "SPACE_CANNON_INITIAL_SCORE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scene ===
    /// Scene width in points
    pub scene_width: f32,
    /// Scene height in points
    pub scene_height: f32,
    /// Ammo when the scene is created
    pub initial_ammo: i32,
    /// Score when the scene is created
    pub initial_score: i32,

    // === Host loop ===
    /// Fixed step length in seconds
    pub fixed_dt: f32,
    /// Maximum steps per advance, to prevent a spiral of death
    pub max_substeps: u32,
    /// Longest frame time accepted by one advance, in seconds
    pub max_frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_width: consts::SCENE_WIDTH,
            scene_height: consts::SCENE_HEIGHT,
            initial_ammo: 0,
            initial_score: 0,

            fixed_dt: consts::SIM_DT,
            max_substeps: consts::MAX_SUBSTEPS,
            max_frame_dt: consts::MAX_FRAME_DT,
        }
    }
}

impl Settings {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a JSON file and apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut settings = Self::from_json_str(&json)?;
        settings.apply_env_overrides();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Defaults plus environment overrides, for when no file is given
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    /// Apply `SPACE_CANNON_*` overrides. Unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`, keyed by the `ENV_*` names
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(ammo) = parse_i32(ENV_INITIAL_AMMO, lookup(ENV_INITIAL_AMMO)) {
            self.initial_ammo = ammo;
        }
        if let Some(score) = parse_i32(ENV_INITIAL_SCORE, lookup(ENV_INITIAL_SCORE)) {
            self.initial_score = score;
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.scene_width > 0.0 && self.scene_height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "scene size must be positive, got {}x{}",
                self.scene_width, self.scene_height
            )));
        }
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(SettingsError::Invalid(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid("max_substeps must be at least 1".into()));
        }
        if !(self.max_frame_dt >= self.fixed_dt && self.max_frame_dt.is_finite()) {
            return Err(SettingsError::Invalid(format!(
                "max_frame_dt ({}) must be at least fixed_dt ({})",
                self.max_frame_dt, self.fixed_dt
            )));
        }
        Ok(())
    }
}

fn parse_i32(key: &str, raw: Option<String>) -> Option<i32> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not an integer", key, raw);
            None
        }
    }
}
