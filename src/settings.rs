//! Game settings and tuning
//!
//! Loaded from JSON; any field left out falls back to its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON is malformed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Update/draw passes per second
    pub fps: f64,
    /// Milliseconds between egg spawns
    pub egg_interval_ms: f64,
    /// Milliseconds an egg waits before hatching on its own
    pub hatch_interval_ms: f64,
    /// Maximum eggs on the field at once
    pub max_eggs: usize,
    /// Rescued hatchlings needed to end the match
    pub winning_score: u32,
    /// Obstacles requested at match start
    pub number_of_obstacles: usize,
    /// Candidate positions tried before obstacle placement gives up
    pub placement_attempts: usize,
    /// Enemies in the recycled pool
    pub enemy_count: usize,
    /// Start with the debug overlay visible
    pub debug: bool,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 70.0,
            egg_interval_ms: 500.0,
            hatch_interval_ms: 5000.0,
            max_eggs: 5,
            winning_score: 30,
            number_of_obstacles: 10,
            placement_attempts: 500,
            enemy_count: 3,
            debug: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        // Comparisons are written so NaN fails them
        if !(self.fps > 0.0) {
            return Err(SettingsError::Invalid {
                field: "fps",
                reason: "must be positive",
            });
        }
        if !(self.egg_interval_ms > 0.0) {
            return Err(SettingsError::Invalid {
                field: "egg_interval_ms",
                reason: "must be positive",
            });
        }
        if !(self.hatch_interval_ms > 0.0) {
            return Err(SettingsError::Invalid {
                field: "hatch_interval_ms",
                reason: "must be positive",
            });
        }
        if self.max_eggs == 0 {
            return Err(SettingsError::Invalid {
                field: "max_eggs",
                reason: "must be at least 1",
            });
        }
        if self.winning_score == 0 {
            return Err(SettingsError::Invalid {
                field: "winning_score",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Milliseconds between update/draw passes
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }
}
