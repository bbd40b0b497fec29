//! Game configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty or partial file is valid and a
//! missing file simply yields [`GameConfig::default`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;
use crate::render::SpriteKey;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gameplay: Tuning,
    pub display: DisplayConfig,
    pub assets: AssetConfig,
    pub log: LogConfig,
}

/// Timers and thresholds the simulation reads every tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Initial meteor interval.
    pub meteor_spawn_delay_ms: f32,
    /// The meteor interval never drops below this.
    pub meteor_spawn_floor_ms: f32,
    /// Interval reduction applied after each meteor.
    pub meteor_spawn_step_ms: f32,
    pub skull_spawn_delay_ms: f32,
    /// Skulls only appear once the score reaches this.
    pub skull_score_gate: u32,
    pub challenge_interval_ms: f32,
    pub challenge_time_limit_ms: f32,
    pub power_up_duration_ms: f32,
    pub challenge_feedback_ms: f32,
    pub bomb_flash_ms: f32,
    /// Upper bound on a single tick's delta.
    pub max_frame_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            meteor_spawn_delay_ms: METEOR_SPAWN_DELAY_MS,
            meteor_spawn_floor_ms: METEOR_SPAWN_FLOOR_MS,
            meteor_spawn_step_ms: METEOR_SPAWN_STEP_MS,
            skull_spawn_delay_ms: SKULL_SPAWN_DELAY_MS,
            skull_score_gate: SKULL_SCORE_GATE,
            challenge_interval_ms: CHALLENGE_INTERVAL_MS,
            challenge_time_limit_ms: CHALLENGE_TIME_LIMIT_MS,
            power_up_duration_ms: POWER_UP_DURATION_MS,
            challenge_feedback_ms: CHALLENGE_FEEDBACK_MS,
            bomb_flash_ms: BOMB_FLASH_MS,
            max_frame_ms: MAX_FRAME_MS,
        }
    }
}

/// Terminal host settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frame period of the host loop.
    pub frame_ms: u64,
    /// Playfield units covered by one terminal column.
    pub cell_width: f32,
    /// Playfield units covered by one terminal row.
    pub cell_height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { frame_ms: 16, cell_width: 8.0, cell_height: 16.0 }
    }
}

/// Sprites to treat as not yet loaded (`missing`) or failed (`broken`);
/// both force the procedural fallback.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub missing: Vec<SpriteKey>,
    pub broken: Vec<SpriteKey>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), file: PathBuf::from("pixel_expedition.log") }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load `path` when given and present, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }
}
