//! Game tuning
//!
//! Defaults reproduce the arcade balance. Hosts may override any field from
//! JSON; every config is validated before a session is built.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_FRAME_DT;

/// Rejected configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("spawn interval must be positive and finite, got {0}")]
    SpawnInterval(f32),
    #[error("enemy speed bounds must be positive, got min {min} max {max}")]
    EnemySpeed { min: f32, max: f32 },
    #[error("reinforced chance must lie in [0, 1], got {0}")]
    ReinforcedChance(f32),
    #[error("arrow speed must be positive, got {0}")]
    ArrowSpeed(f32),
    #[error("initial time must be positive, got {0}")]
    InitialTime(f32),
    #[error("bonus seconds must not be negative, got {0}")]
    BonusSeconds(f32),
    #[error("kills per bonus must be at least 1")]
    KillsPerBonus,
    #[error("max frame delta must be positive, got {0}")]
    MaxFrameDt(f32),
    #[error("playfield must be positive, got {width}x{height}")]
    Playfield { width: f32, height: f32 },
    #[error("invalid config json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width in game units
    pub width: f32,
    /// Playfield height in game units
    pub height: f32,
    /// Countdown at the start of a run (seconds)
    pub initial_time: f32,
    /// Seconds between timed spawns
    pub spawn_interval: f32,
    /// Enemy walking speed band (units/sec, magnitude)
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    /// Probability that a spawn is a reinforced (3 hp) enemy
    pub reinforced_chance: f64,
    /// Arrow speed (units/sec)
    pub arrow_speed: f32,
    /// Minimum live enemy count
    pub enemy_floor: usize,
    /// Kills needed for a time bonus
    pub kills_per_bonus: u32,
    /// Seconds added per bonus
    pub bonus_seconds: f32,
    /// Per-tick delta ceiling (seconds)
    pub max_frame_dt: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            initial_time: 100.0,
            spawn_interval: 0.9,
            enemy_speed_min: 40.0,
            enemy_speed_max: 80.0,
            reinforced_chance: 0.3,
            arrow_speed: 1200.0,
            enemy_floor: 5,
            kills_per_bonus: 2,
            bonus_seconds: 10.0,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Same tuning on a different playfield
    pub fn with_playfield(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spawn_interval.is_finite() && self.spawn_interval > 0.0) {
            return Err(ConfigError::SpawnInterval(self.spawn_interval));
        }
        let (min, max) = (self.enemy_speed_min, self.enemy_speed_max);
        if !(min > 0.0 && max > 0.0 && min <= max && max.is_finite()) {
            return Err(ConfigError::EnemySpeed { min, max });
        }
        if !(0.0..=1.0).contains(&self.reinforced_chance) {
            return Err(ConfigError::ReinforcedChance(self.reinforced_chance as f32));
        }
        if !(self.arrow_speed.is_finite() && self.arrow_speed > 0.0) {
            return Err(ConfigError::ArrowSpeed(self.arrow_speed));
        }
        if !(self.initial_time.is_finite() && self.initial_time > 0.0) {
            return Err(ConfigError::InitialTime(self.initial_time));
        }
        if !(self.bonus_seconds.is_finite() && self.bonus_seconds >= 0.0) {
            return Err(ConfigError::BonusSeconds(self.bonus_seconds));
        }
        if self.kills_per_bonus == 0 {
            return Err(ConfigError::KillsPerBonus);
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(ConfigError::MaxFrameDt(self.max_frame_dt));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Playfield {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
