//! Data-driven game balance
//!
//! Every number the simulation reads comes from here. Defaults match
//! `crate::consts`; overrides load from LocalStorage (web) or a JSON file
//! (native).

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen_width: f32,
    pub screen_height: f32,
    pub player_size: f32,
    /// Player center distance above the bottom edge
    pub player_bottom_offset: f32,
    pub player_speed: f32,
    pub object_size: f32,
    pub gravity: f32,
    pub spawn_base_ms: f64,
    pub spawn_floor_ms: f64,
    pub spawn_rate_ms_per_point: f64,
    pub good_chance: f32,
    pub good_reward: u32,
    pub dodge_reward: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            player_size: PLAYER_SIZE,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            player_speed: PLAYER_SPEED,
            object_size: OBJECT_SIZE,
            gravity: GRAVITY,
            spawn_base_ms: BASE_SPAWN_INTERVAL_MS,
            spawn_floor_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_rate_ms_per_point: SPAWN_INTERVAL_PER_POINT_MS,
            good_chance: GOOD_CHANCE,
            good_reward: GOOD_REWARD,
            dodge_reward: DODGE_REWARD,
        }
    }
}

/// Why a tuning set was rejected
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {}", e),
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// LocalStorage key for balance overrides
    pub const STORAGE_KEY: &'static str = "fall_dodge_tuning";

    /// Spawn interval for a given score: linear decrease clamped at the floor
    pub fn spawn_interval_ms(&self, score: u32) -> f64 {
        (self.spawn_base_ms - score as f64 * self.spawn_rate_ms_per_point)
            .max(self.spawn_floor_ms)
    }

    /// Leftmost and rightmost legal player centers
    pub fn player_bounds(&self) -> (f32, f32) {
        let half = self.player_size / 2.0;
        (half, self.screen_width - half)
    }

    /// Fixed vertical center of the player sprite
    pub fn player_y(&self) -> f32 {
        self.screen_height - self.player_bottom_offset
    }

    /// Objects whose center passes this line have left the playfield
    pub fn bottom_boundary(&self) -> f32 {
        self.screen_height + self.object_size
    }

    /// Check every field for values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_size", self.player_size),
            ("player_speed", self.player_speed),
            ("object_size", self.object_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        if self.player_size > self.screen_width {
            return Err(TuningError::Invalid {
                field: "player_size",
                reason: "player wider than the screen",
            });
        }
        if self.object_size * 2.0 > self.screen_width {
            return Err(TuningError::Invalid {
                field: "object_size",
                reason: "no room to spawn objects inside the margins",
            });
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(TuningError::Invalid {
                field: "gravity",
                reason: "must be zero or positive",
            });
        }
        if !(self.spawn_floor_ms > 0.0) {
            return Err(TuningError::Invalid {
                field: "spawn_floor_ms",
                reason: "must be positive",
            });
        }
        if self.spawn_floor_ms > self.spawn_base_ms {
            return Err(TuningError::Invalid {
                field: "spawn_floor_ms",
                reason: "floor above the base interval",
            });
        }
        if !(self.spawn_rate_ms_per_point >= 0.0) {
            return Err(TuningError::Invalid {
                field: "spawn_rate_ms_per_point",
                reason: "interval must not grow with score",
            });
        }
        if !(0.0..=1.0).contains(&self.good_chance) {
            return Err(TuningError::Invalid {
                field: "good_chance",
                reason: "must be a probability in [0, 1]",
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning document (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load overrides from LocalStorage, falling back to defaults
    pub fn load() -> Self {
        match crate::platform::storage::load_json::<Tuning>(Self::STORAGE_KEY) {
            Some(tuning) => match tuning.validate() {
                Ok(()) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring stored tuning: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
