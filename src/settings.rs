//! Engine tuning
//!
//! Every gameplay constant can be overridden from a JSON file. Missing keys
//! fall back to the defaults in [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Balls ===
    /// Ball edge length (balls collide as squares)
    pub ball_diameter: f64,
    /// Launch speed in units per second
    pub ball_speed: f64,
    /// Delay between balls of one wave (seconds)
    pub shot_interval: f64,
    /// Balls fired per level number
    pub balls_per_level: u32,
    /// Launch point height above the bottom edge
    pub launch_offset: f64,

    // === Bricks ===
    pub brick_size: f64,
    /// Chance (0-100) that a column receives a brick in a new row
    pub brick_spawn_percent: u32,

    // === Timing ===
    /// Longest step one tick may integrate (seconds)
    pub max_frame_dt: f64,
    /// FPS sampling window (seconds)
    pub fps_window: f64,

    /// Brick placement seed; OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_diameter: BALL_DIAMETER,
            ball_speed: BALL_SPEED,
            shot_interval: SHOT_INTERVAL,
            balls_per_level: BALLS_PER_LEVEL,
            launch_offset: LAUNCH_OFFSET,

            brick_size: BRICK_SIZE,
            brick_spawn_percent: BRICK_SPAWN_PERCENT,

            max_frame_dt: MAX_FRAME_DT,
            fps_window: FPS_WINDOW,

            seed: None,
        }
    }
}

/// Why settings could not be loaded
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// A field holds a value the engine cannot run with
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "could not read settings: {}", e),
            SettingsError::Parse(e) => write!(f, "could not parse settings: {}", e),
            SettingsError::Invalid { field, reason } => {
                write!(f, "invalid setting `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("ball_diameter", self.ball_diameter),
            ("ball_speed", self.ball_speed),
            ("shot_interval", self.shot_interval),
            ("brick_size", self.brick_size),
            ("max_frame_dt", self.max_frame_dt),
            ("fps_window", self.fps_window),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        // A launch point closer to the bottom than half a ball would spawn
        // every ball already out of play
        if !self.launch_offset.is_finite() || self.launch_offset < self.ball_diameter / 2.0 {
            return Err(SettingsError::Invalid {
                field: "launch_offset",
                reason: "must be at least half the ball diameter",
            });
        }
        if self.balls_per_level == 0 {
            return Err(SettingsError::Invalid {
                field: "balls_per_level",
                reason: "must be at least 1",
            });
        }
        if self.brick_spawn_percent > 100 {
            return Err(SettingsError::Invalid {
                field: "brick_spawn_percent",
                reason: "must be between 0 and 100",
            });
        }
        Ok(())
    }
}
