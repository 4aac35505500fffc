//! Brick Volley - simulation engine for a ball-volley brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level progression)
//! - `settings`: Data-driven tuning loaded from JSON
//!
//! Rendering and input capture live outside this crate. A presentation layer
//! drives [`Engine`] with frame times and aim points, and reads the ball and
//! brick collections back out.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::Engine;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Frame length used by headless drivers (120 Hz)
    pub const SIM_DT: f64 = 1.0 / 120.0;
    /// Longest step a single tick may integrate (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Ball defaults
    pub const BALL_DIAMETER: f64 = 10.0;
    pub const BALL_SPEED: f64 = 400.0;
    /// Delay between two balls of the same wave (seconds)
    pub const SHOT_INTERVAL: f64 = 0.05;
    /// Distance from the bottom edge to the launch point
    pub const LAUNCH_OFFSET: f64 = 50.0;
    /// Balls fired per level number
    pub const BALLS_PER_LEVEL: u32 = 1;

    /// Brick defaults (bricks are square)
    pub const BRICK_SIZE: f64 = 30.0;
    /// Chance (percent) that a column gets a brick in a new row
    pub const BRICK_SPAWN_PERCENT: u32 = 30;

    /// Window over which ticks are counted for the FPS readout (seconds)
    pub const FPS_WINDOW: f64 = 1.0;
}

/// Build a size vector for a square of the given edge length
#[inline]
pub fn square(edge: f64) -> DVec2 {
    DVec2::splat(edge)
}
