//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame time supplied by the caller, clamped per tick
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod approx;
pub mod bounds;
pub mod collision;
pub mod engine;
pub mod fps;
pub mod launch;
pub mod state;
pub mod tick;

pub use bounds::{Bounds, Corners, boxes_overlap};
pub use collision::{BrickEdge, BrickOutcome, Wall, WallOutcome, resolve_brick, resolve_wall};
pub use engine::Engine;
pub use fps::FpsCounter;
pub use launch::{begin_aim, fire};
pub use state::{Ball, Brick, GameEvent, GamePhase, GameState};
pub use tick::{advance_level, populate_top_row, tick};
