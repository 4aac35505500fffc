//! Game state and core simulation types
//!
//! The state owns every ball and brick. Outside code reads the collections
//! through accessors; all mutation goes through `tick`, `launch` and the
//! [`Engine`](super::Engine) facade.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bounds::{Bounds, Corners};
use crate::settings::Settings;
use crate::square;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GamePhase {
    /// Viewport not known yet, nothing set up
    #[default]
    Idle,
    /// Waiting for the player to pick an aim point
    PlacingTarget,
    /// Aim point being dragged (reserved, never entered by the tick)
    MovingTarget,
    /// Wave in progress, balls leave the launch point on a cadence
    ShootingBalls,
    /// Whole wave launched, waiting for the field to clear
    WaitingForBallsToFinish,
}

/// A ball entity
///
/// Collides as a square of side `diameter`. Position and size are private so
/// the cached corners can never go stale.
#[derive(Debug, Clone, Serialize)]
pub struct Ball {
    pub id: u32,
    pos: DVec2,
    /// Velocity in units per second
    pub vel: DVec2,
    size: DVec2,
    corners: Corners,
}

impl Ball {
    pub fn new(id: u32, pos: DVec2, vel: DVec2, diameter: f64) -> Self {
        let size = square(diameter);
        Self {
            id,
            pos,
            vel,
            size,
            corners: Corners::from_center(pos, size),
        }
    }

    #[inline]
    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: DVec2) {
        self.pos = pos;
        self.corners = Corners::from_center(self.pos, self.size);
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.size
    }

    pub fn set_size(&mut self, size: DVec2) {
        self.size = size;
        self.corners = Corners::from_center(self.pos, self.size);
    }

    #[inline]
    pub fn half_size(&self) -> DVec2 {
        self.size / 2.0
    }

    /// Move the ball along its velocity for `dt` seconds
    pub fn integrate(&mut self, dt: f64) {
        self.set_pos(self.pos + self.vel * dt);
    }
}

impl Bounds for Ball {
    fn corners(&self) -> &Corners {
        &self.corners
    }
}

/// A brick entity
#[derive(Debug, Clone, Serialize)]
pub struct Brick {
    pub id: u32,
    pos: DVec2,
    size: DVec2,
    hits_remaining: u32,
    corners: Corners,
}

impl Brick {
    /// A brick takes at least one hit to destroy
    pub fn new(id: u32, pos: DVec2, size: DVec2, hits: u32) -> Self {
        Self {
            id,
            pos,
            size,
            hits_remaining: hits.max(1),
            corners: Corners::from_center(pos, size),
        }
    }

    #[inline]
    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: DVec2) {
        self.pos = pos;
        self.corners = Corners::from_center(self.pos, self.size);
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.size
    }

    #[inline]
    pub fn hits_remaining(&self) -> u32 {
        self.hits_remaining
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.hits_remaining == 0
    }

    /// Register one hit. Returns true if that hit destroyed the brick.
    pub fn hit(&mut self) -> bool {
        self.hits_remaining = self.hits_remaining.saturating_sub(1);
        self.hits_remaining == 0
    }
}

impl Bounds for Brick {
    fn corners(&self) -> &Corners {
        &self.corners
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    BallFired { ball_id: u32 },
    BallLost { ball_id: u32 },
    WallBounce { ball_id: u32, wall: super::collision::Wall },
    BrickHit { ball_id: u32, brick_id: u32, hits_remaining: u32 },
    BrickDestroyed { ball_id: u32, brick_id: u32 },
    /// Boxes overlapped but no edge matched the ball's path
    UnresolvedOverlap { ball_id: u32, brick_id: u32 },
    LevelStarted { level: u32, new_bricks: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Tuning in effect for this run
    pub settings: Settings,
    /// Brick placement RNG
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    /// Play-field size, once known
    pub(crate) viewport: Option<DVec2>,
    /// Brick columns that fit the viewport
    pub(crate) columns: u32,
    pub(crate) shooting_point: DVec2,
    /// Last aim point handed to `fire`
    pub(crate) target_point: Option<DVec2>,
    /// Unit direction for the current wave
    pub(crate) shooting_direction: DVec2,
    /// Current level (1-based once the game starts)
    pub(crate) level: u32,
    pub(crate) shots_fired: u32,
    /// Cadence countdown until the next ball (seconds)
    pub(crate) shot_timer: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Active balls (sorted by id for determinism)
    pub(crate) balls: Vec<Ball>,
    /// Active bricks (sorted by id for determinism)
    pub(crate) bricks: Vec<Brick>,
    /// Events recorded since the last drain. Nothing clears this except
    /// [`GameState::drain_events`]; [`Engine`](super::Engine) drains it after
    /// every call.
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new state. Uses the configured seed, or OS entropy without one.
    pub fn new(settings: Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_os_rng(),
        };
        Self::with_rng(settings, rng)
    }

    /// Create a new state with an explicit brick placement RNG
    pub fn with_rng(settings: Settings, rng: Pcg32) -> Self {
        Self {
            settings,
            rng,
            phase: GamePhase::Idle,
            viewport: None,
            columns: 0,
            shooting_point: DVec2::ZERO,
            target_point: None,
            shooting_direction: DVec2::NEG_Y,
            level: 0,
            shots_fired: 0,
            shot_timer: 0.0,
            time_ticks: 0,
            balls: Vec::new(),
            bricks: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Change phase, recording the transition
    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        if self.phase != to {
            self.events.push(GameEvent::PhaseChanged {
                from: self.phase,
                to,
            });
            self.phase = to;
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn viewport(&self) -> Option<DVec2> {
        self.viewport
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn shooting_point(&self) -> DVec2 {
        self.shooting_point
    }

    pub fn target_point(&self) -> Option<DVec2> {
        self.target_point
    }

    pub fn shooting_direction(&self) -> DVec2 {
        self.shooting_direction
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Number of balls in the current level's wave
    pub fn balls_for_level(&self) -> u32 {
        self.level.max(1) * self.settings.balls_per_level.max(1)
    }

    /// Take all events recorded so far
    ///
    /// Hosts that drive [`tick`](super::tick) directly must call this once
    /// per frame; events accumulate until drained.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Set (or update) the play-field size
    ///
    /// The first call starts the game: level 1 is set up and the phase moves
    /// from `Idle` to `PlacingTarget`. Later calls only refit the field.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        let size = DVec2::new(width, height);
        self.viewport = Some(size);
        let brick_edge = self.settings.brick_size;
        self.columns = if brick_edge > 0.0 {
            (width / brick_edge).floor().max(0.0) as u32
        } else {
            0
        };
        self.shooting_point = DVec2::new(width / 2.0, height - self.settings.launch_offset);

        if self.phase == GamePhase::Idle {
            log::info!(
                "Starting game: viewport {}x{}, {} columns",
                width,
                height,
                self.columns
            );
            self.balls.clear();
            self.bricks.clear();
            self.level = 0;
            super::tick::advance_level(self);
        }
    }

    /// Spawn a ball at the launch point moving along the wave direction
    pub(crate) fn spawn_ball(&mut self) -> u32 {
        let id = self.next_entity_id();
        let vel = self.shooting_direction * self.settings.ball_speed;
        let ball = Ball::new(id, self.shooting_point, vel, self.settings.ball_diameter);
        self.balls.push(ball);
        self.events.push(GameEvent::BallFired { ball_id: id });
        id
    }

    /// Add a ball directly (for scripted scenarios and tests)
    pub fn insert_ball(&mut self, pos: DVec2, vel: DVec2) -> u32 {
        let id = self.next_entity_id();
        self.balls
            .push(Ball::new(id, pos, vel, self.settings.ball_diameter));
        id
    }

    /// Add a brick directly (for scripted scenarios and tests)
    pub fn insert_brick(&mut self, pos: DVec2, hits: u32) -> u32 {
        let id = self.next_entity_id();
        self.bricks
            .push(Brick::new(id, pos, square(self.settings.brick_size), hits));
        id
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.bricks.sort_by_key(|b| b.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seeded() -> GameState {
        GameState::with_rng(Settings::default(), Pcg32::seed_from_u64(7))
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = seeded();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert!(state.balls().is_empty());
        assert!(state.bricks().is_empty());
        assert_eq!(state.level(), 0);
    }

    #[test]
    fn test_first_viewport_starts_level_one() {
        let mut state = seeded();
        state.set_viewport_size(300.0, 600.0);
        assert_eq!(state.phase(), GamePhase::PlacingTarget);
        assert_eq!(state.level(), 1);
        assert_eq!(state.columns(), 10);
        assert_eq!(state.shooting_point(), DVec2::new(150.0, 550.0));
        assert!(state.bricks().iter().all(|b| b.hits_remaining() == 1));
    }

    #[test]
    fn test_second_viewport_does_not_restart() {
        let mut state = seeded();
        state.set_viewport_size(300.0, 600.0);
        let bricks = state.bricks().len();
        state.set_viewport_size(360.0, 700.0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.bricks().len(), bricks);
        assert_eq!(state.columns(), 12);
        assert_eq!(state.shooting_point(), DVec2::new(180.0, 650.0));
    }

    #[test]
    fn test_brick_hit_countdown() {
        let mut brick = Brick::new(1, DVec2::new(15.0, 15.0), square(30.0), 2);
        assert!(!brick.hit());
        assert_eq!(brick.hits_remaining(), 1);
        assert!(brick.hit());
        assert!(brick.is_destroyed());
    }

    #[test]
    fn test_brick_needs_at_least_one_hit() {
        let brick = Brick::new(1, DVec2::ZERO, square(30.0), 0);
        assert_eq!(brick.hits_remaining(), 1);
    }

    #[test]
    fn test_balls_for_level_scales() {
        let mut state = seeded();
        state.settings.balls_per_level = 2;
        state.level = 3;
        assert_eq!(state.balls_for_level(), 6);
    }

    proptest! {
        #[test]
        fn prop_ball_corners_follow_writes(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            w in 0.1f64..100.0,
            h in 0.1f64..100.0,
        ) {
            let mut ball = Ball::new(1, DVec2::ZERO, DVec2::X, 10.0);
            ball.set_pos(DVec2::new(x, y));
            ball.set_size(DVec2::new(w, h));
            prop_assert_eq!(ball.corners().top_left, DVec2::new(x - w / 2.0, y - h / 2.0));
            prop_assert_eq!(ball.corners().bottom_right, DVec2::new(x + w / 2.0, y + h / 2.0));

            ball.set_pos(DVec2::new(y, x));
            prop_assert_eq!(ball.left(), y - w / 2.0);
            prop_assert_eq!(ball.top(), x - h / 2.0);
            prop_assert_eq!(ball.right(), y + w / 2.0);
            prop_assert_eq!(ball.bottom(), x + h / 2.0);
        }

        #[test]
        fn prop_brick_corners_follow_moves(x in -1000.0f64..1000.0, y in -1000.0f64..1000.0) {
            let mut brick = Brick::new(1, DVec2::ZERO, square(30.0), 1);
            brick.set_pos(DVec2::new(x, y));
            prop_assert_eq!(brick.corners().top_right, DVec2::new(x + 15.0, y - 15.0));
            prop_assert_eq!(brick.corners().bottom_left, DVec2::new(x - 15.0, y + 15.0));
        }
    }
}
