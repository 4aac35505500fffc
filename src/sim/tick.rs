//! Simulation tick
//!
//! Advances the game by one frame: integrate balls, resolve collisions,
//! remove spent entities, then evaluate level and wave transitions.

use glam::DVec2;
use rand::Rng;

use super::approx::greater_than;
use super::collision::{BrickOutcome, WallOutcome, resolve_brick, resolve_wall};
use super::state::{Brick, GameEvent, GamePhase, GameState};
use crate::square;

/// Advance the game state by `dt` seconds
///
/// `dt` is clamped to the configured maximum frame step so a hitch cannot
/// teleport balls through bricks. Events are appended to the state's queue
/// and stay there until [`GameState::drain_events`] is called.
pub fn tick(state: &mut GameState, dt: f64) {
    let Some(field) = state.viewport else {
        return;
    };
    if state.phase == GamePhase::Idle {
        return;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, state.settings.max_frame_dt)
    } else {
        0.0
    };

    state.time_ticks += 1;

    step_balls(state, field, dt);

    // Destroyed bricks leave play on the tick that destroyed them
    state.bricks.retain(|b| !b.is_destroyed());
    debug_assert!(
        state.bricks.iter().all(|b| b.hits_remaining() > 0),
        "dead brick left in the live collection"
    );

    if state.phase == GamePhase::WaitingForBallsToFinish && state.balls.is_empty() {
        advance_level(state);
    }

    if state.phase == GamePhase::ShootingBalls {
        shoot_balls(state, dt);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Move every ball and resolve it against the walls, then the bricks
///
/// A ball is resolved against at most one object per step: a wall bounce
/// skips the brick pass, and the first brick hit ends it.
fn step_balls(state: &mut GameState, field: DVec2, dt: f64) {
    let mut lost = Vec::new();

    for ball in &mut state.balls {
        ball.integrate(dt);

        match resolve_wall(ball, field) {
            WallOutcome::OutOfPlay => {
                lost.push(ball.id);
                continue;
            }
            WallOutcome::Bounced(wall) => {
                state.events.push(GameEvent::WallBounce {
                    ball_id: ball.id,
                    wall,
                });
                continue;
            }
            WallOutcome::Clear => {}
        }

        // Bricks destroyed earlier this step are already out of play
        for brick in state.bricks.iter_mut().filter(|b| !b.is_destroyed()) {
            match resolve_brick(ball, brick) {
                BrickOutcome::Miss => {}
                BrickOutcome::Unresolved => {
                    log::trace!(
                        "Ball {} overlaps brick {} with no edge crossing",
                        ball.id,
                        brick.id
                    );
                    state.events.push(GameEvent::UnresolvedOverlap {
                        ball_id: ball.id,
                        brick_id: brick.id,
                    });
                }
                BrickOutcome::Hit { edge, destroyed } => {
                    log::debug!(
                        "Ball {} hit {:?} edge of brick {} ({} left)",
                        ball.id,
                        edge,
                        brick.id,
                        brick.hits_remaining()
                    );
                    state.events.push(GameEvent::BrickHit {
                        ball_id: ball.id,
                        brick_id: brick.id,
                        hits_remaining: brick.hits_remaining(),
                    });
                    if destroyed {
                        state.events.push(GameEvent::BrickDestroyed {
                            ball_id: ball.id,
                            brick_id: brick.id,
                        });
                    }
                    break;
                }
            }
        }
    }

    if !lost.is_empty() {
        state.balls.retain(|b| !lost.contains(&b.id));
        state
            .events
            .extend(lost.into_iter().map(|ball_id| GameEvent::BallLost { ball_id }));
    }
}

/// Count down the cadence timer and launch the next ball of the wave
fn shoot_balls(state: &mut GameState, dt: f64) {
    state.shot_timer -= dt;
    if greater_than(state.shot_timer, 0.0) {
        return;
    }

    state.spawn_ball();
    state.shots_fired += 1;

    if state.shots_fired >= state.balls_for_level() {
        log::debug!("Wave complete: {} balls fired", state.shots_fired);
        state.set_phase(GamePhase::WaitingForBallsToFinish);
    } else {
        state.shot_timer = state.settings.shot_interval;
    }
}

/// Start the next level
///
/// Surviving bricks drop one row, a fresh row is placed along the top with
/// the new level number as its hit count, and aiming resumes.
pub fn advance_level(state: &mut GameState) {
    state.level += 1;
    state.shots_fired = 0;

    let level = state.level;
    let edge = state.settings.brick_size;
    let drop = DVec2::new(0.0, edge);
    for brick in &mut state.bricks {
        brick.set_pos(brick.pos() + drop);
    }

    let positions = populate_top_row(
        &mut state.rng,
        state.columns,
        edge,
        state.settings.brick_spawn_percent,
    );
    let new_bricks = positions.len() as u32;
    for pos in positions {
        let id = state.next_entity_id();
        state.bricks.push(Brick::new(id, pos, square(edge), level));
    }

    log::info!(
        "Level {}: {} new bricks, {} on the field",
        level,
        new_bricks,
        state.bricks.len()
    );
    state.events.push(GameEvent::LevelStarted { level, new_bricks });
    state.set_phase(GamePhase::PlacingTarget);
}

/// Pick brick centers for a new top row
///
/// Each column independently receives a brick with `spawn_percent` chance.
pub fn populate_top_row<R: Rng + ?Sized>(
    rng: &mut R,
    columns: u32,
    brick_edge: f64,
    spawn_percent: u32,
) -> Vec<DVec2> {
    (0..columns)
        .filter(|_| rng.random_range(0..100) < spawn_percent)
        .map(|col| DVec2::new((col as f64 + 0.5) * brick_edge, brick_edge / 2.0))
        .collect()
}
