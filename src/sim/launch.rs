//! Launch controller: turns an aim point into a wave of balls

use glam::DVec2;

use super::state::{GamePhase, GameState};

/// Return to aiming. Only meaningful while a target is being placed or dragged.
///
/// Returns false (and changes nothing) in any other phase.
pub fn begin_aim(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::PlacingTarget | GamePhase::MovingTarget => {
            state.set_phase(GamePhase::PlacingTarget);
            true
        }
        phase => {
            log::debug!("Ignoring aim request in {:?}", phase);
            false
        }
    }
}

/// Fire a wave toward `aim_point`
///
/// Accepted only while placing a target. The unit direction is computed once
/// here and shared by every ball of the wave. An aim point on top of the
/// launch point has no direction and is rejected.
pub fn fire(state: &mut GameState, aim_point: DVec2) -> bool {
    if state.phase != GamePhase::PlacingTarget {
        log::debug!("Ignoring fire in {:?}", state.phase);
        return false;
    }

    let Some(direction) = (aim_point - state.shooting_point).try_normalize() else {
        log::warn!(
            "Rejecting shot: aim point {:?} has no direction from launch point",
            aim_point
        );
        return false;
    };

    state.target_point = Some(aim_point);
    state.shooting_direction = direction;
    state.shots_fired = 0;
    state.shot_timer = state.settings.shot_interval;
    state.set_phase(GamePhase::ShootingBalls);
    log::debug!(
        "Firing {} balls toward {:?}",
        state.balls_for_level(),
        direction
    );
    true
}
