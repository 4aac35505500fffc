//! Collision detection and response for a single time step
//!
//! Balls collide as squares. When a ball has crossed a boundary, it is walked
//! back along its direction of travel until it sits tangent to the boundary,
//! then the velocity component across the boundary is reflected. Candidates
//! are tested in a fixed order and the first match wins, so ambiguous corner
//! hits always resolve to the earliest tested side.

use glam::DVec2;
use serde::Serialize;

use super::approx::{greater_or_close, greater_than, is_zero, less_or_close, less_than};
use super::bounds::{Bounds, boxes_overlap};
use super::state::{Ball, Brick};

/// Play-field boundary a ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Wall {
    Left,
    Right,
    Top,
}

/// Result of testing a ball against the play-field boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallOutcome {
    /// Ball is inside the field
    Clear,
    /// Ball crossed a wall and was reflected
    Bounced(Wall),
    /// Ball dropped below the bottom edge and leaves play
    OutOfPlay,
}

/// Side of a brick that was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrickEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl BrickEdge {
    /// Test order for brick edges
    pub const ORDER: [BrickEdge; 4] = [
        BrickEdge::Left,
        BrickEdge::Right,
        BrickEdge::Top,
        BrickEdge::Bottom,
    ];

    /// Index of the axis this edge is perpendicular to (0 = x, 1 = y)
    #[inline]
    fn axis(self) -> usize {
        match self {
            BrickEdge::Left | BrickEdge::Right => 0,
            BrickEdge::Top | BrickEdge::Bottom => 1,
        }
    }

    /// Side of the edge line the ball is pushed to (-1 = toward smaller coordinates)
    #[inline]
    fn side(self) -> f64 {
        match self {
            BrickEdge::Left | BrickEdge::Top => -1.0,
            BrickEdge::Right | BrickEdge::Bottom => 1.0,
        }
    }

    /// Coordinate of the edge line along its axis
    fn line(self, brick: &Brick) -> f64 {
        match self {
            BrickEdge::Left => brick.left(),
            BrickEdge::Right => brick.right(),
            BrickEdge::Top => brick.top(),
            BrickEdge::Bottom => brick.bottom(),
        }
    }

    /// Extent of the edge along the other axis
    fn span(self, brick: &Brick) -> (f64, f64) {
        match self {
            BrickEdge::Left | BrickEdge::Right => (brick.top(), brick.bottom()),
            BrickEdge::Top | BrickEdge::Bottom => (brick.left(), brick.right()),
        }
    }
}

/// Result of testing a ball against one brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickOutcome {
    /// Bounding boxes do not overlap
    Miss,
    /// Ball bounced off `edge`; `destroyed` when that was the brick's last hit
    Hit { edge: BrickEdge, destroyed: bool },
    /// Boxes overlap but the ball's path crosses no edge (corner tunneling)
    Unresolved,
}

/// Distance to walk back along a unit direction to undo `overshoot` on one axis
///
/// A zero direction component cannot have produced the overshoot, so the
/// correction degenerates to a clamp on that axis.
#[inline]
fn walk_back(overshoot: f64, dir_component: f64) -> f64 {
    if is_zero(dir_component) {
        0.0
    } else {
        overshoot / dir_component
    }
}

/// Unit direction of travel, or zero for a ball at rest
#[inline]
fn direction(ball: &Ball) -> DVec2 {
    ball.vel.try_normalize().unwrap_or(DVec2::ZERO)
}

/// Check a ball against a field of `field.x` by `field.y` with origin top-left
///
/// Only one wall is handled per call, tested left, right, then top. A ball
/// crossing two walls in one step is corrected for the first one only.
pub fn resolve_wall(ball: &mut Ball, field: DVec2) -> WallOutcome {
    if greater_than(ball.bottom(), field.y) {
        return WallOutcome::OutOfPlay;
    }

    let dir = direction(ball);
    let pos = ball.pos();
    let half = ball.half_size();

    if less_than(ball.left(), 0.0) {
        let a = walk_back(pos.x - half.x, dir.x);
        ball.set_pos(DVec2::new(half.x, pos.y - a * dir.y));
        ball.vel.x = -ball.vel.x;
        WallOutcome::Bounced(Wall::Left)
    } else if greater_than(ball.right(), field.x) {
        let a = walk_back(pos.x - field.x + half.x, dir.x);
        ball.set_pos(DVec2::new(field.x - half.x, pos.y - a * dir.y));
        ball.vel.x = -ball.vel.x;
        WallOutcome::Bounced(Wall::Right)
    } else if less_than(ball.top(), 0.0) {
        let a = walk_back(pos.y - half.y, dir.y);
        ball.set_pos(DVec2::new(pos.x - a * dir.x, half.y));
        ball.vel.y = -ball.vel.y;
        WallOutcome::Bounced(Wall::Top)
    } else {
        WallOutcome::Clear
    }
}

/// Check a ball against one brick, bouncing it and damaging the brick on a hit
///
/// Edges are tested left, right, top, bottom. An edge matches when the ball's
/// center, projected backward along its direction onto the edge line, lands
/// within the edge and at most half a ball width behind the line.
pub fn resolve_brick(ball: &mut Ball, brick: &mut Brick) -> BrickOutcome {
    debug_assert!(
        !brick.is_destroyed(),
        "brick {} still live with no hits remaining",
        brick.id
    );
    if !boxes_overlap(&*ball, &*brick) {
        return BrickOutcome::Miss;
    }

    let dir = direction(ball);
    let pos = ball.pos();
    let half = ball.half_size();
    // Half a ball width, on either axis
    let tolerance = -half.x;

    for edge in BrickEdge::ORDER {
        let axis = edge.axis();
        let other = 1 - axis;
        if is_zero(dir[axis]) {
            // Moving parallel to this edge, it cannot have been crossed
            continue;
        }

        let line = edge.line(brick);
        let (lo, hi) = edge.span(brick);
        let travel = (pos[axis] - line) / dir[axis];
        let crossing = pos[other] - travel * dir[other];
        if !(greater_or_close(travel, tolerance)
            && less_or_close(lo, crossing)
            && less_or_close(crossing, hi))
        {
            continue;
        }

        let offset = edge.side() * half[axis];
        let a = (pos[axis] - line - offset) / dir[axis];
        let mut corrected = pos;
        corrected[axis] = line + offset;
        corrected[other] = pos[other] - a * dir[other];
        ball.set_pos(corrected);
        ball.vel[axis] = -ball.vel[axis];

        let destroyed = brick.hit();
        return BrickOutcome::Hit { edge, destroyed };
    }

    BrickOutcome::Unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::approx::close_enough;
    use crate::square;
    use proptest::prelude::*;

    const FIELD: DVec2 = DVec2::new(300.0, 600.0);

    fn ball(x: f64, y: f64, vx: f64, vy: f64) -> Ball {
        Ball::new(1, DVec2::new(x, y), DVec2::new(vx, vy), 10.0)
    }

    fn brick(x: f64, y: f64, hits: u32) -> Brick {
        Brick::new(2, DVec2::new(x, y), square(30.0), hits)
    }

    #[test]
    fn test_ball_inside_field_is_clear() {
        let mut b = ball(150.0, 300.0, 100.0, -100.0);
        assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::Clear);
        assert_eq!(b.pos(), DVec2::new(150.0, 300.0));
    }

    #[test]
    fn test_left_wall_back_projection() {
        // Moving left and up at 45 degrees, 3 units past the wall
        let mut b = ball(2.0, 300.0, -100.0, -100.0);
        assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::Bounced(Wall::Left));
        assert!(close_enough(b.pos().x, 5.0));
        // Walked back 3 units along x, so 3 units back down along y
        assert!(close_enough(b.pos().y, 303.0));
        assert_eq!(b.vel, DVec2::new(100.0, -100.0));
    }

    #[test]
    fn test_right_wall_back_projection() {
        let mut b = ball(298.0, 300.0, 200.0, 0.0);
        assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::Bounced(Wall::Right));
        assert!(close_enough(b.pos().x, 295.0));
        assert!(close_enough(b.pos().y, 300.0));
        assert_eq!(b.vel, DVec2::new(-200.0, 0.0));
    }

    #[test]
    fn test_top_wall_back_projection() {
        let mut b = ball(100.0, 1.0, 0.0, -400.0);
        assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::Bounced(Wall::Top));
        assert!(close_enough(b.pos().y, 5.0));
        assert!(close_enough(b.pos().x, 100.0));
        assert_eq!(b.vel, DVec2::new(0.0, 400.0));
    }

    #[test]
    fn test_left_wins_over_top_in_corner() {
        let mut b = ball(1.0, 1.0, -100.0, -100.0);
        assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::Bounced(Wall::Left));
        assert!(b.vel.y < 0.0);
    }

    #[test]
    fn test_bottom_exit_is_out_of_play() {
        let mut b = ball(150.0, 596.0, 0.0, 400.0);
        assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::OutOfPlay);
        // No bounce applied
        assert_eq!(b.vel, DVec2::new(0.0, 400.0));
    }

    #[test]
    fn test_stationary_ball_outside_is_clamped() {
        let mut b = ball(-3.0, 300.0, 0.0, 0.0);
        assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::Bounced(Wall::Left));
        assert_eq!(b.pos(), DVec2::new(5.0, 300.0));
        assert!(b.pos().is_finite());
    }

    #[test]
    fn test_brick_miss_without_overlap() {
        let mut b = ball(50.0, 50.0, 100.0, 0.0);
        let mut k = brick(100.0, 100.0, 1);
        assert_eq!(resolve_brick(&mut b, &mut k), BrickOutcome::Miss);
        assert_eq!(k.hits_remaining(), 1);
    }

    #[test]
    fn test_brick_left_edge_hit() {
        // Brick spans x 85..115; ball right edge at 87
        let mut b = ball(82.0, 100.0, 400.0, 0.0);
        let mut k = brick(100.0, 100.0, 2);
        assert_eq!(
            resolve_brick(&mut b, &mut k),
            BrickOutcome::Hit {
                edge: BrickEdge::Left,
                destroyed: false
            }
        );
        assert_eq!(k.hits_remaining(), 1);
        assert!(close_enough(b.pos().x, 80.0));
        assert_eq!(b.vel, DVec2::new(-400.0, 0.0));
    }

    #[test]
    fn test_brick_right_edge_hit() {
        let mut b = ball(118.0, 95.0, -300.0, 0.0);
        let mut k = brick(100.0, 100.0, 3);
        assert_eq!(
            resolve_brick(&mut b, &mut k),
            BrickOutcome::Hit {
                edge: BrickEdge::Right,
                destroyed: false
            }
        );
        assert!(close_enough(b.pos().x, 120.0));
        assert_eq!(b.vel.x, 300.0);
    }

    #[test]
    fn test_brick_top_edge_lethal_hit() {
        // Dead center from above
        let mut b = ball(100.0, 82.0, 0.0, 400.0);
        let mut k = brick(100.0, 100.0, 1);
        assert_eq!(
            resolve_brick(&mut b, &mut k),
            BrickOutcome::Hit {
                edge: BrickEdge::Top,
                destroyed: true
            }
        );
        assert!(k.is_destroyed());
        assert!(close_enough(b.pos().y, 80.0));
        assert_eq!(b.vel, DVec2::new(0.0, -400.0));
    }

    #[test]
    fn test_brick_bottom_edge_hit() {
        let mut b = ball(100.0, 118.0, 0.0, -400.0);
        let mut k = brick(100.0, 100.0, 2);
        assert_eq!(
            resolve_brick(&mut b, &mut k),
            BrickOutcome::Hit {
                edge: BrickEdge::Bottom,
                destroyed: false
            }
        );
        assert!(close_enough(b.pos().y, 120.0));
        assert_eq!(b.vel, DVec2::new(0.0, 400.0));
    }

    #[test]
    fn test_brick_diagonal_hit_walks_back_along_path() {
        // Entering the left edge at 45 degrees, 2 units past tangency
        let mut b = ball(82.0, 100.0, 100.0, 100.0);
        let mut k = brick(100.0, 100.0, 5);
        let outcome = resolve_brick(&mut b, &mut k);
        assert_eq!(
            outcome,
            BrickOutcome::Hit {
                edge: BrickEdge::Left,
                destroyed: false
            }
        );
        assert!(close_enough(b.pos().x, 80.0));
        assert!(close_enough(b.pos().y, 98.0));
        assert_eq!(b.vel, DVec2::new(-100.0, 100.0));
    }

    #[test]
    fn test_brick_corner_hit_prefers_left_edge() {
        // Path runs straight through the top-left corner: left and top both match
        let mut b = ball(84.0, 84.0, 100.0, 100.0);
        let mut k = brick(100.0, 100.0, 2);
        assert_eq!(
            resolve_brick(&mut b, &mut k),
            BrickOutcome::Hit {
                edge: BrickEdge::Left,
                destroyed: false
            }
        );
        assert!(close_enough(b.pos().x, 80.0));
        assert!(close_enough(b.pos().y, 80.0));
        assert_eq!(b.vel, DVec2::new(-100.0, 100.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no hits remaining")]
    fn test_dead_brick_trips_debug_check() {
        let mut b = ball(100.0, 82.0, 0.0, 400.0);
        let mut k = brick(100.0, 100.0, 1);
        k.hit();
        resolve_brick(&mut b, &mut k);
    }

    #[test]
    fn test_brick_corner_tunnel_is_unresolved() {
        // Overlapping the top-left corner while moving up and to the right:
        // the path behind the ball never crosses an edge
        let mut b = ball(82.0, 82.0, 100.0, -100.0);
        let mut k = brick(100.0, 100.0, 1);
        assert_eq!(resolve_brick(&mut b, &mut k), BrickOutcome::Unresolved);
        assert_eq!(k.hits_remaining(), 1);
        assert_eq!(b.pos(), DVec2::new(82.0, 82.0));
    }

    proptest! {
        #[test]
        fn prop_left_wall_reflection(
            overshoot in 0.01f64..4.0,
            vx in -800.0f64..-1.0,
            vy in -800.0f64..800.0,
        ) {
            let mut b = ball(5.0 - overshoot, 300.0, vx, vy);
            prop_assert_eq!(resolve_wall(&mut b, FIELD), WallOutcome::Bounced(Wall::Left));
            prop_assert!(close_enough(b.pos().x, 5.0));
            prop_assert_eq!(b.vel.x, -vx);
            prop_assert_eq!(b.vel.y, vy);
        }
    }
}
