//! Edge reflection and the floor decision
//!
//! Reflection only forces the sign of one velocity component. Positions are
//! never pushed back inside the bounds, so a fast ball can overshoot an edge
//! for a frame before it turns around.

use super::state::{Ball, Bat, Bounds, Edge, StepEvent};
use crate::tuning::HitWindow;

/// What the bottom edge does to a ball that crosses it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorRule {
    /// The floor is a wall
    Reflect,
    /// Only the paddle keeps the ball in play
    Catch,
}

/// Outcome of checking the bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorContact {
    /// Ball is above the floor
    Clear,
    /// Floor reflected the ball (`FloorRule::Reflect`)
    Bounced,
    /// Paddle caught the ball
    Caught,
    /// Nothing caught the ball; the session ends
    Lost,
}

/// Force `vel` negative, reporting whether it was non-negative before
#[inline]
fn force_negative(vel: &mut f32) -> bool {
    let flipped = *vel > 0.0;
    *vel = -vel.abs();
    flipped
}

/// Force `vel` positive, reporting whether it was non-positive before
#[inline]
fn force_positive(vel: &mut f32) -> bool {
    let flipped = *vel < 0.0;
    *vel = vel.abs();
    flipped
}

/// Point the ball away from the left, right and top edges it overlaps.
///
/// Each breached edge is checked independently. An event is pushed only when
/// the sign actually changes, so a ball lingering past an edge reports once.
pub fn reflect_off_walls(ball: &mut Ball, bounds: &Bounds, events: &mut Vec<StepEvent>) {
    if ball.right() > bounds.width && force_negative(&mut ball.vel.x) {
        events.push(StepEvent::EdgeBounce(Edge::Right));
    }
    if ball.pos.x < 0.0 && force_positive(&mut ball.vel.x) {
        events.push(StepEvent::EdgeBounce(Edge::Left));
    }
    if ball.pos.y < 0.0 && force_positive(&mut ball.vel.y) {
        events.push(StepEvent::EdgeBounce(Edge::Top));
    }
}

/// Decide what happens at the bottom edge.
///
/// `bat` is the paddle as it stood before this tick's tilt update.
pub fn resolve_floor(
    ball: &mut Ball,
    bat: Option<&Bat>,
    bounds: &Bounds,
    rule: FloorRule,
    window: HitWindow,
) -> FloorContact {
    if ball.bottom() <= bounds.height {
        return FloorContact::Clear;
    }

    match rule {
        FloorRule::Reflect => {
            force_negative(&mut ball.vel.y);
            FloorContact::Bounced
        }
        FloorRule::Catch => match bat {
            Some(bat) if window.contains(ball.pos.x, bat.pos.x, bat.size) => {
                force_negative(&mut ball.vel.y);
                FloorContact::Caught
            }
            // No bounce: the ball keeps falling through the last frame
            _ => FloorContact::Lost,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn ball_at(x: f32, y: f32, vel: Vec2) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel,
            size: 50.0,
        }
    }

    fn bat_at(x: f32) -> Bat {
        Bat {
            pos: Vec2::new(x, 800.0),
            size: 100.0,
        }
    }

    const BOUNDS: Bounds = Bounds {
        width: 400.0,
        height: 800.0,
    };

    #[test]
    fn test_right_edge_forces_negative() {
        let mut ball = ball_at(360.0, 100.0, Vec2::new(0.2, 0.1));
        let mut events = Vec::new();
        reflect_off_walls(&mut ball, &BOUNDS, &mut events);
        assert_eq!(ball.vel.x, -0.2);
        assert_eq!(ball.vel.y, 0.1);
        assert_eq!(events, vec![StepEvent::EdgeBounce(Edge::Right)]);
        // Position is not clamped
        assert_eq!(ball.pos.x, 360.0);
    }

    #[test]
    fn test_reflection_sticks_while_outside() {
        let mut ball = ball_at(380.0, 100.0, Vec2::new(-0.2, 0.1));
        let mut events = Vec::new();
        reflect_off_walls(&mut ball, &BOUNDS, &mut events);
        assert_eq!(ball.vel.x, -0.2);
        assert!(events.is_empty());
    }

    #[test]
    fn test_left_and_top_edges() {
        let mut ball = ball_at(-3.0, -1.0, Vec2::new(-0.1, -0.3));
        let mut events = Vec::new();
        reflect_off_walls(&mut ball, &BOUNDS, &mut events);
        assert_eq!(ball.vel, Vec2::new(0.1, 0.3));
        assert_eq!(
            events,
            vec![
                StepEvent::EdgeBounce(Edge::Left),
                StepEvent::EdgeBounce(Edge::Top)
            ]
        );
    }

    #[test]
    fn test_floor_clear_above_bottom() {
        let mut ball = ball_at(175.0, 750.0, Vec2::new(0.1, 0.1));
        let contact = resolve_floor(
            &mut ball,
            Some(&bat_at(150.0)),
            &BOUNDS,
            FloorRule::Catch,
            HitWindow::PaddleExtent,
        );
        // bottom == height is not a crossing
        assert_eq!(contact, FloorContact::Clear);
        assert_eq!(ball.vel.y, 0.1);
    }

    #[test]
    fn test_floor_catch_and_miss() {
        let bat = bat_at(150.0);

        let mut ball = ball_at(175.0, 760.0, Vec2::new(0.1, 0.1));
        let contact = resolve_floor(&mut ball, Some(&bat), &BOUNDS, FloorRule::Catch, HitWindow::PaddleExtent);
        assert_eq!(contact, FloorContact::Caught);
        assert_eq!(ball.vel.y, -0.1);

        let mut ball = ball_at(50.0, 760.0, Vec2::new(0.1, 0.1));
        let contact = resolve_floor(&mut ball, Some(&bat), &BOUNDS, FloorRule::Catch, HitWindow::PaddleExtent);
        assert_eq!(contact, FloorContact::Lost);
        assert_eq!(ball.vel.y, 0.1);
    }

    #[test]
    fn test_floor_catch_without_bat_is_lost() {
        let mut ball = ball_at(175.0, 760.0, Vec2::new(0.1, 0.1));
        let contact = resolve_floor(&mut ball, None, &BOUNDS, FloorRule::Catch, HitWindow::PaddleExtent);
        assert_eq!(contact, FloorContact::Lost);
    }

    #[test]
    fn test_floor_reflect_ignores_bat() {
        let mut ball = ball_at(0.0, 760.0, Vec2::new(0.1, 0.1));
        let contact = resolve_floor(
            &mut ball,
            Some(&bat_at(300.0)),
            &BOUNDS,
            FloorRule::Reflect,
            HitWindow::PaddleExtent,
        );
        assert_eq!(contact, FloorContact::Bounced);
        assert_eq!(ball.vel.y, -0.1);
    }

    #[test]
    fn test_window_choice_changes_outcome() {
        let bat = bat_at(150.0);
        let mut fixed = ball_at(300.0, 760.0, Vec2::new(0.1, 0.1));
        let mut legacy = fixed;

        let a = resolve_floor(&mut fixed, Some(&bat), &BOUNDS, FloorRule::Catch, HitWindow::PaddleExtent);
        let b = resolve_floor(&mut legacy, Some(&bat), &BOUNDS, FloorRule::Catch, HitWindow::BallRelative);
        assert_eq!(a, FloorContact::Lost);
        assert_eq!(b, FloorContact::Caught);
    }
}
