//! Per-frame simulation step
//!
//! `step` is pure: it takes the entities by value and hands back the next
//! ones. It never fails; degenerate input falls back to safe values.

use super::collision::{FloorContact, FloorRule, reflect_off_walls, resolve_floor};
use super::state::{Ball, Bat, Bounds, Edge, StepEvent};
use crate::tuning::{HitWindow, Tuning};

/// Scalars consumed by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Time since the previous tick (ms)
    pub elapsed: f32,
    /// Applied uniformly to both velocity axes
    pub speed_multiplier: f32,
    /// Paddle x for this tick; NaN leaves the paddle where it is
    pub paddle_target_x: f32,
}

/// Rules that stay fixed for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRules {
    pub floor: FloorRule,
    pub hit_window: HitWindow,
}

impl StepRules {
    pub fn new(floor: FloorRule, tuning: &Tuning) -> Self {
        Self {
            floor,
            hit_window: tuning.hit_window,
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub ball: Ball,
    pub bat: Option<Bat>,
    /// The ball was lost; no further ticks should run
    pub terminal: bool,
    pub events: Vec<StepEvent>,
}

/// Advance the ball and paddle by one frame
pub fn step(
    mut ball: Ball,
    mut bat: Option<Bat>,
    input: &TickInput,
    bounds: &Bounds,
    rules: &StepRules,
) -> StepOutcome {
    let mut events = Vec::new();

    // Integrate
    ball.pos += ball.vel * input.elapsed * input.speed_multiplier;

    reflect_off_walls(&mut ball, bounds, &mut events);

    let terminal = match resolve_floor(&mut ball, bat.as_ref(), bounds, rules.floor, rules.hit_window)
    {
        FloorContact::Clear => false,
        FloorContact::Bounced => {
            events.push(StepEvent::EdgeBounce(Edge::Bottom));
            false
        }
        FloorContact::Caught => {
            events.push(StepEvent::PaddleHit);
            false
        }
        FloorContact::Lost => {
            events.push(StepEvent::BallLost);
            true
        }
    };

    // Move paddle after the floor check: the catch uses last frame's paddle
    if let Some(bat) = bat.as_mut() {
        if !input.paddle_target_x.is_nan() {
            bat.pos.x = input.paddle_target_x;
        }
    }

    StepOutcome {
        ball,
        bat,
        terminal,
        events,
    }
}
