//! Entities and session state
//!
//! Positions are top-left corners in screen pixels, y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Play area, captured once when the session starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The ball. Velocity is in pixels per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

impl Ball {
    /// Ball centered horizontally, top edge at mid-height
    pub fn spawn(bounds: &Bounds, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(bounds.width / 2.0 - tuning.ball_size / 2.0, bounds.height / 2.0),
            vel: tuning.ball_velocity,
            size: tuning.ball_size,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }
}

/// The paddle. Its x is set from tilt every tick; it is never integrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bat {
    pub pos: Vec2,
    pub size: f32,
}

impl Bat {
    /// Paddle centered horizontally on the bottom edge
    pub fn spawn(bounds: &Bounds, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(bounds.width / 2.0 - tuning.bat_size / 2.0, bounds.height),
            size: tuning.bat_size,
        }
    }
}

/// Run flags for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub running: bool,
    pub terminal: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            running: true,
            terminal: false,
        }
    }
}

/// Screen edge a ball can reflect off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Something that happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepEvent {
    /// Velocity sign flipped at an edge (bottom only under `FloorRule::Reflect`)
    EdgeBounce(Edge),
    /// Ball crossed the floor inside the paddle's hit window
    PaddleHit,
    /// Ball crossed the floor and nothing caught it
    BallLost,
}

/// Presentation-facing copy of everything needed to draw a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub bounds: Bounds,
    pub ball: Ball,
    pub bat: Option<Bat>,
    pub state: SessionState,
}
