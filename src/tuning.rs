//! Data-driven game balance
//!
//! Every constant the physics and the tilt mapping read lives here so a
//! session can be built from JSON without recompiling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Horizontal extent used to decide whether the paddle caught the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitWindow {
    /// `bat.x <= ball.x < bat.x + bat.size`
    #[default]
    PaddleExtent,
    /// `bat.x <= ball.x < ball.x + bat.size`, as the first catch build shipped.
    /// The upper bound travels with the ball, so any ball right of the
    /// paddle's left edge counts as caught.
    BallRelative,
}

impl HitWindow {
    /// True when `ball_x` lies inside the window for a paddle at `bat_x`
    #[inline]
    pub fn contains(self, ball_x: f32, bat_x: f32, bat_size: f32) -> bool {
        let upper = match self {
            HitWindow::PaddleExtent => bat_x + bat_size,
            HitWindow::BallRelative => ball_x + bat_size,
        };
        bat_x <= ball_x && ball_x < upper
    }
}

/// Physics and input-mapping constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ball edge length (px)
    pub ball_size: f32,
    /// Initial ball velocity (px per ms)
    pub ball_velocity: Vec2,
    /// Paddle width (px)
    pub bat_size: f32,
    /// Paddle height as a fraction of its width
    pub bat_height_ratio: f32,
    /// Gap between the bottom edge and the top of the drawn paddle (px)
    pub bat_bottom_inset: f32,

    /// `speed_multiplier = 1 + tilt_speed_gain * beta / tilt_speed_range`
    pub tilt_speed_gain: f32,
    pub tilt_speed_range: f32,
    /// Lower bound for the speed multiplier; `None` lets strong backward
    /// tilt reverse the ball
    pub min_speed_multiplier: Option<f32>,
    /// `paddle_target_x = paddle_tilt_gain * gamma + paddle_tilt_offset`
    pub paddle_tilt_gain: f32,
    pub paddle_tilt_offset: f32,
    /// Paddle x while the sensor is unavailable or silent
    pub default_paddle_x: f32,

    pub hit_window: HitWindow,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_size: BALL_SIZE,
            ball_velocity: Vec2::new(BALL_START_VELOCITY.0, BALL_START_VELOCITY.1),
            bat_size: BAT_SIZE,
            bat_height_ratio: BAT_HEIGHT_RATIO,
            bat_bottom_inset: BAT_BOTTOM_INSET,

            tilt_speed_gain: TILT_SPEED_GAIN,
            tilt_speed_range: TILT_SPEED_RANGE,
            min_speed_multiplier: None,
            paddle_tilt_gain: PADDLE_TILT_GAIN,
            paddle_tilt_offset: PADDLE_TILT_OFFSET,
            default_paddle_x: DEFAULT_PADDLE_X,

            hit_window: HitWindow::PaddleExtent,
        }
    }
}

impl Tuning {
    /// Paddle height derived from its width
    #[inline]
    pub fn bat_height(&self) -> f32 {
        self.bat_size * self.bat_height_ratio
    }

    /// Byte-compatible tuning: the hit window of the first catch build
    pub fn legacy() -> Self {
        Self {
            hit_window: HitWindow::BallRelative,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddle_extent_window() {
        let w = HitWindow::PaddleExtent;
        assert!(w.contains(150.0, 150.0, 100.0));
        assert!(w.contains(175.0, 150.0, 100.0));
        assert!(!w.contains(250.0, 150.0, 100.0));
        assert!(!w.contains(50.0, 150.0, 100.0));
    }

    #[test]
    fn test_ball_relative_window_follows_ball() {
        let w = HitWindow::BallRelative;
        // Far right of the paddle still counts as a catch
        assert!(w.contains(390.0, 150.0, 100.0));
        assert!(!w.contains(50.0, 150.0, 100.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"bat_size": 120.0}"#).unwrap();
        assert_eq!(tuning.bat_size, 120.0);
        assert_eq!(tuning.ball_size, BALL_SIZE);
        assert_eq!(tuning.hit_window, HitWindow::PaddleExtent);
        assert!((tuning.bat_height() - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_hit_window_names() {
        let tuning: Tuning = serde_json::from_str(r#"{"hit_window": "ball_relative"}"#).unwrap();
        assert_eq!(tuning, Tuning::legacy());
    }
}
