//! Tilt Catch - keep the ball in play with a tilt-controlled paddle
//!
//! Core modules:
//! - `sim`: Per-frame physics (integration, edge reflection, paddle catch)
//! - `sensor`: Device orientation readings and the scalars derived from them
//! - `session`: Run/stop state machine driving `sim` once per frame
//! - `audio`: Record-then-replay feedback on loss
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser bindings for sensors and audio
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod sensor;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{GameSession, SessionPhase, StopReason};
pub use settings::{Settings, SettingsError, Variant};
pub use tuning::{HitWindow, Tuning};

/// Game configuration constants
pub mod consts {
    /// Requested interval between orientation events (ms)
    pub const SENSOR_UPDATE_INTERVAL_MS: u32 = 20;
    /// Length of the loss recording before it is replayed (ms)
    pub const RECORDING_WINDOW_MS: u32 = 2000;
    /// Largest elapsed time derived from a pair of frame timestamps (ms)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 50.0;
    /// Pixels per millisecond on each axis
    pub const BALL_START_VELOCITY: (f32, f32) = (0.1, 0.1);

    /// Paddle defaults
    pub const BAT_SIZE: f32 = 100.0;
    pub const BAT_HEIGHT_RATIO: f32 = 0.2;
    /// Distance from the bottom edge to the top of the drawn paddle
    pub const BAT_BOTTOM_INSET: f32 = 36.0;

    /// Tilt mapping: `1 + gain * beta / range`
    pub const TILT_SPEED_GAIN: f32 = 5.0;
    pub const TILT_SPEED_RANGE: f32 = 1.5;
    /// Tilt mapping: `gain * gamma + offset`
    pub const PADDLE_TILT_GAIN: f32 = 250.0;
    pub const PADDLE_TILT_OFFSET: f32 = 150.0;
    /// Paddle x used while no trusted reading exists
    pub const DEFAULT_PADDLE_X: f32 = 100.0;
}
