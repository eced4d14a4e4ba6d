//! Device orientation input
//!
//! The platform pushes raw `beta`/`gamma` angles (radians) into a
//! [`ReadingCell`] at its own pace; the session pulls the latest value once
//! per tick and maps it to [`TiltScalars`].

pub mod access;
pub mod cell;
pub mod subscription;

pub use access::AccessGate;
pub use cell::{Availability, ReadingCell, SensorFeed, SensorReader};
pub use subscription::{SensorSource, Subscription};

use crate::tuning::Tuning;

/// One orientation sample. Angles are nominally within about ±1.5 rad but
/// are never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Front-to-back tilt
    pub beta: f32,
    /// Left-to-right tilt
    pub gamma: f32,
}

impl SensorReading {
    pub fn new(beta: f32, gamma: f32) -> Self {
        Self { beta, gamma }
    }
}

/// Tilt-derived inputs for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltScalars {
    pub speed_multiplier: f32,
    /// May be NaN; the step then leaves the paddle in place
    pub paddle_target_x: f32,
}

impl TiltScalars {
    /// Map the latest reading (if any) to simulation inputs
    pub fn derive(reading: Option<SensorReading>, available: bool, tuning: &Tuning) -> Self {
        Self {
            speed_multiplier: speed_multiplier(reading, tuning),
            paddle_target_x: paddle_target_x(reading, available, tuning),
        }
    }
}

/// `1 + gain * beta / range`; 1 without a reading or when the result is not
/// a finite number
pub fn speed_multiplier(reading: Option<SensorReading>, tuning: &Tuning) -> f32 {
    let extra = reading.map_or(0.0, |r| tuning.tilt_speed_gain * r.beta / tuning.tilt_speed_range);
    let multiplier = if extra.is_finite() { 1.0 + extra } else { 1.0 };

    match tuning.min_speed_multiplier {
        Some(floor) => multiplier.max(floor),
        None => multiplier,
    }
}

/// `gain * gamma + offset` once the sensor is confirmed and has reported,
/// the fixed default placement otherwise
pub fn paddle_target_x(reading: Option<SensorReading>, available: bool, tuning: &Tuning) -> f32 {
    match reading {
        Some(r) if available => tuning.paddle_tilt_gain * r.gamma + tuning.paddle_tilt_offset,
        _ => tuning.default_paddle_x,
    }
}
