//! Game settings
//!
//! Picked once at start-up (page query on web, CLI argument on native).
//! Nothing is persisted between sessions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::FloorRule;
use crate::tuning::Tuning;

/// Which iteration of the game to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Ball bounces off all four edges, no paddle
    Bounce,
    /// Tilt moves the paddle; the ball passes through it and bounces off the floor
    TiltPaddle,
    /// Missing the ball ends the game
    #[default]
    Catch,
    /// As `Catch`, plus a short microphone recording replayed on loss
    CatchAndRecord,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Bounce => "bounce",
            Variant::TiltPaddle => "tilt-paddle",
            Variant::Catch => "catch",
            Variant::CatchAndRecord => "catch-and-record",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bounce" | "ball" => Some(Variant::Bounce),
            "tilt" | "tilt-paddle" | "tilt_paddle" => Some(Variant::TiltPaddle),
            "catch" => Some(Variant::Catch),
            "record" | "catch-and-record" | "catch_and_record" => Some(Variant::CatchAndRecord),
            _ => None,
        }
    }

    /// Whether a paddle exists at all
    pub fn has_bat(&self) -> bool {
        !matches!(self, Variant::Bounce)
    }

    /// What happens when the ball crosses the bottom edge
    pub fn floor_rule(&self) -> FloorRule {
        match self {
            Variant::Bounce | Variant::TiltPaddle => FloorRule::Reflect,
            Variant::Catch | Variant::CatchAndRecord => FloorRule::Catch,
        }
    }

    /// Whether losing triggers the record-and-replay action
    pub fn records_on_loss(&self) -> bool {
        matches!(self, Variant::CatchAndRecord)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown variant {0:?} (expected bounce, tilt-paddle, catch or catch-and-record)")]
    UnknownVariant(String),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    pub tuning: Tuning,

    // === Sensor ===
    /// Requested orientation update interval (ms); best effort
    pub sensor_interval_ms: u32,

    // === Audio ===
    /// How long the microphone records before replay (ms)
    pub recording_window_ms: u32,

    // === Frame pacing ===
    /// Clamp for elapsed time derived from frame timestamps (ms)
    pub max_frame_delta_ms: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            tuning: Tuning::default(),
            sensor_interval_ms: SENSOR_UPDATE_INTERVAL_MS,
            recording_window_ms: RECORDING_WINDOW_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
        }
    }
}

impl Settings {
    /// Default settings for one variant
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply a variant given by name
    pub fn set_variant_name(&mut self, name: &str) -> Result<(), SettingsError> {
        self.variant =
            Variant::from_str(name).ok_or_else(|| SettingsError::UnknownVariant(name.to_string()))?;
        Ok(())
    }

    /// Read `variant` from a URL query string such as `?variant=bounce&x=1`
    pub fn from_query(query: &str) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        let pairs = query.trim_start_matches('?').split('&');
        for (key, value) in pairs.filter_map(|p| p.split_once('=')) {
            if key == "variant" {
                settings.set_variant_name(value)?;
            }
        }
        Ok(settings)
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();

        match Self::from_query(&query) {
            Ok(settings) => {
                log::info!("Variant: {}", settings.variant.as_str());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Native: settings come from the command line
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        if let Some(name) = std::env::args().nth(1) {
            if let Err(e) = settings.set_variant_name(&name) {
                log::warn!("{e}; using default settings");
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_names_round_trip() {
        for v in [
            Variant::Bounce,
            Variant::TiltPaddle,
            Variant::Catch,
            Variant::CatchAndRecord,
        ] {
            assert_eq!(Variant::from_str(v.as_str()), Some(v));
        }
        assert_eq!(Variant::from_str("RECORD"), Some(Variant::CatchAndRecord));
        assert_eq!(Variant::from_str("pong"), None);
    }

    #[test]
    fn test_variant_capabilities() {
        assert!(!Variant::Bounce.has_bat());
        assert_eq!(Variant::TiltPaddle.floor_rule(), FloorRule::Reflect);
        assert_eq!(Variant::Catch.floor_rule(), FloorRule::Catch);
        assert!(!Variant::Catch.records_on_loss());
        assert!(Variant::CatchAndRecord.records_on_loss());
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{"variant": "bounce"}"#).unwrap();
        assert_eq!(settings.variant, Variant::Bounce);
        assert_eq!(settings.sensor_interval_ms, 20);
        assert_eq!(settings.recording_window_ms, 2000);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_from_query() {
        let settings = Settings::from_query("?debug=1&variant=tilt").unwrap();
        assert_eq!(settings.variant, Variant::TiltPaddle);

        assert_eq!(Settings::from_query("").unwrap(), Settings::default());
        assert!(matches!(
            Settings::from_query("?variant=golf"),
            Err(SettingsError::UnknownVariant(name)) if name == "golf"
        ));
    }
}
