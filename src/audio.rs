//! Loss feedback: record a short clip from the microphone, then replay it
//!
//! The action is fire-and-forget. Failures end the action only; they are
//! logged here and never reach the session.

use thiserror::Error;

/// Why the record-and-replay action stopped early
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordingError {
    #[error("audio capture is not supported on this platform")]
    Unsupported,

    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("audio device error while {stage}: {message}")]
    Device {
        stage: RecordingStage,
        message: String,
    },
}

/// Steps of the action, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStage {
    RequestPermission,
    StartRecording,
    StopRecording,
    Playback,
}

impl std::fmt::Display for RecordingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordingStage::RequestPermission => "requesting permission",
            RecordingStage::StartRecording => "starting the recording",
            RecordingStage::StopRecording => "stopping the recording",
            RecordingStage::Playback => "playing back",
        };
        f.write_str(s)
    }
}

impl RecordingError {
    pub fn device(stage: RecordingStage, message: impl Into<String>) -> Self {
        RecordingError::Device {
            stage,
            message: message.into(),
        }
    }
}

/// Side effect launched once when the ball is lost
pub trait LossFeedback {
    /// Start the action and return immediately
    fn trigger(&mut self);
}

/// Feedback that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl LossFeedback for Silent {
    fn trigger(&mut self) {}
}

/// Location of a recorded clip, released exactly once when dropped
pub struct ClipUrl<R: FnOnce(&str)> {
    url: String,
    release: Option<R>,
}

impl<R: FnOnce(&str)> ClipUrl<R> {
    pub fn new(url: String, release: R) -> Self {
        Self {
            url,
            release: Some(release),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl<R: FnOnce(&str)> Drop for ClipUrl<R> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(&self.url);
        }
    }
}

/// Recording window as the `i32` delay browser timers take, saturating
/// instead of wrapping for oversized settings
pub fn timer_delay_ms(window_ms: u32) -> i32 {
    i32::try_from(window_ms).unwrap_or(i32::MAX)
}

/// Log the outcome of a finished action
pub fn report(result: Result<(), RecordingError>) {
    match result {
        Ok(()) => log::info!("Loss recording replayed"),
        Err(RecordingError::PermissionDenied) => {
            log::warn!("Loss recording skipped: microphone permission denied")
        }
        Err(e) => log::warn!("Loss recording failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RecordingError::PermissionDenied.to_string(),
            "microphone permission denied"
        );
        let e = RecordingError::device(RecordingStage::StopRecording, "NotReadableError");
        assert_eq!(
            e.to_string(),
            "audio device error while stopping the recording: NotReadableError"
        );
    }

    #[test]
    fn test_clip_url_released_on_every_exit() {
        use std::cell::RefCell;

        let released = RefCell::new(Vec::new());
        let play = |fail: bool| -> Result<(), RecordingError> {
            let clip = ClipUrl::new(format!("blob:clip-{fail}"), |url: &str| {
                released.borrow_mut().push(url.to_string())
            });
            assert!(clip.as_str().starts_with("blob:"));
            if fail {
                return Err(RecordingError::device(RecordingStage::Playback, "aborted"));
            }
            Ok(())
        };

        assert!(play(false).is_ok());
        assert!(play(true).is_err());
        assert_eq!(*released.borrow(), vec!["blob:clip-false", "blob:clip-true"]);
    }

    #[test]
    fn test_timer_delay_saturates() {
        assert_eq!(timer_delay_ms(2000), 2000);
        assert_eq!(timer_delay_ms(i32::MAX as u32), i32::MAX);
        assert_eq!(timer_delay_ms(u32::MAX), i32::MAX);
    }

    #[test]
    fn test_report_never_panics() {
        report(Ok(()));
        report(Err(RecordingError::Unsupported));
        report(Err(RecordingError::PermissionDenied));
    }
}
