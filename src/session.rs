//! Game session controller
//!
//! Owns the entities and the run flag, runs one simulation step per host
//! frame while running, and launches the loss feedback. Stopping is final:
//! a new game needs a new `GameSession`.

use crate::audio::LossFeedback;
use crate::sensor::{ReadingCell, SensorReader, SensorSource, Subscription, TiltScalars};
use crate::settings::Settings;
use crate::sim::{Ball, Bat, Bounds, SessionState, Snapshot, StepEvent, StepRules, TickInput, step};

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The ball crossed the floor uncaught
    BallLost,
    /// The host asked the session to stop
    Requested,
}

/// Two-state view of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Stopped(StopReason),
}

/// What one call to `advance` did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// False when the session was already stopped and nothing ran
    pub ran: bool,
    pub events: Vec<StepEvent>,
    /// Set on the tick that stopped the session
    pub stopped: Option<StopReason>,
}

pub struct GameSession {
    settings: Settings,
    bounds: Bounds,
    rules: StepRules,
    ball: Ball,
    bat: Option<Bat>,
    state: SessionState,
    stop_reason: Option<StopReason>,
    reader: SensorReader,
    subscription: Option<Subscription>,
    feedback: Box<dyn LossFeedback>,
    last_frame_ms: Option<f64>,
    ticks: u64,
}

impl GameSession {
    /// Start a session: place the entities and subscribe to `source`
    pub fn start(
        settings: Settings,
        bounds: Bounds,
        source: &mut dyn SensorSource,
        feedback: Box<dyn LossFeedback>,
    ) -> Self {
        let (feed, reader) = ReadingCell::channel();
        let subscription = source.subscribe(feed, settings.sensor_interval_ms);
        Self::with_reader(settings, bounds, reader, subscription, feedback)
    }

    /// Start a session on an existing reader (the caller manages delivery)
    pub fn with_reader(
        settings: Settings,
        bounds: Bounds,
        reader: SensorReader,
        subscription: Subscription,
        feedback: Box<dyn LossFeedback>,
    ) -> Self {
        let variant = settings.variant;
        let tuning = &settings.tuning;
        let ball = Ball::spawn(&bounds, tuning);
        let bat = variant.has_bat().then(|| Bat::spawn(&bounds, tuning));
        let rules = StepRules::new(variant.floor_rule(), tuning);

        log::info!(
            "Session started: variant={}, bounds={}x{}",
            variant.as_str(),
            bounds.width,
            bounds.height
        );

        Self {
            settings,
            bounds,
            rules,
            ball,
            bat,
            state: SessionState::default(),
            stop_reason: None,
            reader,
            subscription: Some(subscription),
            feedback,
            last_frame_ms: None,
            ticks: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn phase(&self) -> SessionPhase {
        match self.stop_reason {
            None => SessionPhase::Running,
            Some(reason) => SessionPhase::Stopped(reason),
        }
    }

    /// Number of simulation steps run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Read-only copy for presentation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bounds: self.bounds,
            ball: self.ball,
            bat: self.bat,
            state: self.state,
        }
    }

    /// Tilt scalars the next tick would use
    pub fn current_tilt(&self) -> TiltScalars {
        TiltScalars::derive(
            self.reader.latest(),
            self.reader.is_available(),
            &self.settings.tuning,
        )
    }

    /// Run one tick with an explicit elapsed time (ms)
    pub fn advance(&mut self, elapsed_ms: f32) -> TickReport {
        if !self.state.running {
            return TickReport::default();
        }

        let tilt = self.current_tilt();
        let input = TickInput {
            elapsed: elapsed_ms,
            speed_multiplier: tilt.speed_multiplier,
            paddle_target_x: tilt.paddle_target_x,
        };

        let outcome = step(self.ball, self.bat, &input, &self.bounds, &self.rules);
        self.ball = outcome.ball;
        self.bat = outcome.bat;
        self.ticks += 1;

        let mut report = TickReport {
            ran: true,
            events: outcome.events,
            stopped: None,
        };

        if outcome.terminal {
            self.state.terminal = true;
            self.halt(StopReason::BallLost);
            report.stopped = Some(StopReason::BallLost);

            if self.settings.variant.records_on_loss() {
                log::debug!("Launching loss recording");
                self.feedback.trigger();
            }
        }

        report
    }

    /// Run one tick from a host frame timestamp (ms, monotonic).
    ///
    /// The first frame runs with zero elapsed time; later gaps are clamped to
    /// `max_frame_delta_ms`.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> TickReport {
        let elapsed = match self.last_frame_ms {
            Some(prev) => ((timestamp_ms - prev).max(0.0) as f32).min(self.settings.max_frame_delta_ms),
            None => 0.0,
        };
        self.last_frame_ms = Some(timestamp_ms.max(self.last_frame_ms.unwrap_or(timestamp_ms)));
        self.advance(elapsed)
    }

    /// Stop on request. Has no effect once stopped.
    pub fn stop(&mut self) {
        if self.state.running {
            self.halt(StopReason::Requested);
        }
    }

    fn halt(&mut self, reason: StopReason) {
        self.state.running = false;
        self.stop_reason = Some(reason);
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        log::info!("Session stopped after {} ticks: {:?}", self.ticks, reason);
    }
}
