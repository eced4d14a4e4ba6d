//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Elapsed time and tilt scalars arrive as plain input
//! - No sensor, audio, rendering or platform dependencies
//! - No error paths; bad numbers resolve to safe values

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{FloorContact, FloorRule, reflect_off_walls, resolve_floor};
pub use state::{Ball, Bat, Bounds, Edge, SessionState, Snapshot, StepEvent};
pub use tick::{StepOutcome, StepRules, TickInput, step};
