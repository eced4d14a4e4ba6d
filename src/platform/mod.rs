//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Orientation sensor delivery and availability
//! - The record-and-replay loss feedback
//!
//! Native builds have no sensors; `headless` provides a scripted tilt for
//! the demo binary.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{NoRecorder, ScriptedTilt};
