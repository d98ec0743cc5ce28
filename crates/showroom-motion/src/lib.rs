//! Time-based interpolation for the Showroom engine.
//!
//! This crate provides:
//! - Named easing curves
//! - Per-property tweens and value tracks
//! - A yoyo oscillator used while a diagnostic scan runs
//! - The transition director that drives material uniforms and the camera
//!
//! Every update takes an explicit `now` in seconds; nothing here reads a
//! wall clock.

mod easing;
mod tween;
mod oscillator;
mod director;

pub use easing::Easing;
pub use tween::{Lerp, Track, Tween};
pub use oscillator::{Oscillator, OscillatorState};
pub use director::{TransitionDirector, timings};
