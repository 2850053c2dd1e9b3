//! Low-level DSP primitives used by the audio engine.
//!
//! These components are allocation-free and realtime-safe, so the mixer can
//! run them directly on the audio thread. They stay focused on the
//! signal-processing math; lifecycle and scheduling live in `engine`.

/// Per-sample gain curves and voice summing.
pub mod gain;
/// Sine oscillator driven by a per-sample frequency.
pub mod oscillator;
/// Exponential approach toward a target value.
pub mod ramp;

pub use oscillator::SineOscillator;
pub use ramp::ExpRamp;
