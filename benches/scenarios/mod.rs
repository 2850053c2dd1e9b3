//! Realistic mixer loads.
//!
//! These benchmarks drive the mixer with the same commands the voice layer
//! sends while people play: hands sounding, gliding, and fading out.

mod voices;

pub use voices::bench_voices;
