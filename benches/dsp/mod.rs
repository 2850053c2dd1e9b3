//! Benchmarks for low-level DSP primitives.

mod oscillator;
mod ramp;

pub use oscillator::bench_oscillator;
pub use ramp::bench_ramp;
