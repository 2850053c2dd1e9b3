//! Benchmarks for sine generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hand_theremin::dsp::SineOscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Fixed frequency - one sin() per sample
        let mut osc = SineOscillator::new();
        group.bench_with_input(BenchmarkId::new("sine_fixed", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(440.0), sample_rate);
            })
        });

        // Per-sample frequency, as the generators drive it during a glide
        let mut osc = SineOscillator::new();
        group.bench_with_input(BenchmarkId::new("sine_gliding", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let frequency = 200.0 + i as f32;
                    *sample = osc.next_sample(black_box(frequency), sample_rate);
                }
            })
        });
    }

    group.finish();
}
