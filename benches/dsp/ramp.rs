//! Benchmarks for exponential parameter ramps and the gain stage.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hand_theremin::dsp::{gain::apply_gain_curve, ExpRamp};

use crate::BLOCK_SIZES;

pub fn bench_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramp");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Mid-ramp: one multiply per sample
        let mut ramp = ExpRamp::new(0.001);
        group.bench_with_input(BenchmarkId::new("exp_ramp", size), &size, |b, _| {
            b.iter(|| {
                ramp.ramp_to(0.4, 2_400);
                ramp.render(black_box(&mut buffer));
            })
        });

        // Settled: constant output
        let mut ramp = ExpRamp::new(0.4);
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, _| {
            b.iter(|| {
                ramp.render(black_box(&mut buffer));
            })
        });

        let gain = vec![0.25f32; size];
        let mut signal = vec![0.5f32; size];
        group.bench_with_input(BenchmarkId::new("gain_curve", size), &size, |b, _| {
            b.iter(|| {
                apply_gain_curve(black_box(&mut signal), black_box(&gain));
            })
        });
    }

    group.finish();
}
