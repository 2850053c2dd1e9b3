//! Benchmarks for the mixer rendering several hands at once.

use std::{collections::VecDeque, hint::black_box};

use criterion::{BenchmarkId, Criterion};
use hand_theremin::engine::{EngineCommand, GeneratorId, Mixer, VoiceParam};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

/// A mixer with `hands` generators sounding, half of them fading if `fading`.
fn mixer_with(hands: u32, fading: bool) -> Mixer<VecDeque<EngineCommand>> {
    let mut commands = VecDeque::new();
    for i in 0..hands {
        let id = GeneratorId(i);
        commands.push_back(EngineCommand::Spawn {
            id,
            frequency: 440.0,
            gain: 0.0,
        });
        commands.push_back(EngineCommand::Ramp {
            id,
            param: VoiceParam::Gain,
            target: 0.2,
            seconds: 0.05,
        });
        if fading && i % 2 == 1 {
            commands.push_back(EngineCommand::Ramp {
                id,
                param: VoiceParam::Gain,
                target: 0.001,
                seconds: 0.1,
            });
            // Long enough that the generator stays alive for the whole run
            commands.push_back(EngineCommand::StopAfter {
                id,
                seconds: 3_600.0,
            });
        }
    }
    Mixer::new(SAMPLE_RATE, 8, commands)
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === IDLE ===
        // No hands: cost of scanning empty slots
        let mut idle = mixer_with(0, false);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| idle.render_block(black_box(&mut buffer)))
        });

        // === ONE HAND ===
        let mut one = mixer_with(1, false);
        group.bench_with_input(BenchmarkId::new("one_hand", size), &size, |b, _| {
            b.iter(|| one.render_block(black_box(&mut buffer)))
        });

        // === TWO HANDS ===
        // The usual case
        let mut two = mixer_with(2, false);
        group.bench_with_input(BenchmarkId::new("two_hands", size), &size, |b, _| {
            b.iter(|| two.render_block(black_box(&mut buffer)))
        });

        // === FULL, HALF FADING ===
        // Every slot in use, some with a pending stop
        let mut full = mixer_with(8, true);
        group.bench_with_input(BenchmarkId::new("full_half_fading", size), &size, |b, _| {
            b.iter(|| full.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
