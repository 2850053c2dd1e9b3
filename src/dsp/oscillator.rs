//! Sine oscillator with a phase accumulator.

use std::f32::consts::TAU;

/*
Phase Accumulator
=================

A theremin voice is a single sine wave whose pitch glides continuously. The
oscillator therefore cannot assume a fixed frequency per block: every sample
may ask for a slightly different pitch while a ramp is running.

Vocabulary
----------

  phase         Position inside one cycle, kept in [0.0, 1.0).
                0.0 = start of the cycle, 0.5 = halfway.

  increment     How far phase advances per sample:
                    increment = frequency / sample_rate

  wrap          Subtracting 1.0 when phase passes the end of the cycle.


Why accumulate phase instead of computing sin(2π f t)?
------------------------------------------------------

With a gliding frequency, sin(2π f(t) t) jumps whenever f changes because the
whole history is rescaled. Accumulating the increment sample by sample keeps
the waveform continuous no matter how the frequency moves, so there are no
clicks while the hand is moving.

    sample[n] = sin(2π × phase[n])
    phase[n+1] = wrap(phase[n] + f[n] / sample_rate)

At a constant frequency this is exactly sin(2π f n / sample_rate).
*/

/// A single sine oscillator. Frequency is supplied per sample.
#[derive(Debug, Clone, Default)]
pub struct SineOscillator {
    phase: f32,
}

impl SineOscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let sample = (TAU * self.phase).sin();
        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        sample
    }

    /// Fill `out` at a constant frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    /// Restart the cycle at phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}
