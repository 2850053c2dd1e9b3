//! Gain staging and summing for multiple voices.

/*
Gain Staging
============

Every hand drives its own sine voice, and all voices are summed into one
output. Summing is plain addition, so the peaks of simultaneous voices add up:

    two voices at gain 0.4  →  worst-case peak 0.8
    two voices at gain 0.6  →  worst-case peak 1.2  (clips!)

That is why each voice is capped at 0.4 of full scale: two hands playing at
full volume still leave headroom below 1.0.

Vocabulary
----------

  gain          A multiplier applied to amplitude.
                  gain = 1.0  →  unchanged
                  gain < 1.0  →  quieter
                  gain = 0.0  →  silence

  headroom      Distance between the loudest peak and full scale (1.0).

  accumulate    Adding one signal into a running mix, in place.

Per-voice gain is not constant: it follows a ramp, so it is applied as a
per-sample control signal rather than a single number.

    voice[i] = oscillator[i] × gain[i]
    mix[i]  += voice[i]
*/

/// Multiply `signal` by a per-sample `gain` curve, in place.
#[inline]
pub fn apply_gain_curve(signal: &mut [f32], gain: &[f32]) {
    debug_assert_eq!(signal.len(), gain.len());

    for (s, &g) in signal.iter_mut().zip(gain.iter()) {
        *s *= g;
    }
}

/// Add `voice` into `mix`, in place.
///
/// Can exceed [-1.0, +1.0] if the voices are not gain-staged.
#[inline]
pub fn accumulate(mix: &mut [f32], voice: &[f32]) {
    debug_assert_eq!(mix.len(), voice.len());

    for (m, &v) in mix.iter_mut().zip(voice.iter()) {
        *m += v;
    }
}

/// Largest absolute sample in `buffer`.
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_curve_scales_each_sample() {
        let mut signal = [1.0, 1.0, -1.0, 0.5];
        let gain = [0.0, 0.5, 0.25, 1.0];
        apply_gain_curve(&mut signal, &gain);
        assert_eq!(signal, [0.0, 0.5, -0.25, 0.5]);
    }

    #[test]
    fn accumulate_sums() {
        let mut mix = [0.1, 0.2, 0.3];
        accumulate(&mut mix, &[0.4, -0.2, 0.0]);
        assert!((mix[0] - 0.5).abs() < 1e-6);
        assert!(mix[1].abs() < 1e-6);
        assert!((mix[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn two_capped_voices_leave_headroom() {
        let mut mix = [0.0f32; 4];
        accumulate(&mut mix, &[0.4, -0.4, 0.4, 0.0]);
        accumulate(&mut mix, &[0.4, -0.4, 0.0, 0.4]);
        assert!(peak(&mix) <= 0.8 + 1e-6);
    }
}
