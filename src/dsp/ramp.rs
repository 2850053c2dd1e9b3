//! Exponential parameter ramp.

/*
Exponential Ramps
=================

Hand tracking arrives at camera rate (~30-60 frames per second) while audio
runs at 48 000 samples per second. Jumping a voice's frequency or gain to a
new value once per frame produces audible steps ("zipper noise") and clicks.
Instead every new target is approached with a short ramp.

Vocabulary
----------

  target        The value the ramp is heading toward.

  ramp length   How many samples the ramp takes to reach the target.
                50 ms at 48 kHz = 2400 samples.

  ratio         The constant per-sample multiplier of an exponential ramp.

  floor         The smallest value a ramp may start from or head to.


Why exponential?
----------------

Pitch and loudness are both heard logarithmically. A linear ramp from
200 Hz to 400 Hz spends most of its time in the upper half of the octave; an
exponential ramp moves by equal musical intervals per unit time. The same
holds for gain measured in decibels.

An exponential ramp from v0 to v1 over N samples is:

    v[n] = v0 × (v1 / v0)^(n / N)

which is computed incrementally with one multiply per sample:

    ratio  = (v1 / v0)^(1 / N)
    v[n+1] = v[n] × ratio


The zero problem
----------------

(v1 / v0) is undefined when v0 is 0 and the curve never reaches 0 either,
since every step is a multiplication. Both ends are therefore clamped to a
small positive floor. A voice that fades "to silence" really fades to the
floor, which is far below audibility, and is then stopped outright.

Targets that change mid-ramp simply start a new ramp from the current value,
so later updates always supersede earlier ones.
*/

/// Lowest value an exponential ramp will start from or head to.
pub const MIN_RAMP_VALUE: f32 = 1.0e-6;

/// Per-sample exponential approach toward a target.
#[derive(Debug, Clone)]
pub struct ExpRamp {
    value: f32,
    target: f32,
    ratio: f32,
    remaining: u32,
}

impl ExpRamp {
    /// Start at rest at `value`. Zero is allowed here; the next ramp lifts it to the floor.
    pub fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
            ratio: 1.0,
            remaining: 0,
        }
    }

    /// Head toward `target` over `samples` samples.
    ///
    /// A ramp of zero samples jumps straight to the target.
    pub fn ramp_to(&mut self, target: f32, samples: u32) {
        let target = target.max(MIN_RAMP_VALUE);
        self.target = target;

        if samples == 0 {
            self.value = target;
            self.remaining = 0;
            self.ratio = 1.0;
            return;
        }

        let start = self.value.max(MIN_RAMP_VALUE);
        self.value = start;
        self.ratio = (target / start).powf(1.0 / samples as f32);
        self.remaining = samples;
    }

    /// Jump to `value` with no ramp.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.ratio = 1.0;
        self.remaining = 0;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                // land exactly, no accumulated rounding
                self.value = self.target;
            } else {
                self.value *= self.ratio;
            }
        }
        self.value
    }

    /// Fill `out` with successive ramp values.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_value();
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_exactly() {
        let mut ramp = ExpRamp::new(200.0);
        ramp.ramp_to(2_000.0, 100);

        let mut buffer = [0.0f32; 100];
        ramp.render(&mut buffer);

        assert_eq!(buffer[99], 2_000.0);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn midpoint_is_geometric_mean() {
        let mut ramp = ExpRamp::new(200.0);
        ramp.ramp_to(2_000.0, 1_000);

        for _ in 0..500 {
            ramp.next_value();
        }

        let geometric_mean = (200.0f32 * 2_000.0).sqrt();
        assert!(
            (ramp.value() - geometric_mean).abs() < 1.0,
            "expected ~{geometric_mean}, got {}",
            ramp.value()
        );
    }

    #[test]
    fn rising_ramp_is_monotonic() {
        let mut ramp = ExpRamp::new(0.001);
        ramp.ramp_to(0.4, 480);

        let mut previous = ramp.value();
        for _ in 0..480 {
            let value = ramp.next_value();
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn ramp_from_zero_starts_at_floor() {
        let mut ramp = ExpRamp::new(0.0);
        ramp.ramp_to(0.4, 10);

        let first = ramp.next_value();
        assert!(first > 0.0 && first < 0.4);
    }

    #[test]
    fn zero_length_ramp_jumps() {
        let mut ramp = ExpRamp::new(1.0);
        ramp.ramp_to(0.25, 0);
        assert_eq!(ramp.value(), 0.25);
        assert_eq!(ramp.next_value(), 0.25);
    }

    #[test]
    fn new_target_supersedes_running_ramp() {
        let mut ramp = ExpRamp::new(1.0);
        ramp.ramp_to(0.001, 100);
        for _ in 0..50 {
            ramp.next_value();
        }

        ramp.ramp_to(0.5, 10);
        for _ in 0..10 {
            ramp.next_value();
        }
        assert_eq!(ramp.value(), 0.5);
    }
}
