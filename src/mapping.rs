//! Control signal → synthesis parameter curves.

/*
Pitch and Loudness Curves
=========================

The hand gives two normalized numbers per frame: a horizontal position x and
a closeness z, both in [0, 1]. These are turned into a frequency in Hz and a
linear gain.

Pitch: logarithmic
------------------

Hearing perceives pitch by ratio: 200 → 400 Hz sounds like the same step as
1000 → 2000 Hz (one octave each). A linear map from x to Hz would cram all
the low notes into the left edge. Interpolating in log space instead gives
equal musical intervals for equal hand movement:

    freq = exp( ln(min) + t × (ln(max) − ln(min)) )

With t = 1 − x the right side of the frame is low and the left side is high
in image coordinates. Detector x grows to the right of the *image*, and the
image is a mirror of the player, so moving the hand to the player's right
raises the pitch.

    x = 0.0  →  2000 Hz
    x = 0.5  →   632 Hz   (geometric mean √(200 × 2000))
    x = 1.0  →   200 Hz

Loudness: linear with clamp, closer is louder
---------------------------------------------

z measures apparent hand width, which grows as the hand approaches the camera:
larger z means closer. Gain rises linearly with closeness:

    gain = clamp(z, 0, 1) × max_volume

Beware the tempting (1 − z) × max_volume: with z as closeness it makes a
closer hand quieter.

max_volume is 0.4 so that two voices summed at full volume still peak below
1.0.
*/

use crate::config::{PitchRange, ThereminConfig};

/// Lowest pitch, reached at the right edge of the frame.
pub const MIN_FREQUENCY: f32 = 200.0;
/// Highest pitch, reached at the left edge of the frame.
pub const MAX_FREQUENCY: f32 = 2_000.0;
/// Per-voice gain ceiling.
pub const MAX_VOLUME: f32 = 0.4;

/// Clamp to [0, 1], treating NaN as 0.
#[inline]
fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Log-interpolate `x` in [0, 1] onto `range`, inverted so x = 0 is the top.
#[inline]
pub fn frequency_in(range: PitchRange, x: f32) -> f32 {
    let invert = 1.0 - unit(x);
    let log_min = range.min_hz.ln();
    let log_max = range.max_hz.ln();
    (log_min + invert * (log_max - log_min)).exp()
}

/// Map closeness `z` to a linear gain in [0, `max_volume`].
#[inline]
pub fn amplitude_in(max_volume: f32, z: f32) -> f32 {
    unit(z) * max_volume
}

/// Horizontal position → frequency in [200, 2000] Hz.
pub fn frequency(x: f32) -> f32 {
    frequency_in(PitchRange::default(), x)
}

/// Closeness → gain in [0, 0.4].
pub fn amplitude(z: f32) -> f32 {
    amplitude_in(MAX_VOLUME, z)
}

/// The two curves bound to one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterMapper {
    pitch: PitchRange,
    max_volume: f32,
}

impl ParameterMapper {
    pub fn new(pitch: PitchRange, max_volume: f32) -> Self {
        Self { pitch, max_volume }
    }

    pub fn from_config(config: &ThereminConfig) -> Self {
        Self::new(config.pitch, config.volume.max_volume)
    }

    pub fn frequency(&self, x: f32) -> f32 {
        frequency_in(self.pitch, x)
    }

    pub fn amplitude(&self, z: f32) -> f32 {
        amplitude_in(self.max_volume, z)
    }

    pub fn max_volume(&self) -> f32 {
        self.max_volume
    }
}

impl Default for ParameterMapper {
    fn default() -> Self {
        Self::new(PitchRange::default(), MAX_VOLUME)
    }
}
