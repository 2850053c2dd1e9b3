//! Tunables for the whole pipeline.
//!
//! Everything has a sensible default; override with the fluent setters:
//!
//! ```
//! use hand_theremin::config::ThereminConfig;
//! use std::time::Duration;
//!
//! let config = ThereminConfig::new()
//!     .pitch_range(110.0, 1760.0)
//!     .max_volume(0.3)
//!     .fade_out(Duration::from_millis(200));
//! assert_eq!(config.pitch.min_hz, 110.0);
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mapping::{MAX_FREQUENCY, MAX_VOLUME, MIN_FREQUENCY};
use crate::tracking::{identity::IdentityMode, DEPTH_SCALE};

/// Frequency bounds of the pitch axis, in Hz.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRange {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl Default for PitchRange {
    fn default() -> Self {
        Self {
            min_hz: MIN_FREQUENCY,
            max_hz: MAX_FREQUENCY,
        }
    }
}

/// Ramp lengths and floors governing a voice's lifecycle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceTiming {
    /// Ramp applied to every per-frame frequency/gain update.
    pub update_ramp: Duration,
    /// Gain ramp toward the floor when a hand disappears.
    pub fade_out: Duration,
    /// Time from retirement until the generator is stopped and released.
    pub teardown_after: Duration,
    /// A fading voice this close to its teardown is replaced rather than
    /// revived: the audio clock may already have released its generator.
    pub revive_guard: Duration,
    /// Smallest gain target; exponential ramps cannot reach zero.
    pub gain_floor: f32,
    /// Lowest frequency ever sent to a generator.
    pub frequency_floor: f32,
    /// Frequency a freshly spawned generator starts at.
    pub initial_frequency: f32,
}

impl Default for VoiceTiming {
    fn default() -> Self {
        Self {
            update_ramp: Duration::from_millis(50),
            fade_out: Duration::from_millis(100),
            teardown_after: Duration::from_millis(150),
            revive_guard: Duration::from_millis(20),
            gain_floor: 0.001,
            frequency_floor: 20.0,
            initial_frequency: 440.0,
        }
    }
}

/// Sizing of the realtime engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Generator slots preallocated on the audio thread.
    pub max_generators: usize,
    /// Capacity of the control → audio command ring.
    pub command_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_generators: 8,
            command_capacity: 256,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThereminConfig {
    pub pitch: PitchRange,
    pub volume: VolumeSettings,
    pub identity: IdentityMode,
    pub timing: VoiceTiming,
    pub engine: EngineConfig,
}

/// Loudness axis: hand width scaling and the per-voice gain ceiling.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSettings {
    /// Per-voice gain ceiling.
    pub max_volume: f32,
    /// Multiplier turning thumb–pinky width into closeness.
    pub depth_scale: f32,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            max_volume: MAX_VOLUME,
            depth_scale: DEPTH_SCALE,
        }
    }
}

impl ThereminConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pitch_range(mut self, min_hz: f32, max_hz: f32) -> Self {
        self.pitch = PitchRange { min_hz, max_hz };
        self
    }

    pub fn max_volume(mut self, max_volume: f32) -> Self {
        self.volume.max_volume = max_volume.clamp(0.0, 1.0);
        self
    }

    pub fn depth_scale(mut self, depth_scale: f32) -> Self {
        self.volume.depth_scale = depth_scale;
        self
    }

    pub fn identity(mut self, identity: IdentityMode) -> Self {
        self.identity = identity;
        self
    }

    pub fn update_ramp(mut self, ramp: Duration) -> Self {
        self.timing.update_ramp = ramp;
        self
    }

    /// Set the fade length. Teardown is pushed out so it never precedes the fade.
    pub fn fade_out(mut self, fade: Duration) -> Self {
        self.timing.fade_out = fade;
        if self.timing.teardown_after < fade {
            self.timing.teardown_after = fade;
        }
        self
    }

    pub fn teardown_after(mut self, delay: Duration) -> Self {
        self.timing.teardown_after = delay.max(self.timing.fade_out);
        self
    }

    pub fn revive_guard(mut self, guard: Duration) -> Self {
        self.timing.revive_guard = guard;
        self
    }

    pub fn max_generators(mut self, count: usize) -> Self {
        self.engine.max_generators = count.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_stock_tuning() {
        let config = ThereminConfig::default();
        assert_eq!(config.pitch.min_hz, 200.0);
        assert_eq!(config.pitch.max_hz, 2_000.0);
        assert_eq!(config.volume.max_volume, 0.4);
        assert_eq!(config.volume.depth_scale, 8.0);
        assert_eq!(config.timing.update_ramp, Duration::from_millis(50));
        assert_eq!(config.timing.fade_out, Duration::from_millis(100));
        assert_eq!(config.timing.teardown_after, Duration::from_millis(150));
        assert_eq!(config.timing.revive_guard, Duration::from_millis(20));
    }

    #[test]
    fn teardown_never_precedes_fade() {
        let config = ThereminConfig::new().fade_out(Duration::from_millis(400));
        assert_eq!(config.timing.teardown_after, Duration::from_millis(400));

        let config = config.teardown_after(Duration::from_millis(10));
        assert_eq!(config.timing.teardown_after, Duration::from_millis(400));
    }

    #[test]
    fn max_volume_is_clamped() {
        let config = ThereminConfig::new().max_volume(3.0);
        assert_eq!(config.volume.max_volume, 1.0);
    }
}
