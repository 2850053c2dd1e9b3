//! Read-only per-hand readings for whatever draws the instrument.

use crate::tracking::{HandId, HandObservation};

/// One hand's state for the display, produced by every processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReading {
    pub hand_id: HandId,
    /// Position of the hand in this frame's detector result.
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Mapped pitch in Hz.
    pub frequency: f32,
    /// Mapped linear gain, before any floor the voice layer applies.
    pub volume: f32,
}

impl HandReading {
    pub fn new(observation: HandObservation, index: usize, frequency: f32, volume: f32) -> Self {
        Self {
            hand_id: observation.hand_id,
            index,
            x: observation.x,
            y: observation.y,
            z: observation.z,
            frequency,
            volume,
        }
    }

    /// "Hand 1", "Hand 2", ... by position in the frame. Tracked ids keep
    /// growing as hands come and go, so they make poor labels.
    pub fn label(&self) -> String {
        format!("Hand {}", self.index + 1)
    }

    pub fn frequency_label(&self) -> String {
        format!("{} Hz", self.frequency.round() as i32)
    }

    pub fn volume_label(&self) -> String {
        format!("{}%", (self.volume * 100.0).round() as i32)
    }

    pub fn position_label(&self) -> String {
        format!("{:.1}", self.x)
    }

    pub fn distance_label(&self) -> String {
        format!("{:.1}", self.z)
    }

    /// x as seen in a selfie view, where the image is flipped horizontally.
    pub fn mirrored_x(&self) -> f32 {
        1.0 - self.x
    }

    /// Volume as a fraction of `max_volume`, for gauges.
    pub fn volume_fraction(&self, max_volume: f32) -> f64 {
        if max_volume <= 0.0 {
            return 0.0;
        }
        (self.volume / max_volume).clamp(0.0, 1.0) as f64
    }
}
