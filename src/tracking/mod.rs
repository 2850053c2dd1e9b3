//! Hand landmarks in, normalized control signals out.
//!
//! The landmark detector itself is external: per frame it yields zero or more
//! hands, each an ordered list of 21 points in the standard hand-landmark
//! layout. This module turns those into [`HandObservation`]s.

pub mod extract;
pub mod identity;

use std::fmt;

pub use extract::{extract, extract_with_scale, HandSignal};
pub use identity::{HandIdentifier, IdentityMode};

/// Points per hand in the detector's layout.
pub const LANDMARK_COUNT: usize = 21;
/// Wrist / palm base.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const PINKY_TIP: usize = 20;

/// Scale from thumb–pinky width to closeness; a close-up hand saturates at 1.
pub const DEPTH_SCALE: f32 = 8.0;

/// One detected point. `x` and `y` are normalized to the image, `z` is the
/// detector's relative depth hint (unused by the extractor).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Identifier distinguishing simultaneously tracked hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandId(pub u32);

impl fmt::Display for HandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One hand's control signals for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    pub hand_id: HandId,
    /// Palm x, 0 = left edge of the image, 1 = right edge.
    pub x: f32,
    /// Palm y, 0 = top, 1 = bottom.
    pub y: f32,
    /// Closeness, 0 = far, 1 = close.
    pub z: f32,
}

impl HandObservation {
    pub fn new(hand_id: HandId, signal: HandSignal) -> Self {
        Self {
            hand_id,
            x: signal.x,
            y: signal.y,
            z: signal.z,
        }
    }
}
