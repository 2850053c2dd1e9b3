//! Landmark geometry → `(x, y, z)`.
//!
//! `x` and `y` are the palm base unchanged. `z` approximates closeness from
//! the apparent thumb-to-pinky width: a 2-D projection of a hand gets wider as
//! it approaches the camera, so no depth sensor is needed.

use crate::error::TrackingError;

use super::{Landmark, DEPTH_SCALE, LANDMARK_COUNT, PINKY_TIP, THUMB_TIP, WRIST};

/// Normalized control signals of one hand, before an identity is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSignal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Extract with the default depth scale.
pub fn extract(landmarks: &[Landmark]) -> Result<HandSignal, TrackingError> {
    extract_with_scale(landmarks, DEPTH_SCALE, 0)
}

/// Extract, reporting `hand` as the index of the offending hand on failure.
pub fn extract_with_scale(
    landmarks: &[Landmark],
    depth_scale: f32,
    hand: usize,
) -> Result<HandSignal, TrackingError> {
    if landmarks.len() != LANDMARK_COUNT {
        return Err(TrackingError::MalformedHand {
            hand,
            expected: LANDMARK_COUNT,
            found: landmarks.len(),
        });
    }

    let palm = landmarks[WRIST];
    let width = (landmarks[THUMB_TIP].x - landmarks[PINKY_TIP].x).abs();

    let z = width * depth_scale;

    Ok(HandSignal {
        x: palm.x,
        y: palm.y,
        z: if z.is_nan() { 0.0 } else { z.clamp(0.0, 1.0) },
    })
}
