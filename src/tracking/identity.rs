//! Cross-frame hand identity.
//!
//! The detector only reports hands in result order. Using that index as the
//! identity breaks whenever hands swap places in the result, or one hand
//! leaves while another enters in the same frame: the voices silently trade
//! owners. `NearestNeighbor` instead follows each palm from frame to frame.
//!
//! Detectors also drop a hand for a frame or two now and then. A palm that
//! vanishes stays in the match pool for `hold_frames` frames, so a hand that
//! comes back near where it left keeps its id (and its fading voice).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::HandId;

/// Default greatest palm movement (normalized image units) between two
/// frames that still counts as the same hand.
pub const DEFAULT_MAX_JUMP: f32 = 0.25;

/// Default number of frames a vanished palm can still be matched.
pub const DEFAULT_HOLD_FRAMES: u32 = 5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdentityMode {
    /// The hand's position in the detector result is its id.
    ArrayIndex,
    /// Match palms to recently seen palms, closest pairs first.
    /// Unmatched hands get fresh ids that are never reused.
    NearestNeighbor { max_jump: f32, hold_frames: u32 },
}

impl Default for IdentityMode {
    fn default() -> Self {
        IdentityMode::NearestNeighbor {
            max_jump: DEFAULT_MAX_JUMP,
            hold_frames: DEFAULT_HOLD_FRAMES,
        }
    }
}

/// A palm last seen at (x, y), `missed` frames ago.
#[derive(Debug, Clone, Copy)]
struct Track {
    id: HandId,
    x: f32,
    y: f32,
    missed: u32,
}

/// Assigns a [`HandId`] to every hand of each frame.
#[derive(Debug, Clone)]
pub struct HandIdentifier {
    mode: IdentityMode,
    tracks: Vec<Track>,
    next_id: u32,
}

impl HandIdentifier {
    pub fn new(mode: IdentityMode) -> Self {
        Self {
            mode,
            tracks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn mode(&self) -> IdentityMode {
        self.mode
    }

    /// Ids for this frame's palms, in the same order as `palms`.
    pub fn assign(&mut self, palms: &[(f32, f32)]) -> Vec<HandId> {
        match self.mode {
            IdentityMode::ArrayIndex => {
                let ids: Vec<HandId> = (0..palms.len() as u32).map(HandId).collect();
                self.tracks = ids
                    .iter()
                    .zip(palms)
                    .map(|(&id, &(x, y))| Track { id, x, y, missed: 0 })
                    .collect();
                ids
            }
            IdentityMode::NearestNeighbor {
                max_jump,
                hold_frames,
            } => self.match_nearest(palms, max_jump, hold_frames),
        }
    }

    /// Forget all history, e.g. after a full stop.
    pub fn reset(&mut self) {
        self.tracks.clear();
    }

    fn match_nearest(
        &mut self,
        palms: &[(f32, f32)],
        max_jump: f32,
        hold_frames: u32,
    ) -> Vec<HandId> {
        let mut pairs: Vec<(f32, usize, usize)> = Vec::new();
        for (current, &(x, y)) in palms.iter().enumerate() {
            for (prior, track) in self.tracks.iter().enumerate() {
                let distance = ((x - track.x).powi(2) + (y - track.y).powi(2)).sqrt();
                if distance <= max_jump {
                    pairs.push((distance, current, prior));
                }
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut ids: Vec<Option<HandId>> = vec![None; palms.len()];
        let mut taken = vec![false; self.tracks.len()];
        for (_, current, prior) in pairs {
            if ids[current].is_none() && !taken[prior] {
                ids[current] = Some(self.tracks[prior].id);
                taken[prior] = true;
            }
        }

        let ids: Vec<HandId> = ids
            .into_iter()
            .map(|id| id.unwrap_or_else(|| self.fresh_id()))
            .collect();

        // unmatched tracks age out; matched ones are replaced by this frame's palms
        let held = self
            .tracks
            .iter()
            .zip(&taken)
            .filter(|&(track, &matched)| !matched && track.missed < hold_frames)
            .map(|(track, _)| Track {
                missed: track.missed + 1,
                ..*track
            })
            .collect::<Vec<_>>();

        self.tracks = ids
            .iter()
            .zip(palms)
            .map(|(&id, &(x, y))| Track { id, x, y, missed: 0 })
            .chain(held)
            .collect();

        ids
    }

    fn fresh_id(&mut self) -> HandId {
        let id = HandId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl Default for HandIdentifier {
    fn default() -> Self {
        Self::new(IdentityMode::default())
    }
}
