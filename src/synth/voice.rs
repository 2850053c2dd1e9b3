use std::time::Instant;

use crate::{engine::GeneratorId, tracking::HandId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Hand present, parameters following every frame
    Active,
    /// Hand gone, gain ramping down; released at `teardown_at`
    FadingOut { teardown_at: Instant },
}

/// One hand's sound generator as seen from the control side.
#[derive(Debug, Clone)]
pub struct Voice {
    hand_id: HandId,
    generator: GeneratorId,
    frequency: f32,
    amplitude: f32,
    state: VoiceState,
}

impl Voice {
    pub(crate) fn new(hand_id: HandId, generator: GeneratorId, frequency: f32) -> Self {
        Self {
            hand_id,
            generator,
            frequency,
            amplitude: 0.0,
            state: VoiceState::Active,
        }
    }

    pub(crate) fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub(crate) fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    pub(crate) fn fade_out(&mut self, teardown_at: Instant) {
        self.state = VoiceState::FadingOut { teardown_at };
    }

    pub(crate) fn revive(&mut self) {
        self.state = VoiceState::Active;
    }

    pub fn hand_id(&self) -> HandId {
        self.hand_id
    }

    pub fn generator(&self) -> GeneratorId {
        self.generator
    }

    /// Last frequency target accepted by the audio side.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Last gain target accepted by the audio side.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == VoiceState::Active
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.state, VoiceState::FadingOut { .. })
    }

    /// Whether the fade-out window is over at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.state {
            VoiceState::Active => false,
            VoiceState::FadingOut { teardown_at } => now >= teardown_at,
        }
    }
}
