use std::{collections::BTreeMap, time::Instant};

use crate::{
    config::VoiceTiming,
    engine::{AudioBackend, VoiceParam},
    error::AudioError,
    tracking::HandId,
};

use super::voice::{Voice, VoiceState};

/// What `update` did to the hand's voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEvent {
    /// A new generator was spawned for a hand seen for the first time.
    Created,
    /// An active voice received new targets.
    Updated,
    /// A fading voice's teardown was cancelled and it is active again.
    Revived,
}

/// Owns one voice per hand and drives it through
/// Absent → Active → FadingOut → Absent.
///
/// A hand that reappears while its voice is still fading gets the same
/// generator back: the pending stop is cancelled instead of spawning a second
/// generator on top of the fading one. Generators the audio side reports as
/// released are dropped first, so a voice never outlives its generator.
pub struct VoiceManager<B: AudioBackend> {
    backend: B,
    voices: BTreeMap<HandId, Voice>,
    timing: VoiceTiming,
}

impl<B: AudioBackend> VoiceManager<B> {
    pub fn new(backend: B, timing: VoiceTiming) -> Self {
        Self {
            backend,
            voices: BTreeMap::new(),
            timing,
        }
    }

    /// Move the hand's voice toward `frequency` and `amplitude`, creating or
    /// reviving it first if needed.
    ///
    /// A fading voice is revived only while `now` is more than the revive
    /// guard ahead of its teardown; closer than that it is replaced.
    ///
    /// On failure the voice keeps whatever targets it had before.
    pub fn update(
        &mut self,
        hand_id: HandId,
        frequency: f32,
        amplitude: f32,
        now: Instant,
    ) -> Result<VoiceEvent, AudioError> {
        let timing = self.timing;
        self.collect_released();

        if self
            .voices
            .get(&hand_id)
            .is_some_and(|voice| voice.is_expired(now + timing.revive_guard))
        {
            if let Some(stale) = self.voices.remove(&hand_id) {
                tracing::debug!(hand = %hand_id, generator = %stale.generator(), "too close to teardown, replacing voice");
                if let Err(err) = self.backend.stop(stale.generator()) {
                    tracing::warn!(hand = %hand_id, error = %err, "stop of replaced voice failed");
                }
            }
        }

        let event = match self.voices.get_mut(&hand_id) {
            None => {
                let generator = self.backend.spawn(timing.initial_frequency, 0.0)?;
                tracing::debug!(hand = %hand_id, generator = %generator, "voice created");
                self.voices.insert(
                    hand_id,
                    Voice::new(hand_id, generator, timing.initial_frequency),
                );
                VoiceEvent::Created
            }
            Some(voice) if voice.is_fading() => {
                self.backend.cancel_stop(voice.generator())?;
                voice.revive();
                tracing::debug!(hand = %hand_id, generator = %voice.generator(), "voice revived");
                VoiceEvent::Revived
            }
            Some(_) => VoiceEvent::Updated,
        };

        let Some(voice) = self.voices.get_mut(&hand_id) else {
            return Ok(event);
        };

        let frequency = frequency.max(timing.frequency_floor);
        let gain = amplitude.max(timing.gain_floor);

        let frequency_result = self.backend.ramp(
            voice.generator(),
            VoiceParam::Frequency,
            frequency,
            timing.update_ramp,
        );
        if frequency_result.is_ok() {
            voice.set_frequency(frequency);
        }

        let gain_result =
            self.backend
                .ramp(voice.generator(), VoiceParam::Gain, gain, timing.update_ramp);
        if gain_result.is_ok() {
            voice.set_amplitude(gain);
        }

        frequency_result.and(gain_result).map(|_| event)
    }

    /// Begin the fade-out of the hand's voice.
    ///
    /// Returns `Ok(false)` when there is nothing to retire: the hand has no
    /// voice or it is already fading. If the stop cannot be scheduled the
    /// generator is stopped immediately, the voice is dropped, and the
    /// scheduling error is returned.
    pub fn retire(&mut self, hand_id: HandId, now: Instant) -> Result<bool, AudioError> {
        let timing = self.timing;

        let Some(voice) = self.voices.get_mut(&hand_id) else {
            return Ok(false);
        };
        if voice.is_fading() {
            return Ok(false);
        }

        let generator = voice.generator();
        let fade_result = self.backend.ramp(
            generator,
            VoiceParam::Gain,
            timing.gain_floor,
            timing.fade_out,
        );

        if let Err(err) = self.backend.stop_after(generator, timing.teardown_after) {
            tracing::warn!(hand = %hand_id, error = %err, "could not schedule teardown, stopping now");
            if let Err(stop_err) = self.backend.stop(generator) {
                tracing::warn!(hand = %hand_id, error = %stop_err, "immediate stop failed");
            }
            self.voices.remove(&hand_id);
            return Err(err);
        }

        if fade_result.is_ok() {
            voice.set_amplitude(timing.gain_floor);
        }
        voice.fade_out(now + timing.teardown_after);
        tracing::debug!(hand = %hand_id, generator = %generator, "voice fading out");

        fade_result.map(|_| true)
    }

    /// Forget voices whose teardown time has passed, or whose generator the
    /// audio side has already released.
    pub fn reap(&mut self, now: Instant) -> Vec<HandId> {
        let mut reaped = self.collect_released();
        self.voices.retain(|&hand_id, voice| {
            if voice.is_expired(now) {
                tracing::debug!(hand = %hand_id, generator = %voice.generator(), "voice released");
                reaped.push(hand_id);
                false
            } else {
                true
            }
        });
        reaped
    }

    /// Drop voices whose generator the audio side freed on its own.
    fn collect_released(&mut self) -> Vec<HandId> {
        let mut dropped = Vec::new();
        while let Some(generator) = self.backend.poll_released() {
            self.voices.retain(|&hand_id, voice| {
                if voice.generator() != generator {
                    return true;
                }
                if voice.is_active() {
                    tracing::warn!(hand = %hand_id, generator = %generator, "generator lost on the audio side");
                } else {
                    tracing::debug!(hand = %hand_id, generator = %generator, "voice released");
                }
                dropped.push(hand_id);
                false
            });
        }
        dropped
    }

    /// Stop every voice immediately, fading or not. Returns how many were stopped.
    pub fn shutdown(&mut self) -> usize {
        let count = self.voices.len();
        for (hand_id, voice) in std::mem::take(&mut self.voices) {
            if let Err(err) = self.backend.stop(voice.generator()) {
                tracing::warn!(hand = %hand_id, error = %err, "stop failed during shutdown");
            }
        }
        if count > 0 {
            tracing::debug!(count, "all voices stopped");
        }
        count
    }

    pub fn get(&self, hand_id: HandId) -> Option<&Voice> {
        self.voices.get(&hand_id)
    }

    pub fn state(&self, hand_id: HandId) -> Option<VoiceState> {
        self.voices.get(&hand_id).map(Voice::state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.values()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.voices.values().filter(|v| v.is_active()).count()
    }

    pub fn timing(&self) -> &VoiceTiming {
        &self.timing
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: AudioBackend> Drop for VoiceManager<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
