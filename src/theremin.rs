//! The per-frame entry point tying tracking, mapping and voices together.

use std::{collections::BTreeSet, time::Instant};

use crate::{
    config::{ThereminConfig, VoiceTiming},
    display::HandReading,
    engine::AudioBackend,
    error::{AudioError, TrackingError},
    mapping::ParameterMapper,
    synth::VoiceManager,
    tracking::{extract_with_scale, HandId, HandIdentifier, HandObservation, Landmark},
};

/// A hand-tracking theremin driven one detection frame at a time.
///
/// Until [`initialize_audio`](Self::initialize_audio) succeeds, frames are
/// still processed and returned for display but produce no sound.
pub struct Theremin<B: AudioBackend> {
    mapper: ParameterMapper,
    identifier: HandIdentifier,
    depth_scale: f32,
    timing: VoiceTiming,
    voices: Option<VoiceManager<B>>,
    active: BTreeSet<HandId>,
}

impl<B: AudioBackend> Theremin<B> {
    pub fn new(config: &ThereminConfig) -> Self {
        Self {
            mapper: ParameterMapper::from_config(config),
            identifier: HandIdentifier::new(config.identity),
            depth_scale: config.volume.depth_scale,
            timing: config.timing,
            voices: None,
            active: BTreeSet::new(),
        }
    }

    /// Bring up the audio side with `open`. Does nothing if it is already up.
    ///
    /// A failure is logged and returned; the theremin stays display-only and
    /// a later call may try again.
    pub fn initialize_audio<F>(&mut self, open: F) -> Result<(), AudioError>
    where
        F: FnOnce() -> Result<B, AudioError>,
    {
        if self.voices.is_some() {
            return Ok(());
        }

        match open() {
            Ok(backend) => {
                self.voices = Some(VoiceManager::new(backend, self.timing));
                tracing::info!("audio initialized");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "audio unavailable, continuing display-only");
                Err(err)
            }
        }
    }

    pub fn is_audio_ready(&self) -> bool {
        self.voices.is_some()
    }

    /// Process one detection frame: `hands` holds each detected hand's
    /// landmarks, `now` is the frame time.
    ///
    /// A malformed hand rejects the whole frame before anything changes.
    /// Audio failures are per hand: they are logged and the frame goes on.
    pub fn process_frame<H>(
        &mut self,
        hands: &[H],
        now: Instant,
    ) -> Result<Vec<HandReading>, TrackingError>
    where
        H: AsRef<[Landmark]>,
    {
        let signals = hands
            .iter()
            .enumerate()
            .map(|(index, hand)| extract_with_scale(hand.as_ref(), self.depth_scale, index))
            .collect::<Result<Vec<_>, _>>()?;

        let palms: Vec<(f32, f32)> = signals.iter().map(|s| (s.x, s.y)).collect();
        let ids = self.identifier.assign(&palms);

        let mut readings = Vec::with_capacity(signals.len());
        let mut current = BTreeSet::new();

        for (index, (hand_id, signal)) in ids.into_iter().zip(signals).enumerate() {
            let observation = HandObservation::new(hand_id, signal);
            let frequency = self.mapper.frequency(observation.x);
            let amplitude = self.mapper.amplitude(observation.z);

            if let Some(voices) = self.voices.as_mut() {
                if let Err(err) = voices.update(hand_id, frequency, amplitude, now) {
                    tracing::warn!(hand = %hand_id, error = %err, "voice update failed");
                }
            }

            current.insert(hand_id);
            readings.push(HandReading::new(observation, index, frequency, amplitude));
        }

        if let Some(voices) = self.voices.as_mut() {
            for &departed in self.active.difference(&current) {
                if let Err(err) = voices.retire(departed, now) {
                    tracing::warn!(hand = %departed, error = %err, "voice retirement failed");
                }
            }
            voices.reap(now);
        }

        self.active = current;
        Ok(readings)
    }

    /// Silence and release every voice at once and forget all tracked hands.
    /// Audio stays initialized.
    pub fn stop(&mut self) {
        if let Some(voices) = self.voices.as_mut() {
            voices.shutdown();
        }
        self.active.clear();
        self.identifier.reset();
    }

    /// Hands seen in the last processed frame.
    pub fn active_hands(&self) -> &BTreeSet<HandId> {
        &self.active
    }

    /// The voice layer, once audio is initialized.
    pub fn voices(&self) -> Option<&VoiceManager<B>> {
        self.voices.as_ref()
    }

    pub fn mapper(&self) -> &ParameterMapper {
        &self.mapper
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use super::*;
    use crate::{
        engine::{GeneratorId, VoiceParam},
        synth::VoiceState,
        tracking::{LANDMARK_COUNT, PINKY_TIP, THUMB_TIP},
    };

    /// Counts calls; shared so the test can inspect it after handing the
    /// backend to the theremin.
    #[derive(Default)]
    struct Log {
        spawns: u32,
        gain_ramps: Vec<(GeneratorId, f32)>,
        stop_afters: u32,
        stops: u32,
        /// Ramps on this generator are refused.
        broken: Option<GeneratorId>,
    }

    struct Recorder(Rc<RefCell<Log>>);

    impl AudioBackend for Recorder {
        fn spawn(&mut self, _: f32, _: f32) -> Result<GeneratorId, AudioError> {
            let mut log = self.0.borrow_mut();
            log.spawns += 1;
            Ok(GeneratorId(log.spawns))
        }

        fn ramp(
            &mut self,
            id: GeneratorId,
            param: VoiceParam,
            target: f32,
            _: Duration,
        ) -> Result<(), AudioError> {
            let mut log = self.0.borrow_mut();
            if log.broken == Some(id) {
                return Err(AudioError::QueueFull);
            }
            if param == VoiceParam::Gain {
                log.gain_ramps.push((id, target));
            }
            Ok(())
        }

        fn stop_after(&mut self, _: GeneratorId, _: Duration) -> Result<(), AudioError> {
            self.0.borrow_mut().stop_afters += 1;
            Ok(())
        }

        fn cancel_stop(&mut self, _: GeneratorId) -> Result<(), AudioError> {
            Ok(())
        }

        fn stop(&mut self, _: GeneratorId) -> Result<(), AudioError> {
            self.0.borrow_mut().stops += 1;
            Ok(())
        }
    }

    fn hand(x: f32, width: f32) -> Vec<Landmark> {
        let mut points = vec![Landmark::new(x, 0.5, 0.0); LANDMARK_COUNT];
        points[THUMB_TIP].x = x + width / 2.0;
        points[PINKY_TIP].x = x - width / 2.0;
        points
    }

    fn ready() -> (Theremin<Recorder>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut theremin = Theremin::new(&ThereminConfig::default());
        let backend = Recorder(log.clone());
        theremin.initialize_audio(|| Ok(backend)).unwrap();
        (theremin, log)
    }

    #[test]
    fn frames_before_init_are_display_only() {
        let mut theremin: Theremin<Recorder> = Theremin::new(&ThereminConfig::default());
        let readings = theremin
            .process_frame(&[hand(0.5, 0.1)], Instant::now())
            .unwrap();

        assert_eq!(readings.len(), 1);
        assert!(!theremin.is_audio_ready());
        assert!(theremin.voices().is_none());
        assert_eq!(theremin.active_hands().len(), 1);
    }

    #[test]
    fn init_failure_keeps_display_only_and_can_retry() {
        let mut theremin: Theremin<Recorder> = Theremin::new(&ThereminConfig::default());
        assert!(theremin
            .initialize_audio(|| Err(AudioError::NoOutputDevice))
            .is_err());
        assert!(!theremin.is_audio_ready());

        let log = Rc::new(RefCell::new(Log::default()));
        let backend = Recorder(log.clone());
        theremin.initialize_audio(|| Ok(backend)).unwrap();
        assert!(theremin.is_audio_ready());
    }

    #[test]
    fn initialize_is_idempotent() {
        let (mut theremin, _log) = ready();
        theremin
            .initialize_audio(|| panic!("must not reopen"))
            .unwrap();
        assert!(theremin.is_audio_ready());
    }

    #[test]
    fn readings_carry_mapped_values() {
        let (mut theremin, _log) = ready();
        let readings = theremin
            .process_frame(&[hand(1.0, 0.0)], Instant::now())
            .unwrap();

        let r = readings[0];
        assert!((r.frequency - 200.0).abs() < 0.01);
        assert_eq!(r.volume, 0.0);
        assert_eq!(r.x, 1.0);
        assert_eq!(r.index, 0);
    }

    #[test]
    fn failing_voice_does_not_hold_back_the_others() {
        let (mut theremin, log) = ready();
        // the first hand's generator is spawned first, as id 1
        log.borrow_mut().broken = Some(GeneratorId(1));

        let readings = theremin
            .process_frame(&[hand(0.2, 0.1), hand(0.8, 0.05)], Instant::now())
            .unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].index, 1);
        assert_eq!(log.borrow().spawns, 2);

        let second = readings[1];
        let gain_ramps = log.borrow().gain_ramps.clone();
        assert_eq!(gain_ramps, vec![(GeneratorId(2), second.volume)]);

        let voice = theremin.voices().unwrap().get(second.hand_id).unwrap();
        assert_eq!(voice.generator(), GeneratorId(2));
        assert_eq!(voice.amplitude(), second.volume);
        assert!((voice.frequency() - second.frequency).abs() < 1e-3);
        assert_eq!(theremin.active_hands().len(), 2);
    }

    #[test]
    fn malformed_hand_rejects_whole_frame() {
        let (mut theremin, log) = ready();
        let now = Instant::now();
        theremin.process_frame(&[hand(0.5, 0.1)], now).unwrap();

        let short = vec![Landmark::default(); 5];
        let err = theremin
            .process_frame(&[hand(0.5, 0.1), short], now)
            .unwrap_err();

        assert_eq!(
            err,
            TrackingError::MalformedHand {
                hand: 1,
                expected: LANDMARK_COUNT,
                found: 5
            }
        );
        // previous frame's hand is neither updated nor retired
        assert_eq!(theremin.active_hands().len(), 1);
        assert_eq!(log.borrow().stop_afters, 0);
        assert_eq!(log.borrow().gain_ramps.len(), 1);
    }

    #[test]
    fn departed_hand_is_retired_once_then_reaped() {
        let (mut theremin, log) = ready();
        let t0 = Instant::now();
        let frame = Duration::from_millis(33);

        for i in 0..3 {
            theremin.process_frame(&[hand(0.5, 0.1)], t0 + frame * i).unwrap();
        }
        assert_eq!(log.borrow().spawns, 1);

        let gone = t0 + frame * 3;
        let empty: [Vec<Landmark>; 0] = [];
        theremin.process_frame(&empty, gone).unwrap();
        theremin.process_frame(&empty, gone + frame).unwrap();
        assert_eq!(log.borrow().stop_afters, 1);

        let hand_id = theremin.voices().unwrap().iter().next().unwrap().hand_id();
        assert!(matches!(
            theremin.voices().unwrap().state(hand_id),
            Some(VoiceState::FadingOut { .. })
        ));

        theremin
            .process_frame(&empty, gone + Duration::from_millis(150))
            .unwrap();
        assert!(theremin.voices().unwrap().is_empty());
    }

    #[test]
    fn stop_silences_everything() {
        let (mut theremin, log) = ready();
        theremin
            .process_frame(&[hand(0.2, 0.1), hand(0.8, 0.05)], Instant::now())
            .unwrap();
        assert_eq!(theremin.voices().unwrap().len(), 2);

        theremin.stop();
        assert_eq!(log.borrow().stops, 2);
        assert!(theremin.voices().unwrap().is_empty());
        assert!(theremin.active_hands().is_empty());
        assert!(theremin.is_audio_ready());
    }
}
