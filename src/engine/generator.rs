use crate::dsp::{
    gain::{accumulate, apply_gain_curve},
    ExpRamp, SineOscillator,
};

use super::{GeneratorId, VoiceParam};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Free,     // Available for allocation
    Running,  // Sounding, following parameter ramps
    Stopping, // Counting down to a scheduled stop
}

/// One sine oscillator plus its gain stage, living on the audio thread.
pub struct Generator {
    id: Option<GeneratorId>,
    state: GeneratorState,
    age: u64,
    osc: SineOscillator,
    frequency: ExpRamp,
    gain: ExpRamp,
    /// Samples left before a scheduled stop, valid while `Stopping`.
    stop_in: u32,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            id: None,
            state: GeneratorState::Free,
            age: 0,
            osc: SineOscillator::new(),
            frequency: ExpRamp::new(440.0),
            gain: ExpRamp::new(0.0),
            stop_in: 0,
        }
    }

    pub fn start(&mut self, id: GeneratorId, frequency: f32, gain: f32, age: u64) {
        self.id = Some(id);
        self.state = GeneratorState::Running;
        self.age = age;
        self.osc.reset();
        self.frequency.set(frequency);
        self.gain.set(gain);
        self.stop_in = 0;
    }

    pub fn ramp(&mut self, param: VoiceParam, target: f32, samples: u32) {
        match param {
            VoiceParam::Frequency => self.frequency.ramp_to(target, samples),
            VoiceParam::Gain => self.gain.ramp_to(target, samples),
        }
    }

    /// Schedule a stop `samples` from now. Zero stops immediately.
    pub fn stop_after(&mut self, samples: u32) {
        if !self.is_live() {
            return;
        }
        if samples == 0 {
            self.free();
        } else {
            self.state = GeneratorState::Stopping;
            self.stop_in = samples;
        }
    }

    pub fn cancel_stop(&mut self) {
        if self.state == GeneratorState::Stopping {
            self.state = GeneratorState::Running;
            self.stop_in = 0;
        }
    }

    /// Render into the scratch buffers and add the result to `out`.
    ///
    /// `voice_buf` and `gain_buf` must be at least `out.len()` long.
    pub fn render(
        &mut self,
        out: &mut [f32],
        voice_buf: &mut [f32],
        gain_buf: &mut [f32],
        sample_rate: f32,
    ) {
        if !self.is_live() {
            return;
        }

        let len = out.len();
        let voice_buf = &mut voice_buf[..len];
        let gain_buf = &mut gain_buf[..len];

        for sample in voice_buf.iter_mut() {
            let frequency = self.frequency.next_value();
            *sample = self.osc.next_sample(frequency, sample_rate);
        }
        self.gain.render(gain_buf);

        if self.state == GeneratorState::Stopping {
            let audible = (self.stop_in as usize).min(len);
            gain_buf[audible..].fill(0.0);
        }

        apply_gain_curve(voice_buf, gain_buf);
        accumulate(out, voice_buf);

        if self.state == GeneratorState::Stopping {
            if self.stop_in as usize <= len {
                self.free();
            } else {
                self.stop_in -= len as u32;
            }
        }
    }

    pub fn free(&mut self) {
        self.state = GeneratorState::Free;
        self.id = None;
        self.stop_in = 0;
    }

    pub fn id(&self) -> Option<GeneratorId> {
        self.id
    }

    pub fn is_free(&self) -> bool {
        self.state == GeneratorState::Free
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, GeneratorState::Running | GeneratorState::Stopping)
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn frequency(&self) -> f32 {
        self.frequency.value()
    }

    pub fn gain(&self) -> f32 {
        self.gain.value()
    }

    pub fn frequency_target(&self) -> f32 {
        self.frequency.target()
    }

    pub fn gain_target(&self) -> f32 {
        self.gain.target()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}
