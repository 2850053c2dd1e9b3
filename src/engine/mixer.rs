use crate::MAX_BLOCK_SIZE;

use super::{
    generator::{Generator, GeneratorState},
    message::{CommandReceiver, EngineCommand, ReleaseSender},
    GeneratorId,
};

/// Audio-thread side of the engine: applies queued commands at block
/// boundaries and sums every live generator into the output.
///
/// Generators it frees without being told to are reported through `S`.
///
/// All storage is allocated up front; `render_block` never allocates.
pub struct Mixer<R: CommandReceiver, S: ReleaseSender = ()> {
    generators: Vec<Generator>,
    rx: R,
    released: S,
    sample_rate: f32,
    voice_buf: Vec<f32>,
    gain_buf: Vec<f32>,
    frame_counter: u64,
}

impl<R: CommandReceiver> Mixer<R> {
    pub fn new(sample_rate: f32, max_generators: usize, rx: R) -> Self {
        Mixer::with_release(sample_rate, max_generators, rx, ())
    }
}

impl<R: CommandReceiver, S: ReleaseSender> Mixer<R, S> {
    pub fn with_release(sample_rate: f32, max_generators: usize, rx: R, released: S) -> Self {
        let generators = (0..max_generators.max(1))
            .map(|_| Generator::new())
            .collect();

        Self {
            generators,
            rx,
            released,
            sample_rate,
            voice_buf: vec![0.0; MAX_BLOCK_SIZE],
            gain_buf: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        // Process control messages
        while let Some(command) = self.rx.pop() {
            self.apply(command);
        }

        out.fill(0.0);

        let Self {
            generators,
            released,
            voice_buf,
            gain_buf,
            sample_rate,
            ..
        } = &mut *self;

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            for generator in generators.iter_mut() {
                if !generator.is_live() {
                    continue;
                }
                let id = generator.id();
                generator.render(chunk, voice_buf, gain_buf, *sample_rate);
                if let (true, Some(id)) = (generator.is_free(), id) {
                    released.released(id);
                }
            }
        }

        self.frame_counter += out.len() as u64;
    }

    fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Spawn {
                id,
                frequency,
                gain,
            } => {
                let age = self.frame_counter;
                let evicted = match self.allocate() {
                    Some(generator) => {
                        let stolen = generator.id();
                        generator.start(id, frequency, gain, age);
                        stolen
                    }
                    None => Some(id),
                };
                if let Some(evicted) = evicted {
                    self.released.released(evicted);
                }
            }
            EngineCommand::Ramp {
                id,
                param,
                target,
                seconds,
            } => {
                let samples = self.to_samples(seconds);
                if let Some(generator) = self.find(id) {
                    generator.ramp(param, target, samples);
                }
            }
            EngineCommand::StopAfter { id, seconds } => {
                let samples = self.to_samples(seconds);
                let freed = self.find(id).is_some_and(|generator| {
                    generator.stop_after(samples);
                    generator.is_free()
                });
                if freed {
                    self.released.released(id);
                }
            }
            EngineCommand::CancelStop { id } => {
                if let Some(generator) = self.find(id) {
                    generator.cancel_stop();
                }
            }
            EngineCommand::Stop { id } => {
                if let Some(generator) = self.find(id) {
                    generator.free();
                }
            }
        }
    }

    fn to_samples(&self, seconds: f32) -> u32 {
        (seconds.max(0.0) * self.sample_rate).round() as u32
    }

    fn allocate(&mut self) -> Option<&mut Generator> {
        // First pass: find free slot
        if let Some(idx) = self.generators.iter().position(|g| g.is_free()) {
            return Some(&mut self.generators[idx]);
        }

        // Second pass: steal oldest stopping generator
        let steal_idx = self
            .generators
            .iter()
            .enumerate()
            .filter(|(_, g)| g.state() == GeneratorState::Stopping)
            .min_by_key(|(_, g)| g.age())
            .map(|(idx, _)| idx);

        steal_idx.map(|idx| &mut self.generators[idx])
    }

    fn find(&mut self, id: GeneratorId) -> Option<&mut Generator> {
        self.generators
            .iter_mut()
            .find(|g| g.id() == Some(id) && g.is_live())
    }

    /// Inspect the generator currently bound to `id`.
    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators
            .iter()
            .find(|g| g.id() == Some(id) && g.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.generators.iter().filter(|g| g.is_live()).count()
    }

    pub fn capacity(&self) -> usize {
        self.generators.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::engine::VoiceParam;

    fn mixer(slots: usize) -> Mixer<VecDeque<EngineCommand>, VecDeque<GeneratorId>> {
        Mixer::with_release(1_000.0, slots, VecDeque::new(), VecDeque::new())
    }

    fn spawn(id: u32) -> EngineCommand {
        EngineCommand::Spawn {
            id: GeneratorId(id),
            frequency: 100.0,
            gain: 0.4,
        }
    }

    #[test]
    fn renders_silence_with_no_generators() {
        let mut mixer = mixer(4);
        let mut out = vec![1.0f32; 256];
        mixer.render_block(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn voices_sum_additively() {
        let mut single = mixer(4);
        single.rx.push_back(spawn(1));
        let mut one = vec![0.0f32; 64];
        single.render_block(&mut one);

        let mut double = mixer(4);
        double.rx.push_back(spawn(1));
        double.rx.push_back(spawn(2));
        let mut two = vec![0.0f32; 64];
        double.render_block(&mut two);

        for (a, b) in one.iter().zip(&two) {
            assert!((2.0 * a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn commands_for_unknown_generators_are_ignored() {
        let mut mixer = mixer(2);
        mixer.rx.push_back(EngineCommand::Ramp {
            id: GeneratorId(9),
            param: VoiceParam::Gain,
            target: 0.4,
            seconds: 0.05,
        });
        mixer.rx.push_back(EngineCommand::Stop { id: GeneratorId(9) });
        let mut out = vec![0.0f32; 16];
        mixer.render_block(&mut out);
        assert_eq!(mixer.live_count(), 0);
    }

    #[test]
    fn steals_oldest_stopping_generator_when_full() {
        let mut mixer = mixer(2);
        mixer.rx.push_back(spawn(1));
        mixer.rx.push_back(spawn(2));
        let mut out = vec![0.0f32; 16];
        mixer.render_block(&mut out);

        mixer.rx.push_back(EngineCommand::StopAfter {
            id: GeneratorId(1),
            seconds: 10.0,
        });
        mixer.rx.push_back(spawn(3));
        mixer.render_block(&mut out);

        assert!(mixer.generator(GeneratorId(1)).is_none());
        assert!(mixer.generator(GeneratorId(2)).is_some());
        assert!(mixer.generator(GeneratorId(3)).is_some());
        assert_eq!(mixer.released, [GeneratorId(1)]);
    }

    #[test]
    fn spawn_dropped_when_all_slots_running() {
        let mut mixer = mixer(1);
        mixer.rx.push_back(spawn(1));
        mixer.rx.push_back(spawn(2));
        let mut out = vec![0.0f32; 16];
        mixer.render_block(&mut out);

        assert!(mixer.generator(GeneratorId(1)).is_some());
        assert!(mixer.generator(GeneratorId(2)).is_none());
        assert_eq!(mixer.released, [GeneratorId(2)]);
    }

    #[test]
    fn deferred_stop_reports_release() {
        let mut mixer = mixer(2);
        mixer.rx.push_back(spawn(1));
        mixer.rx.push_back(EngineCommand::StopAfter {
            id: GeneratorId(1),
            seconds: 0.1,
        });
        let mut out = vec![0.0f32; 64];
        mixer.render_block(&mut out);
        assert!(mixer.released.is_empty());

        // 100 samples at 1 kHz
        mixer.render_block(&mut out);
        assert_eq!(mixer.live_count(), 0);
        assert_eq!(mixer.released, [GeneratorId(1)]);
    }

    #[test]
    fn zero_delay_stop_reports_release() {
        let mut mixer = mixer(1);
        mixer.rx.push_back(spawn(4));
        mixer.rx.push_back(EngineCommand::StopAfter {
            id: GeneratorId(4),
            seconds: 0.0,
        });
        mixer.render_block(&mut []);
        assert_eq!(mixer.released, [GeneratorId(4)]);
    }

    #[test]
    fn explicit_stop_is_not_reported() {
        let mut mixer = mixer(1);
        mixer.rx.push_back(spawn(1));
        mixer.rx.push_back(EngineCommand::Stop { id: GeneratorId(1) });
        mixer.render_block(&mut [0.0; 16]);
        assert!(mixer.released.is_empty());
    }

    #[test]
    fn large_blocks_render_in_chunks() {
        let mut mixer = mixer(1);
        mixer.rx.push_back(spawn(1));
        let mut out = vec![0.0f32; MAX_BLOCK_SIZE * 2 + 17];
        mixer.render_block(&mut out);
        assert!(out[MAX_BLOCK_SIZE * 2..].iter().any(|s| s.abs() > 0.1));
    }
}
