use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use super::{GeneratorId, VoiceParam};

/// Control → audio thread commands. Durations travel as seconds; the mixer
/// converts them with its own sample rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EngineCommand {
    Spawn {
        id: GeneratorId,
        frequency: f32,
        gain: f32,
    },
    Ramp {
        id: GeneratorId,
        param: VoiceParam,
        target: f32,
        seconds: f32,
    },
    StopAfter {
        id: GeneratorId,
        seconds: f32,
    },
    CancelStop {
        id: GeneratorId,
    },
    Stop {
        id: GeneratorId,
    },
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<EngineCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        Consumer::pop(self).ok()
    }
}

impl CommandReceiver for VecDeque<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        self.pop_front()
    }
}

/// Audio → control notices for generators the mixer freed on its own: a
/// deferred stop that fired, a stolen slot, or a spawn with no slot left.
pub trait ReleaseSender {
    fn released(&mut self, id: GeneratorId);
}

/// Discards notices, for mixers nobody listens to.
impl ReleaseSender for () {
    fn released(&mut self, _: GeneratorId) {}
}

#[cfg(feature = "rtrb")]
impl ReleaseSender for Producer<GeneratorId> {
    fn released(&mut self, id: GeneratorId) {
        // a full ring drops the notice; the control side reaps by time anyway
        let _ = self.push(id);
    }
}

impl ReleaseSender for VecDeque<GeneratorId> {
    fn released(&mut self, id: GeneratorId) {
        self.push_back(id);
    }
}
