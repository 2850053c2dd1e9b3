use std::time::Duration;

use rtrb::{Consumer, Producer};

use crate::error::AudioError;

use super::{message::EngineCommand, AudioBackend, GeneratorId, VoiceParam};

/// Control-thread side of the engine. Every call enqueues a command for the
/// mixer and returns immediately; ramps and stops run on the audio clock.
pub struct EngineHandle {
    tx: Producer<EngineCommand>,
    released: Consumer<GeneratorId>,
    next_id: u32,
}

impl EngineHandle {
    pub fn new(tx: Producer<EngineCommand>, released: Consumer<GeneratorId>) -> Self {
        Self {
            tx,
            released,
            next_id: 0,
        }
    }

    fn push(&mut self, command: EngineCommand) -> Result<(), AudioError> {
        self.tx.push(command).map_err(|_| AudioError::QueueFull)
    }

    /// Free space left in the command ring.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

impl AudioBackend for EngineHandle {
    fn spawn(&mut self, frequency: f32, gain: f32) -> Result<GeneratorId, AudioError> {
        let id = GeneratorId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.push(EngineCommand::Spawn {
            id,
            frequency,
            gain,
        })?;
        Ok(id)
    }

    fn ramp(
        &mut self,
        id: GeneratorId,
        param: VoiceParam,
        target: f32,
        over: Duration,
    ) -> Result<(), AudioError> {
        self.push(EngineCommand::Ramp {
            id,
            param,
            target,
            seconds: over.as_secs_f32(),
        })
    }

    fn stop_after(&mut self, id: GeneratorId, delay: Duration) -> Result<(), AudioError> {
        self.push(EngineCommand::StopAfter {
            id,
            seconds: delay.as_secs_f32(),
        })
    }

    fn cancel_stop(&mut self, id: GeneratorId) -> Result<(), AudioError> {
        self.push(EngineCommand::CancelStop { id })
    }

    fn stop(&mut self, id: GeneratorId) -> Result<(), AudioError> {
        self.push(EngineCommand::Stop { id })
    }

    fn poll_released(&mut self) -> Option<GeneratorId> {
        self.released.pop().ok()
    }
}

#[cfg(test)]
mod tests {
    use rtrb::RingBuffer;

    use super::*;

    fn connected(capacity: usize) -> (EngineHandle, Consumer<EngineCommand>) {
        let (tx, rx) = RingBuffer::new(capacity);
        let (_, released) = RingBuffer::new(1);
        (EngineHandle::new(tx, released), rx)
    }

    #[test]
    fn spawn_allocates_distinct_ids() {
        let (mut handle, mut rx) = connected(8);

        let a = handle.spawn(440.0, 0.0).unwrap();
        let b = handle.spawn(440.0, 0.0).unwrap();
        assert_ne!(a, b);
        assert!(matches!(rx.pop(), Ok(EngineCommand::Spawn { id, .. }) if id == a));
    }

    #[test]
    fn full_queue_reports_error() {
        let (mut handle, _rx) = connected(1);

        handle.stop(GeneratorId(0)).unwrap();
        assert!(matches!(
            handle.stop(GeneratorId(1)),
            Err(AudioError::QueueFull)
        ));
    }

    #[test]
    fn durations_travel_as_seconds() {
        let (mut handle, mut rx) = connected(4);

        handle
            .stop_after(GeneratorId(3), Duration::from_millis(150))
            .unwrap();
        match rx.pop() {
            Ok(EngineCommand::StopAfter { id, seconds }) => {
                assert_eq!(id, GeneratorId(3));
                assert!((seconds - 0.15).abs() < 1e-6);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn released_ids_are_polled_in_order() {
        let (tx, _rx) = RingBuffer::new(1);
        let (mut released_tx, released) = RingBuffer::new(4);
        let mut handle = EngineHandle::new(tx, released);

        assert_eq!(handle.poll_released(), None);
        released_tx.push(GeneratorId(2)).unwrap();
        released_tx.push(GeneratorId(5)).unwrap();
        assert_eq!(handle.poll_released(), Some(GeneratorId(2)));
        assert_eq!(handle.poll_released(), Some(GeneratorId(5)));
        assert_eq!(handle.poll_released(), None);
    }
}
