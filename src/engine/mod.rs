//! The audio subsystem behind the voices.
//!
//! The control side talks to it through [`AudioBackend`]: spawn a generator,
//! ramp its parameters, schedule or cancel its stop. [`EngineHandle`] is the
//! realtime implementation: it forwards each call as an [`EngineCommand`]
//! over a lock-free ring to the [`Mixer`], which renders on the audio thread.
//! Calls never wait for the audio side; later ramps supersede earlier ones.
//!
//! The mixer may free a generator the control side still counts on: a
//! deferred stop that fires first, or a slot stolen for a newer spawn. Those
//! ids come back over a second ring and surface as
//! [`AudioBackend::poll_released`].

pub mod generator;
#[cfg(feature = "rtrb")]
pub mod handle;
pub mod message;
pub mod mixer;
#[cfg(feature = "rtrb")]
pub mod output;

use std::{fmt, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AudioError;

pub use generator::{Generator, GeneratorState};
#[cfg(feature = "rtrb")]
pub use handle::EngineHandle;
pub use message::{CommandReceiver, EngineCommand, ReleaseSender};
pub use mixer::Mixer;
#[cfg(feature = "rtrb")]
pub use output::AudioOutput;

/// Identifies one generator on the audio side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneratorId(pub u32);

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters that can be ramped on a generator
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceParam {
    /// Oscillator frequency in Hz
    Frequency,
    /// Linear output gain
    Gain,
}

/// Operations the voice layer needs from an audio subsystem.
///
/// All of them are fire-and-forget: success means the request was accepted,
/// not that a ramp has finished.
pub trait AudioBackend {
    /// Create a sine generator connected to the shared output.
    fn spawn(&mut self, frequency: f32, gain: f32) -> Result<GeneratorId, AudioError>;

    /// Move `param` exponentially toward `target` over `over`.
    fn ramp(
        &mut self,
        id: GeneratorId,
        param: VoiceParam,
        target: f32,
        over: Duration,
    ) -> Result<(), AudioError>;

    /// Stop and release the generator once `delay` has elapsed.
    fn stop_after(&mut self, id: GeneratorId, delay: Duration) -> Result<(), AudioError>;

    /// Withdraw a pending `stop_after`.
    fn cancel_stop(&mut self, id: GeneratorId) -> Result<(), AudioError>;

    /// Stop and release the generator now.
    fn stop(&mut self, id: GeneratorId) -> Result<(), AudioError>;

    /// Next generator the audio side released on its own, if any.
    fn poll_released(&mut self) -> Option<GeneratorId> {
        None
    }
}

/// Allow boxed backends to be used as backends (for dynamic dispatch)
impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn spawn(&mut self, frequency: f32, gain: f32) -> Result<GeneratorId, AudioError> {
        (**self).spawn(frequency, gain)
    }

    fn ramp(
        &mut self,
        id: GeneratorId,
        param: VoiceParam,
        target: f32,
        over: Duration,
    ) -> Result<(), AudioError> {
        (**self).ramp(id, param, target, over)
    }

    fn stop_after(&mut self, id: GeneratorId, delay: Duration) -> Result<(), AudioError> {
        (**self).stop_after(id, delay)
    }

    fn cancel_stop(&mut self, id: GeneratorId) -> Result<(), AudioError> {
        (**self).cancel_stop(id)
    }

    fn stop(&mut self, id: GeneratorId) -> Result<(), AudioError> {
        (**self).stop(id)
    }

    fn poll_released(&mut self) -> Option<GeneratorId> {
        (**self).poll_released()
    }
}

/// The mixer half of [`channel`].
#[cfg(feature = "rtrb")]
pub type RealtimeMixer = Mixer<rtrb::Consumer<EngineCommand>, rtrb::Producer<GeneratorId>>;

/// Build a connected handle/mixer pair without opening a device.
///
/// The mixer goes to whatever drives the audio clock: a cpal callback, or a
/// test rendering blocks by hand.
#[cfg(feature = "rtrb")]
pub fn channel(
    sample_rate: f32,
    config: &crate::config::EngineConfig,
) -> (EngineHandle, RealtimeMixer) {
    let capacity = config.command_capacity.max(1);
    let (tx, rx) = rtrb::RingBuffer::new(capacity);
    let (released_tx, released_rx) = rtrb::RingBuffer::new(capacity);
    (
        EngineHandle::new(tx, released_rx),
        Mixer::with_release(sample_rate, config.max_generators, rx, released_tx),
    )
}
