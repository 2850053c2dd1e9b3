//! Error types for the theremin pipeline.

use thiserror::Error;

/// Failures raised by the audio side: opening the output or talking to a generator.
///
/// Every voice operation is best-effort, so callers log these and keep going.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No output device could be found on the default host.
    #[error("no default output device available")]
    NoOutputDevice,

    /// The output device rejected a query or configuration.
    #[error("audio device error: {0}")]
    Device(String),

    /// The output stream could not be built or started.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// The command ring to the audio thread is full; the command was dropped.
    #[error("audio command queue is full")]
    QueueFull,
}

/// Malformed detector output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// A hand arrived with the wrong number of landmarks.
    #[error("hand {hand} has {found} landmarks, expected {expected}")]
    MalformedHand {
        hand: usize,
        expected: usize,
        found: usize,
    },
}
