//! cpal output stream hosting the mixer.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Stream,
};
use rtrb::{Consumer, PushError, RingBuffer};

use crate::{config::EngineConfig, error::AudioError, MAX_BLOCK_SIZE};

use super::{channel, EngineHandle};

/// Capacity of the audio → UI sample tap.
const SCOPE_CAPACITY: usize = 1024 * 16;

/// A running output stream. Dropping it stops the audio thread and releases
/// every generator it still holds.
pub struct AudioOutput {
    _stream: Stream,
    sample_rate: f32,
    channels: usize,
    scope: Option<Consumer<f32>>,
}

impl AudioOutput {
    /// Open the default output device and start the mixer on it.
    pub fn open(config: &EngineConfig) -> Result<(Self, EngineHandle), AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Device(e.to_string()))?;

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;

        let (handle, mut mixer) = channel(sample_rate, config);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);

        // Buffer reused by audio callback
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &supported.config(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;
                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                        let block = &mut render_buf[..frames_to_render];
                        mixer.render_block(block);

                        // Duplicate mono to all channels
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        // Push to UI tap, drop remainder if full
                        for &s in block.iter() {
                            if let Err(PushError::Full(_)) = scope_tx.push(s) {
                                break;
                            }
                        }

                        frames_written += frames_to_render;
                    }
                },
                |err| tracing::error!(error = %err, "audio stream error"),
                None,
            )
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        tracing::info!(sample_rate, channels, "audio output started");

        Ok((
            Self {
                _stream: stream,
                sample_rate,
                channels,
                scope: Some(scope_rx),
            },
            handle,
        ))
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Take the receiving end of the mixed-sample tap. Only the first call gets it.
    pub fn take_scope(&mut self) -> Option<Consumer<f32>> {
        self.scope.take()
    }
}
