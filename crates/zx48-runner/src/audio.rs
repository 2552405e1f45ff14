//! Fixed-rate audio output.
//!
//! The cpal output callback is the machine's sample-rate consumer: each
//! tick it takes the current ring sample and converts it for the host
//! device. Drain throttling lives in the ring itself.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use emu_zx48::SoundRing;
use emu_zx48::audio::SAMPLE_RATE;

/// Comfortable output volume.
const AMPLITUDE: f32 = 0.5;

/// Running output stream tied to a machine's sample ring.
pub struct AudioOutput {
    _stream: Stream,
}

impl AudioOutput {
    /// Start the output stream.
    ///
    /// Returns `None` if no audio device is available; the caller runs
    /// silent in that case.
    #[must_use]
    pub fn new(ring: Arc<SoundRing>) -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;

        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for sample in data.iter_mut() {
                        // Samples are 0-127 unsigned; centre them.
                        let level = f32::from(ring.drain_tick()) / 127.0;
                        *sample = (level * 2.0 - 1.0) * AMPLITUDE;
                    }
                },
                |err| eprintln!("Audio stream error: {err}"),
                None,
            )
            .ok()?;

        stream.play().ok()?;

        Some(Self { _stream: stream })
    }
}
