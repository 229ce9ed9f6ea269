//! Audio output backend behind an explicit factory
//!
//! `open_output` returns an owned, polymorphic backend handle; there is no
//! global instance. The cpal implementation owns the device stream and the
//! producer half of a ring buffer, and its callback drains the consumer
//! half, applying the master volume and the feedback-delay reverb from the
//! latest settings snapshot.

use super::buffer::{SampleConsumer, SampleProducer, SampleRingBuffer};
use super::settings::{AudioSettings, SettingsHandle};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Failed to get device name: {0}")]
    DeviceName(String),

    #[error("Failed to get default config: {0}")]
    DefaultConfig(String),

    #[error("Failed to build stream: {0}")]
    BuildStream(String),

    #[error("Failed to play stream: {0}")]
    PlayStream(String),
}

/// Negotiated properties of an opened output device.
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Capability handle over a native audio output.
///
/// Callers own the handle and control its lifetime; dropping it closes the
/// device.
pub trait AudioBackend {
    fn device_info(&self) -> &AudioDeviceInfo;

    fn start(&self) -> Result<(), AudioError>;

    fn pause(&self) -> Result<(), AudioError>;

    /// Queue filtered samples for playback, returning how many fit in the
    /// transport buffer.
    fn queue(&mut self, samples: &[f64]) -> usize;
}

/// Open the default output device.
///
/// # Arguments
/// * `settings` - Shared settings consumed by the device callback
/// * `capacity` - Transport ring buffer capacity in samples
pub fn open_output(
    settings: &SettingsHandle,
    capacity: usize,
) -> Result<Box<dyn AudioBackend>, AudioError> {
    let backend = CpalBackend::from_default_device(settings.clone(), capacity)?;
    Ok(Box::new(backend))
}

/// Feedback delay line for the reverb effect: `y[n] = x[n] + decay * y[n - D]`.
struct ReverbLine {
    buffer: Vec<f64>,
    pos: usize,
    decay: f64,
}

impl ReverbLine {
    fn from_settings(settings: &AudioSettings, sample_rate: u32) -> Self {
        let delay_samples = (settings.reverb_delay * sample_rate as f64) as usize;
        Self {
            buffer: vec![0.0; delay_samples],
            pos: 0,
            decay: settings.reverb_decay,
        }
    }

    fn process(&mut self, sample: f64) -> f64 {
        if self.buffer.is_empty() {
            return sample;
        }
        let wet = sample + self.buffer[self.pos] * self.decay;
        self.buffer[self.pos] = wet;
        self.pos = (self.pos + 1) % self.buffer.len();
        wet
    }
}

/// cpal-backed output stream.
struct CpalBackend {
    stream: Stream,
    device_info: AudioDeviceInfo,
    producer: SampleProducer,
}

impl CpalBackend {
    fn from_default_device(settings: SettingsHandle, capacity: usize) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        Self::from_device(device, settings, capacity)
    }

    fn from_device(
        device: Device,
        settings: SettingsHandle,
        capacity: usize,
    ) -> Result<Self, AudioError> {
        let name = device
            .name()
            .map_err(|e| AudioError::DeviceName(e.to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DefaultConfig(e.to_string()))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        let device_info = AudioDeviceInfo {
            name,
            sample_rate,
            channels,
        };

        let (producer, consumer) = SampleRingBuffer::with_capacity(capacity).split();
        let stream_config: StreamConfig = config.into();

        let stream = device
            .build_output_stream(
                &stream_config,
                output_callback(consumer, settings, sample_rate),
                move |err| {
                    log::error!("audio output stream error: {err}");
                },
                None,
            )
            .map_err(|e| AudioError::BuildStream(e.to_string()))?;

        log::info!(
            "opened audio output '{}' at {} Hz, {} channel(s)",
            device_info.name,
            device_info.sample_rate,
            device_info.channels
        );

        Ok(Self {
            stream,
            device_info,
            producer,
        })
    }
}

/// Build the device callback closure. All mutable state (consumer half,
/// cached settings, reverb line, scratch buffer) moves into the closure;
/// the settings snapshot is re-read only when its generation moved.
fn output_callback(
    mut consumer: SampleConsumer,
    settings: SettingsHandle,
    sample_rate: u32,
) -> impl FnMut(&mut [f32], &cpal::OutputCallbackInfo) {
    let mut cached = settings.snapshot();
    let mut reverb = ReverbLine::from_settings(&cached, sample_rate);
    let mut scratch: Vec<f64> = Vec::new();

    move |data: &mut [f32], _| {
        if let Some(next) = settings.snapshot_if_newer(cached.generation) {
            if next.reverb_delay != cached.reverb_delay {
                reverb = ReverbLine::from_settings(&next, sample_rate);
            }
            reverb.decay = next.reverb_decay;
            cached = next;
        }

        scratch.resize(data.len(), 0.0);
        let read = consumer.read(&mut scratch);

        for (out, &sample) in data.iter_mut().zip(scratch[..read].iter()) {
            *out = reverb.process(sample * cached.master_volume) as f32;
        }

        // Underrun: pad with silence
        for out in data[read..].iter_mut() {
            *out = 0.0;
        }
    }
}

impl AudioBackend for CpalBackend {
    fn device_info(&self) -> &AudioDeviceInfo {
        &self.device_info
    }

    fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    fn queue(&mut self, samples: &[f64]) -> usize {
        self.producer.write(samples)
    }
}
