//! Audio backend glue: device output, transport, settings, pipeline

pub mod backend;
pub mod buffer;
pub mod pipeline;
pub mod settings;

pub use backend::{open_output, AudioBackend, AudioDeviceInfo, AudioError};
pub use buffer::{SampleConsumer, SampleProducer, SampleRingBuffer};
pub use pipeline::AudioPipeline;
pub use settings::{AudioSettings, SettingsHandle};
