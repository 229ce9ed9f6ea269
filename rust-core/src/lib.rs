//! Block-based frequency-domain FIR filtering for streaming audio
//!
//! Designs windowed-sinc low-/high-pass kernels, transforms them once into
//! a frequency response, and filters a continuous sample stream block by
//! block with overlap-add convolution. The `audio` module provides the
//! backend glue: device output, settings snapshots, and filter lifecycle.

pub mod audio;
pub mod filters;
pub mod spectral;

pub use filters::{design_kernel, FirFilter, TransitionBandwidth};
pub use spectral::{perform_fft, perform_ifft, to_power_of_two};
