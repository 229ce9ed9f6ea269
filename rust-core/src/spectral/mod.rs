//! Spectral utilities: radix-2 transforms and window functions

pub mod fft;
pub mod windows;

pub use fft::{perform_fft, perform_ifft, to_power_of_two};
pub use windows::{window_blackman, window_hamming, window_tukey};
