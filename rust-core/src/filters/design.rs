//! FIR kernel design using the windowed-sinc method

use crate::spectral::window_blackman;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Transition bandwidth class of a designed kernel.
///
/// A narrower transition band needs a longer kernel: tap count follows the
/// standard approximation `L ~= 4 * sampling_rate / bandwidth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionBandwidth {
    /// 750 Hz transition band
    Narrow,
    /// 1500 Hz transition band
    Medium,
    /// 3000 Hz transition band
    Wide,
}

impl TransitionBandwidth {
    /// Width of the transition band in Hz.
    pub fn hertz(self) -> f64 {
        match self {
            TransitionBandwidth::Narrow => 750.0,
            TransitionBandwidth::Medium => 1500.0,
            TransitionBandwidth::Wide => 3000.0,
        }
    }

    /// Kernel length for this bandwidth at the given sampling rate, forced
    /// odd so the kernel is symmetric about a center tap (linear phase).
    pub fn kernel_length(self, sampling_rate: u32) -> usize {
        let taps = (4.0 * sampling_rate as f64 / self.hertz()).ceil() as usize;
        if taps % 2 == 0 {
            taps + 1
        } else {
            taps
        }
    }
}

/// Design a windowed-sinc impulse response.
///
/// Generates the ideal sinc response for `cutoff_hz`, tapers it with a
/// Blackman window, and normalizes the taps to unity gain at DC. If
/// `high_pass` is set the low-pass kernel is spectrally inverted (all taps
/// negated, a unit impulse added at the center tap).
///
/// `cutoff_hz` below the Nyquist frequency is an unchecked caller
/// precondition; kernel quality outside that range is undefined.
pub fn design_kernel(
    sampling_rate: u32,
    cutoff_hz: f64,
    transition: TransitionBandwidth,
    high_pass: bool,
) -> Vec<Complex64> {
    let length = transition.kernel_length(sampling_rate);
    let center = (length - 1) / 2;
    let wc = 2.0 * PI * cutoff_hz / sampling_rate as f64;

    let mut kernel: Vec<Complex64> = (0..length)
        .map(|i| {
            let k = i as f64 - center as f64;
            let tap = if i == center {
                wc / PI
            } else {
                (wc * k).sin() / (PI * k)
            };
            Complex64::new(tap, 0.0)
        })
        .collect();

    window_blackman(&mut kernel);

    let dc_gain: f64 = kernel.iter().map(|tap| tap.re).sum();
    for tap in kernel.iter_mut() {
        *tap /= dc_gain;
    }

    if high_pass {
        for tap in kernel.iter_mut() {
            *tap = -*tap;
        }
        kernel[center] += 1.0;
    }

    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_length_is_odd_and_tracks_bandwidth() {
        let narrow = TransitionBandwidth::Narrow.kernel_length(48000);
        let medium = TransitionBandwidth::Medium.kernel_length(48000);
        let wide = TransitionBandwidth::Wide.kernel_length(48000);

        assert_eq!(narrow, 257);
        assert_eq!(medium, 129);
        assert_eq!(wide, 65);

        assert!(narrow > medium && medium > wide);
        for length in [narrow, medium, wide] {
            assert_eq!(length % 2, 1);
        }
    }

    #[test]
    fn test_kernel_symmetry() {
        for high_pass in [false, true] {
            let kernel = design_kernel(48000, 4000.0, TransitionBandwidth::Medium, high_pass);
            let length = kernel.len();
            for i in 0..length / 2 {
                let diff = (kernel[i].re - kernel[length - 1 - i].re).abs();
                assert!(
                    diff < 1e-12,
                    "high_pass={} asymmetric at tap {}: {} vs {}",
                    high_pass,
                    i,
                    kernel[i].re,
                    kernel[length - 1 - i].re
                );
            }
        }
    }

    #[test]
    fn test_lowpass_unity_dc_gain() {
        let kernel = design_kernel(48000, 4000.0, TransitionBandwidth::Wide, false);
        let sum: f64 = kernel.iter().map(|tap| tap.re).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_highpass_rejects_dc() {
        let kernel = design_kernel(48000, 4000.0, TransitionBandwidth::Wide, true);
        let sum: f64 = kernel.iter().map(|tap| tap.re).sum();
        assert!(sum.abs() < 1e-12);
    }

    #[test]
    fn test_kernel_taps_are_real() {
        let kernel = design_kernel(44100, 2000.0, TransitionBandwidth::Medium, false);
        for tap in &kernel {
            assert_eq!(tap.im, 0.0);
        }
    }
}
