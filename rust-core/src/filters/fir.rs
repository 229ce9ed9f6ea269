//! Streaming FIR filter using frequency-domain overlap-add convolution
//!
//! Convolution in the time domain is multiplication in the frequency
//! domain: each input block is zero-padded, transformed, multiplied by the
//! precomputed frequency response of the kernel, and transformed back. The
//! convolution tail of every block spills past the block boundary, so a
//! ring of result buffers carries those tails forward and adds them onto
//! later blocks.

use super::design::{design_kernel, TransitionBandwidth};
use crate::spectral::{perform_fft, perform_ifft, to_power_of_two, window_tukey};
use num_complex::Complex64;

/// Stateful overlap-add FIR filter over a stream of complex samples.
///
/// The frequency response is computed once at construction and never
/// mutated. Configuration changes require constructing a new filter; the
/// ring state is owned exclusively by the instance and callers must
/// serialize `apply` invocations.
pub struct FirFilter {
    /// Kernel transformed to the frequency domain, length `padded_len`
    frequency_response: Vec<Complex64>,

    /// Ring of time-domain result buffers, `depth` entries of `padded_len`
    overlap_ring: Vec<Vec<Complex64>>,

    /// Index of the ring buffer used for the next block
    cursor: usize,

    /// New input samples consumed per block (B)
    block_size: usize,

    /// Impulse response length (L)
    kernel_len: usize,

    /// Linear convolution length of one block: N = L + B - 1
    conv_len: usize,

    /// Transform length: next power of two >= N
    padded_len: usize,

    /// Ring depth: ceil(padded_len / B)
    depth: usize,
}

impl FirFilter {
    /// Design a kernel for the given configuration and build a filter
    /// around it.
    ///
    /// # Arguments
    /// * `sampling_rate` - Stream sampling rate in Hz
    /// * `cutoff_hz` - Cutoff frequency (must be below Nyquist)
    /// * `transition` - Transition bandwidth class
    /// * `high_pass` - Reject below the cutoff instead of above it
    /// * `block_size` - Input samples consumed per block (B)
    pub fn new(
        sampling_rate: u32,
        cutoff_hz: f64,
        transition: TransitionBandwidth,
        high_pass: bool,
        block_size: usize,
    ) -> Self {
        Self::with_kernel(
            design_kernel(sampling_rate, cutoff_hz, transition, high_pass),
            block_size,
        )
    }

    /// Build a filter around an externally designed impulse response.
    pub fn with_kernel(kernel: Vec<Complex64>, block_size: usize) -> Self {
        let kernel_len = kernel.len();
        let conv_len = kernel_len + block_size - 1;
        let padded_len = to_power_of_two(conv_len);
        let depth = padded_len.div_ceil(block_size);

        let mut frequency_response = kernel;
        frequency_response.resize(padded_len, Complex64::new(0.0, 0.0));
        perform_fft(&mut frequency_response);

        Self {
            frequency_response,
            overlap_ring: vec![vec![Complex64::new(0.0, 0.0); padded_len]; depth],
            cursor: 0,
            block_size,
            kernel_len,
            conv_len,
            padded_len,
            depth,
        }
    }

    /// Filter `samples` in place, one block of `block_size` samples at a
    /// time.
    ///
    /// A trailing partial block is left untouched; this is a documented
    /// boundary condition, not an error. Calling with a different block
    /// size than the one configured at construction is an unchecked
    /// precondition violation.
    pub fn apply(&mut self, samples: &mut [Complex64]) {
        let b = self.block_size;

        for block in samples.chunks_exact_mut(b) {
            // Zero-padded, edge-shaped copy of the block in the current
            // ring slot
            let current = &mut self.overlap_ring[self.cursor];
            current[..b].copy_from_slice(block);
            current[b..].fill(Complex64::new(0.0, 0.0));
            window_tukey(&mut current[..b]);

            // Convolve with the kernel in the frequency domain
            perform_fft(current);
            for (bin, response) in current.iter_mut().zip(self.frequency_response.iter()) {
                *bin *= *response;
            }
            perform_ifft(current);

            // This block's own contribution
            block.copy_from_slice(&self.overlap_ring[self.cursor][..b]);

            // Tails carried over from earlier blocks: the buffer used
            // `age` blocks ago contributes its samples [age*B, age*B+B)
            // of the convolution result onto the start of this block.
            for age in 1..self.depth {
                let start = age * b;
                if start >= self.conv_len {
                    break;
                }
                let end = (start + b).min(self.conv_len);
                let older = &self.overlap_ring[(self.cursor + age) % self.depth];
                for (out, tail) in block.iter_mut().zip(older[start..end].iter()) {
                    *out += *tail;
                }
            }

            // Cursor walks backward through the ring, wrapping 0 -> depth-1
            self.cursor = if self.cursor == 0 {
                self.depth - 1
            } else {
                self.cursor - 1
            };
        }
    }

    /// Precomputed frequency response of the kernel.
    pub fn frequency_response(&self) -> &[Complex64] {
        &self.frequency_response
    }

    /// Number of input samples consumed per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Impulse response length in taps.
    pub fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    /// Number of ring buffers retained for overlap-add tails.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Transform length used for every block.
    pub fn padded_len(&self) -> usize {
        self.padded_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, sampling_rate: f64, n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| {
                let phase = 2.0 * PI * freq * i as f64 / sampling_rate;
                Complex64::new(phase.sin(), 0.0)
            })
            .collect()
    }

    fn direct_convolve(signal: &[Complex64], kernel: &[Complex64]) -> Vec<Complex64> {
        let mut out = vec![Complex64::new(0.0, 0.0); signal.len() + kernel.len() - 1];
        for (i, &x) in signal.iter().enumerate() {
            for (j, &h) in kernel.iter().enumerate() {
                out[i + j] += x * h;
            }
        }
        out
    }

    /// Reference for the streaming path: the filter shapes every input
    /// block with the Tukey window before convolving, so the expected
    /// output is the direct convolution of the block-windowed signal.
    fn windowed_reference(signal: &[Complex64], kernel: &[Complex64], block_size: usize) -> Vec<Complex64> {
        let mut shaped = signal.to_vec();
        for block in shaped.chunks_exact_mut(block_size) {
            window_tukey(block);
        }
        direct_convolve(&shaped, kernel)
    }

    fn test_kernel(len: usize) -> Vec<Complex64> {
        // Symmetric, unity-gain smoothing kernel
        let mut kernel: Vec<Complex64> = (0..len)
            .map(|i| {
                let k = i as f64 - (len - 1) as f64 / 2.0;
                Complex64::new((-0.5 * k * k / 4.0).exp(), 0.0)
            })
            .collect();
        let sum: f64 = kernel.iter().map(|c| c.re).sum();
        for tap in kernel.iter_mut() {
            *tap /= sum;
        }
        kernel
    }

    fn peak_amplitude(samples: &[Complex64]) -> f64 {
        samples.iter().map(|c| c.re.abs()).fold(0.0, f64::max)
    }

    #[test]
    fn test_overlap_add_matches_direct_convolution() {
        let kernel = test_kernel(9);

        // Block sizes below, equal to, and above the kernel length
        for block_size in [4, 9, 32] {
            let signal = tone(440.0, 8000.0, block_size * 12);
            let reference = windowed_reference(&signal, &kernel, block_size);

            let mut filtered = signal.clone();
            let mut filter = FirFilter::with_kernel(kernel.clone(), block_size);
            filter.apply(&mut filtered);

            for (i, (got, want)) in filtered.iter().zip(reference.iter()).enumerate() {
                assert!(
                    (got - want).norm() < 1e-9,
                    "B={} mismatch at {}: {} vs {}",
                    block_size,
                    i,
                    got,
                    want
                );
            }
        }
    }

    #[test]
    fn test_state_carries_across_apply_calls() {
        let kernel = test_kernel(9);
        let block_size = 16;
        let signal = tone(440.0, 8000.0, block_size * 8);
        let reference = windowed_reference(&signal, &kernel, block_size);

        let mut filtered = signal.clone();
        let mut filter = FirFilter::with_kernel(kernel, block_size);

        // Same stream split over three calls of unequal block counts
        let (head, tail) = filtered.split_at_mut(block_size * 3);
        filter.apply(head);
        let (mid, last) = tail.split_at_mut(block_size);
        filter.apply(mid);
        filter.apply(last);

        for (i, (got, want)) in filtered.iter().zip(reference.iter()).enumerate() {
            assert!(
                (got - want).norm() < 1e-9,
                "mismatch at {}: {} vs {}",
                i,
                got,
                want
            );
        }
    }

    #[test]
    fn test_partial_trailing_block_is_left_untouched() {
        let block_size = 32;
        let mut filter = FirFilter::with_kernel(test_kernel(9), block_size);

        let signal = tone(440.0, 8000.0, block_size * 2 + 17);
        let mut buffer = signal.clone();
        filter.apply(&mut buffer);

        // The 17 trailing samples never entered the filter
        assert_eq!(&buffer[block_size * 2..], &signal[block_size * 2..]);

        // Complete blocks were processed
        assert_ne!(&buffer[..block_size * 2], &signal[..block_size * 2]);

        // State stays aligned: further full blocks still filter cleanly
        let mut next = tone(440.0, 8000.0, block_size);
        filter.apply(&mut next);
        assert!(peak_amplitude(&next) < 2.0);
    }

    #[test]
    fn test_idempotent_construction() {
        let make = || FirFilter::new(48000, 4000.0, TransitionBandwidth::Wide, false, 512);
        let mut first = make();
        let mut second = make();

        assert_eq!(first.frequency_response(), second.frequency_response());
        assert_eq!(first.depth(), second.depth());

        let signal = tone(1000.0, 48000.0, 512 * 4);
        let mut a = signal.clone();
        let mut b = signal;
        first.apply(&mut a);
        second.apply(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_lowpass_passband_and_stopband() {
        let sampling_rate = 48000;
        let block_size = 512;
        let blocks = 8;

        let mut filter = FirFilter::new(
            sampling_rate,
            4000.0,
            TransitionBandwidth::Wide,
            false,
            block_size,
        );

        // Tone well inside the pass band keeps its amplitude (< 1 dB)
        let mut passband = tone(1000.0, sampling_rate as f64, block_size * blocks);
        filter.apply(&mut passband);
        let peak = peak_amplitude(&passband[block_size * 2..]);
        assert!(peak > 0.891 && peak < 1.122, "passband peak {}", peak);

        // Tone well inside the stop band is attenuated by > 40 dB
        let mut filter = FirFilter::new(
            sampling_rate,
            4000.0,
            TransitionBandwidth::Wide,
            false,
            block_size,
        );
        let mut stopband = tone(12000.0, sampling_rate as f64, block_size * blocks);
        filter.apply(&mut stopband);
        let peak = peak_amplitude(&stopband[block_size * 2..]);
        assert!(peak < 0.01, "stopband peak {}", peak);
    }

    #[test]
    fn test_highpass_passband_and_stopband() {
        let sampling_rate = 48000;
        let block_size = 512;
        let blocks = 8;

        let mut filter = FirFilter::new(
            sampling_rate,
            4000.0,
            TransitionBandwidth::Wide,
            true,
            block_size,
        );
        let mut passband = tone(12000.0, sampling_rate as f64, block_size * blocks);
        filter.apply(&mut passband);
        let peak = peak_amplitude(&passband[block_size * 2..]);
        assert!(peak > 0.891 && peak < 1.122, "passband peak {}", peak);

        let mut filter = FirFilter::new(
            sampling_rate,
            4000.0,
            TransitionBandwidth::Wide,
            true,
            block_size,
        );
        let mut stopband = tone(500.0, sampling_rate as f64, block_size * blocks);
        filter.apply(&mut stopband);
        let peak = peak_amplitude(&stopband[block_size * 2..]);
        assert!(peak < 0.01, "stopband peak {}", peak);
    }

    #[test]
    fn test_ring_geometry() {
        // L = 65, B = 512: N = 576, padded to 1024, two ring buffers
        let filter = FirFilter::new(48000, 4000.0, TransitionBandwidth::Wide, false, 512);
        assert_eq!(filter.kernel_len(), 65);
        assert_eq!(filter.padded_len(), 1024);
        assert_eq!(filter.depth(), 2);
        assert_eq!(filter.frequency_response().len(), 1024);

        // Kernel longer than the block: depth grows to cover the tail
        let filter = FirFilter::new(48000, 4000.0, TransitionBandwidth::Narrow, false, 64);
        assert_eq!(filter.kernel_len(), 257);
        assert_eq!(filter.padded_len(), 512);
        assert_eq!(filter.depth(), 8);
    }
}
