//! In-place radix-2 Cooley-Tukey FFT/IFFT
//!
//! Iterative decimation-in-time with bit-reversal permutation.
//! Buffer length must be a power of two; callers zero-pad up to
//! `to_power_of_two` before transforming.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Smallest power of two >= `n`. Returns `n` unchanged if it already
/// is a power of two.
pub fn to_power_of_two(n: usize) -> usize {
    n.next_power_of_two()
}

/// Forward DFT of `samples`, computed in place.
///
/// # Arguments
/// * `samples` - Complex buffer whose length is a power of two
pub fn perform_fft(samples: &mut [Complex64]) {
    transform(samples, false);
}

/// Inverse DFT of `samples`, computed in place, including the 1/N
/// normalization.
///
/// # Arguments
/// * `samples` - Complex buffer whose length is a power of two
pub fn perform_ifft(samples: &mut [Complex64]) {
    transform(samples, true);
}

fn transform(samples: &mut [Complex64], inverse: bool) {
    let n = samples.len();
    debug_assert!(n.is_power_of_two(), "transform length must be a power of two");
    if n <= 1 {
        return;
    }

    bit_reverse_permute(samples);

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut len = 2;
    while len <= n {
        let step = Complex64::from_polar(1.0, sign * 2.0 * PI / len as f64);
        for chunk in samples.chunks_exact_mut(len) {
            let (lower, upper) = chunk.split_at_mut(len / 2);
            let mut w = Complex64::new(1.0, 0.0);
            for (a, b) in lower.iter_mut().zip(upper.iter_mut()) {
                let t = *b * w;
                *b = *a - t;
                *a += t;
                w *= step;
            }
        }
        len <<= 1;
    }

    if inverse {
        let scale = 1.0 / n as f64;
        for sample in samples.iter_mut() {
            *sample *= scale;
        }
    }
}

/// Reorder `samples` so that each element ends up at the index given by
/// reversing the bits of its original index.
fn bit_reverse_permute(samples: &mut [Complex64]) {
    let n = samples.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            samples.swap(i, j);
        }
    }
}
