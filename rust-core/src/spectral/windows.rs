//! Window functions applied in place to complex sample buffers
//!
//! Windowing tapers a finite segment toward zero at its edges so it can be
//! treated as one period of a periodic signal without spectral leakage from
//! the cut points. The streaming filter shapes every input block with the
//! Tukey window before transforming; the Blackman window tapers designed
//! filter kernels.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Fraction of the Tukey window spent in the two cosine tapers.
const TUKEY_ALPHA: f64 = 0.5;

/// Tukey (tapered cosine) window: cosine ramps over the first and last
/// `TUKEY_ALPHA / 2` of the buffer, flat at 1.0 in between.
pub fn window_tukey(samples: &mut [Complex64]) {
    let n = samples.len();
    if n < 2 {
        return;
    }

    let span = TUKEY_ALPHA * (n - 1) as f64;
    let taper = (span / 2.0).floor() as usize;
    for i in 0..=taper {
        let w = 0.5 * (1.0 + (PI * (2.0 * i as f64 / span - 1.0)).cos());
        samples[i] *= w;
        samples[n - 1 - i] *= w;
    }
}

/// Hamming window: `0.54 - 0.46*cos(2*pi*i/(N-1))`.
pub fn window_hamming(samples: &mut [Complex64]) {
    let n = samples.len();
    if n < 2 {
        return;
    }

    for (i, sample) in samples.iter_mut().enumerate() {
        let angle = 2.0 * PI * i as f64 / (n - 1) as f64;
        *sample *= 0.54 - 0.46 * angle.cos();
    }
}

/// Blackman window: `0.42 - 0.5*cos(2*pi*i/(N-1)) + 0.08*cos(4*pi*i/(N-1))`.
pub fn window_blackman(samples: &mut [Complex64]) {
    let n = samples.len();
    if n < 2 {
        return;
    }

    for (i, sample) in samples.iter_mut().enumerate() {
        let angle = 2.0 * PI * i as f64 / (n - 1) as f64;
        *sample *= 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos();
    }
}
