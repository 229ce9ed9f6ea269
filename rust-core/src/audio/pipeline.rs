//! Filter ownership and settings-driven reconfiguration
//!
//! The pipeline owns the filter instances and is the single caller of
//! `FirFilter::apply`, which keeps the mutable ring state on one thread.
//! Filters are immutable once built; when the settings generation moves,
//! the pipeline rebuilds them between blocks and swaps them in.

use super::settings::SettingsHandle;
use crate::filters::{FirFilter, TransitionBandwidth};
use num_complex::Complex64;

/// Cutoff for the high-frequency channel's high-pass filter.
const HIGH_CHANNEL_CUTOFF_HZ: f64 = 4000.0;

/// Cutoff for the low-frequency-effects channel's low-pass filter.
const LFE_CUTOFF_HZ: f64 = 120.0;

/// Owns the active filters and applies them to PCM blocks in place.
pub struct AudioPipeline {
    settings: SettingsHandle,
    applied_generation: u64,
    block_size: usize,
    high_pass: Option<FirFilter>,
    low_pass: Option<FirFilter>,
    scratch: Vec<Complex64>,
}

impl AudioPipeline {
    /// # Arguments
    /// * `settings` - Shared settings; channel flags select the filters
    /// * `block_size` - Samples per block fed to `process`
    pub fn new(settings: SettingsHandle, block_size: usize) -> Self {
        let mut pipeline = Self {
            settings,
            applied_generation: 0,
            block_size,
            high_pass: None,
            low_pass: None,
            scratch: Vec::new(),
        };
        pipeline.rebuild();
        pipeline
    }

    /// Filter one or more blocks of PCM samples in place.
    ///
    /// Picks up settings changes between blocks by rebuilding the affected
    /// filters; a partial trailing block passes through unfiltered,
    /// matching the filter's own boundary behavior.
    pub fn process(&mut self, samples: &mut [f64]) {
        self.refresh();

        if self.high_pass.is_none() && self.low_pass.is_none() {
            return;
        }

        self.scratch.clear();
        self.scratch
            .extend(samples.iter().map(|&s| Complex64::new(s, 0.0)));

        if let Some(filter) = self.high_pass.as_mut() {
            filter.apply(&mut self.scratch);
        }
        if let Some(filter) = self.low_pass.as_mut() {
            filter.apply(&mut self.scratch);
        }

        let complete = (samples.len() / self.block_size) * self.block_size;
        for (out, filtered) in samples[..complete].iter_mut().zip(self.scratch.iter()) {
            *out = filtered.re;
        }
    }

    pub fn high_pass_active(&self) -> bool {
        self.high_pass.is_some()
    }

    pub fn low_pass_active(&self) -> bool {
        self.low_pass.is_some()
    }

    pub fn applied_generation(&self) -> u64 {
        self.applied_generation
    }

    fn refresh(&mut self) {
        if self.settings.generation() != self.applied_generation {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let snapshot = self.settings.snapshot();

        self.high_pass = snapshot.high_frequency.then(|| {
            FirFilter::new(
                snapshot.sampling_rate,
                HIGH_CHANNEL_CUTOFF_HZ,
                TransitionBandwidth::Medium,
                true,
                self.block_size,
            )
        });
        self.low_pass = snapshot.low_frequency.then(|| {
            FirFilter::new(
                snapshot.sampling_rate,
                LFE_CUTOFF_HZ,
                TransitionBandwidth::Wide,
                false,
                self.block_size,
            )
        });

        self.applied_generation = snapshot.generation;
    }
}
