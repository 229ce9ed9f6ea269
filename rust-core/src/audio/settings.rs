//! Versioned audio settings shared between control and audio threads
//!
//! Settings travel as whole snapshots guarded by a generation counter
//! instead of per-field atomics: a consumer remembers the last generation
//! it applied and re-reads the snapshot only when the counter moved, so it
//! never observes a half-updated configuration.

use std::sync::{Arc, Mutex};

/// One immutable view of the audio configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    /// Master output volume, 0.0 to 1.0
    pub master_volume: f64,

    /// Low-frequency-effects channel volume, 0.0 to 1.0
    pub lfe_volume: f64,

    /// Reverb delay in seconds (0 disables the delay line)
    pub reverb_delay: f64,

    /// Reverb feedback, 0.0 to just under 1.0
    pub reverb_decay: f64,

    /// Route a high-pass-filtered signal to the high-frequency channel
    pub high_frequency: bool,

    /// Route a low-pass-filtered signal to the low-frequency channel
    pub low_frequency: bool,

    /// Stream sampling rate in Hz
    pub sampling_rate: u32,

    /// Bumped on every update; consumers compare against the last
    /// generation they applied
    pub generation: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            lfe_volume: 1.0,
            reverb_delay: 0.0,
            reverb_decay: 0.0,
            high_frequency: false,
            low_frequency: false,
            sampling_rate: 44100,
            generation: 0,
        }
    }
}

/// Shared handle to the current settings snapshot.
#[derive(Clone)]
pub struct SettingsHandle {
    shared: Arc<Mutex<AudioSettings>>,
}

impl SettingsHandle {
    pub fn new(initial: AudioSettings) -> Self {
        Self {
            shared: Arc::new(Mutex::new(initial)),
        }
    }

    /// Mutate the settings and bump the generation counter.
    pub fn update(&self, f: impl FnOnce(&mut AudioSettings)) {
        let mut settings = self.shared.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut settings);
        settings.generation += 1;
    }

    /// Clone the current snapshot.
    pub fn snapshot(&self) -> AudioSettings {
        self.shared
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Current generation counter.
    pub fn generation(&self) -> u64 {
        self.shared
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .generation
    }

    /// Non-blocking snapshot for real-time callers: returns a fresh copy
    /// only when the generation moved past `last_applied`, and backs off
    /// silently if the lock is contended.
    pub fn snapshot_if_newer(&self, last_applied: u64) -> Option<AudioSettings> {
        match self.shared.try_lock() {
            Ok(settings) if settings.generation != last_applied => Some(settings.clone()),
            _ => None,
        }
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(AudioSettings::default())
    }
}
