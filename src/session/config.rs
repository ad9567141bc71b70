use serde::{Deserialize, Serialize};

use super::record::PacingMode;
use crate::detect::DetectorConfig;

/// Configuration for one meal session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pacing mode, fixed for the session's lifetime
    pub mode: PacingMode,
    /// Target seconds between bites / reminders
    pub target_interval_secs: u32,
    /// Sample rate the audio collaborator delivers
    pub sample_rate: u32,
    /// Samples per classifier window (~1s at 16kHz)
    pub window_samples: usize,
    /// Detector tunables, fixed at construction
    pub detector: DetectorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: PacingMode::Timer,
            target_interval_secs: 20,
            sample_rate: 16000,
            window_samples: 16384, // ~1s at 16kHz, the classifier's window
            detector: DetectorConfig::default(),
        }
    }
}
