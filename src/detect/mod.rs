//! Bite detection
//!
//! Two mutually exclusive detectors turn an audio stream into discrete,
//! debounced bite events: an energy-threshold state machine and a windowed
//! sound classifier with an audit log. Both are pure with respect to time;
//! callers pass timestamps from the session's monotonic clock.

pub mod amplitude;
pub mod classifier;
pub mod config;
pub mod log;
pub mod slot;

use serde::{Deserialize, Serialize};

pub use amplitude::AmplitudeDetector;
pub use classifier::{ClassifierDetector, Observation};
pub use config::DetectorConfig;
pub use log::{DetectionLog, DetectionLogEntry};
pub use slot::{InferenceSlot, SlotGuard};

/// Which detector produced a bite event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiteSource {
    Amplitude,
    Classifier,
}

/// A discrete, debounced bite detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiteEvent {
    /// Milliseconds on the session clock
    pub timestamp_ms: u64,
    /// Detector that produced the event
    pub source: BiteSource,
    /// Time since the previous bite; None only for the session's first bite
    pub interval_since_last_ms: Option<u64>,
}
