use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timer::IntervalEvent;
use crate::detect::{BiteEvent, DetectionLogEntry};

/// Which detector drives a listening session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    Amplitude,
    Classifier,
}

/// How a session paces the meal: periodic reminders, or audio-derived bite
/// detection with too-fast alerts
///
/// Selected once per session; the variants are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PacingMode {
    Timer,
    Listening { detector: DetectorKind },
}

impl PacingMode {
    pub fn is_listening(&self) -> bool {
        matches!(self, PacingMode::Listening { .. })
    }
}

/// Engine event stream payload, one broadcast channel for all subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PacerEvent {
    Interval(IntervalEvent),
    Bite(BiteEvent),
    Detection(DetectionLogEntry),
}

/// A sealed meal session
///
/// Produced exactly once, when the session ends; immutable from then on. In
/// timer mode `event_count` is the number of interval reminders sent; in
/// listening mode it counts too-fast bites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier (UUID v4)
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub mode: PacingMode,
    pub target_interval_secs: u32,
    pub elapsed_secs: u64,
    pub event_count: u64,
    /// Calendar day of the meal (YYYY-MM-DD), used for streak tracking
    pub date: String,
    /// Classifier audit trail; present only for listening sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_log: Option<Vec<DetectionLogEntry>>,
}
