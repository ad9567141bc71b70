use serde::{Deserialize, Serialize};

/// One classifier decision, kept for audit and debugging
///
/// Entries exist for every window above the low confidence floor, whether or
/// not the detection counted as a bite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionLogEntry {
    /// Milliseconds on the session clock
    pub timestamp_ms: u64,
    /// Seconds since the session started
    pub elapsed_secs: u64,
    /// Arg-max class display name
    pub class_name: String,
    /// Arg-max confidence in [0, 1]
    pub confidence: f32,
    /// Whether the class matched the eating keyword set
    pub is_eating_sound: bool,
    /// Whether this detection was credited as a bite
    pub counted_as_bite: bool,
}

/// Append-only record of classifier decisions, ordered by arrival
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionLog {
    entries: Vec<DetectionLogEntry>,
}

impl DetectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: DetectionLogEntry) {
        debug_assert!(
            self.entries
                .last()
                .map(|prev| prev.timestamp_ms <= entry.timestamp_ms)
                .unwrap_or(true),
            "detection log timestamps must be non-decreasing"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DetectionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<DetectionLogEntry> {
        self.entries
    }
}
