use serde::{Deserialize, Serialize};

/// Immutable detector tunables, fixed at detector construction
///
/// The confidence constants (0.1 log floor, 0.3 bite floor) are deliberately
/// untuned defaults; the keyword match is deliberately fuzzy (case-insensitive
/// substring containment in either direction).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Normalized energy (0..1) above which a sound event is active
    pub amplitude_threshold: f32,
    /// How long a sound must persist to count as a bite (ms)
    pub sound_duration_ms: u64,
    /// Minimum time between amplitude bite detections (ms)
    pub amplitude_cooldown_ms: u64,
    /// Lower edge of the eating-sound band (Hz)
    pub min_frequency_hz: f32,
    /// Upper edge of the eating-sound band (Hz)
    pub max_frequency_hz: f32,
    /// Arg-max confidence a classification needs to count as a bite
    pub confidence_threshold: f32,
    /// Classifications above this confidence enter the detection log
    pub log_confidence_floor: f32,
    /// Minimum time between classifier bite detections (ms)
    pub classifier_cooldown_ms: u64,
    /// Class names matching any of these (either substring direction) are
    /// eating-related
    pub eating_keywords: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            amplitude_threshold: 0.15,
            sound_duration_ms: 100,
            amplitude_cooldown_ms: 2000,
            min_frequency_hz: 200.0,
            max_frequency_hz: 4000.0,
            confidence_threshold: 0.3,
            log_confidence_floor: 0.1,
            classifier_cooldown_ms: 3000,
            eating_keywords: default_eating_keywords(),
        }
    }
}

fn default_eating_keywords() -> Vec<String> {
    [
        "chewing",
        "biting",
        "crunch",
        "eating",
        "drinking",
        "sipping",
        "cutlery",
        "silverware",
        "dishes",
        "pots",
        "pans",
        "knife",
        "fork",
        "spoon",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl DetectorConfig {
    /// Fuzzy eating-class test: case-insensitive substring containment in
    /// either direction against the keyword set
    pub fn is_eating_class(&self, class_name: &str) -> bool {
        let name = class_name.to_lowercase();
        if name.is_empty() {
            return false;
        }
        self.eating_keywords.iter().any(|kw| {
            let kw = kw.to_lowercase();
            name.contains(&kw) || kw.contains(&name)
        })
    }
}
