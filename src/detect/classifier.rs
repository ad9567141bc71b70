use tracing::debug;

use super::config::DetectorConfig;
use super::log::{DetectionLog, DetectionLogEntry};
use super::{BiteEvent, BiteSource};

/// Outcome of observing one classified window
#[derive(Debug, Clone)]
pub struct Observation {
    /// Bite credited by this window, if any
    pub bite: Option<BiteEvent>,
    /// Log entry appended for this window, if above the confidence floor
    pub log_entry: Option<DetectionLogEntry>,
}

/// Windowed ML-based bite detector
///
/// Holds the debounce state and the audit log; inference itself runs through
/// the [`SoundClassifier`](crate::classify::SoundClassifier) collaborator and
/// the session's [`InferenceSlot`](super::InferenceSlot), so this type only
/// judges classified windows.
///
/// A detection counts as a bite iff the arg-max class is eating-related, its
/// confidence clears the bite floor, and the cooldown since the last bite has
/// elapsed. Every window above the log floor is recorded either way, flagged
/// with `is_eating_sound` and `counted_as_bite`.
#[derive(Debug)]
pub struct ClassifierDetector {
    config: DetectorConfig,
    last_bite_ms: Option<u64>,
    log: DetectionLog,
    last_class: Option<(String, f32)>,
}

impl ClassifierDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            last_bite_ms: None,
            log: DetectionLog::new(),
            last_class: None,
        }
    }

    /// Judge one classified window
    pub fn observe(
        &mut self,
        class_name: &str,
        confidence: f32,
        now_ms: u64,
        elapsed_secs: u64,
    ) -> Observation {
        self.last_class = Some((class_name.to_string(), confidence));

        let is_eating_sound = self.config.is_eating_class(class_name);
        let cooled_down = match self.last_bite_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.config.classifier_cooldown_ms,
            None => true,
        };

        let counted_as_bite =
            is_eating_sound && confidence > self.config.confidence_threshold && cooled_down;

        let bite = if counted_as_bite {
            let interval = self.last_bite_ms.map(|last| now_ms.saturating_sub(last));
            self.last_bite_ms = Some(now_ms);
            Some(BiteEvent {
                timestamp_ms: now_ms,
                source: BiteSource::Classifier,
                interval_since_last_ms: interval,
            })
        } else {
            None
        };

        // Audit trail: everything above the floor is logged, qualifying or not
        let log_entry = if confidence > self.config.log_confidence_floor {
            let entry = DetectionLogEntry {
                timestamp_ms: now_ms,
                elapsed_secs,
                class_name: class_name.to_string(),
                confidence,
                is_eating_sound,
                counted_as_bite,
            };
            self.log.append(entry.clone());
            Some(entry)
        } else {
            debug!(
                class = class_name,
                confidence, "Classification below log floor, not recorded"
            );
            None
        };

        Observation { bite, log_entry }
    }

    /// Most recent arg-max class and confidence, for display
    pub fn last_class(&self) -> Option<&(String, f32)> {
        self.last_class.as_ref()
    }

    pub fn log(&self) -> &DetectionLog {
        &self.log
    }

    pub fn into_log(self) -> DetectionLog {
        self.log
    }
}
