use super::config::DetectorConfig;
use super::{BiteEvent, BiteSource};

/// Streaming energy-threshold bite detector
///
/// Per analysis cycle the caller supplies the band-limited energy reading and
/// the current session clock. A bite is credited only when the energy stays
/// above the threshold continuously past the sustain floor, and the cooldown
/// since the previous bite has elapsed; any drop below the threshold resets
/// the sustain tracking. Short transient crossings are noise, and the
/// cooldown keeps continuous chewing from double-counting as rapid bites.
#[derive(Debug)]
pub struct AmplitudeDetector {
    config: DetectorConfig,
    sound_start_ms: Option<u64>,
    last_bite_ms: Option<u64>,
    current_amplitude: f32,
}

impl AmplitudeDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            sound_start_ms: None,
            last_bite_ms: None,
            current_amplitude: 0.0,
        }
    }

    /// Feed one analysis cycle; returns a bite event when one is credited
    pub fn update(&mut self, energy: f32, now_ms: u64) -> Option<BiteEvent> {
        self.current_amplitude = energy;

        if energy <= self.config.amplitude_threshold {
            // Sound stopped; a bite needs a fresh sustained crossing
            self.sound_start_ms = None;
            return None;
        }

        let start = match self.sound_start_ms {
            None => {
                self.sound_start_ms = Some(now_ms);
                return None;
            }
            Some(start) => start,
        };

        let sustained = now_ms.saturating_sub(start) >= self.config.sound_duration_ms;
        let cooled_down = match self.last_bite_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.config.amplitude_cooldown_ms,
            None => true,
        };

        if !(sustained && cooled_down) {
            return None;
        }

        let interval = self.last_bite_ms.map(|last| now_ms.saturating_sub(last));
        self.last_bite_ms = Some(now_ms);
        self.sound_start_ms = None;

        Some(BiteEvent {
            timestamp_ms: now_ms,
            source: BiteSource::Amplitude,
            interval_since_last_ms: interval,
        })
    }

    /// Live amplitude reading for display, updated every cycle
    pub fn current_amplitude(&self) -> f32 {
        self.current_amplitude
    }

    pub fn last_bite_ms(&self) -> Option<u64> {
        self.last_bite_ms
    }

    pub fn reset(&mut self) {
        self.sound_start_ms = None;
        self.last_bite_ms = None;
        self.current_amplitude = 0.0;
    }
}
