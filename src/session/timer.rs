use serde::{Deserialize, Serialize};

/// Emitted once per completed pacing interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalEvent {
    /// Strictly increasing boundary index, starting at 1
    pub trigger_index: u64,
    /// Milliseconds on the session clock
    pub timestamp_ms: u64,
}

/// Pacing timer tick arithmetic
///
/// Converts a one-second tick cadence into interval-boundary events. The
/// trigger index is compared against `elapsed / target` on every tick, so a
/// boundary fires exactly once even when ticks are coalesced or delayed; a
/// boundary is never skipped and never repeated.
#[derive(Debug, Clone)]
pub struct PacingTimer {
    target_interval_secs: u32,
    elapsed_secs: u64,
    trigger_index: u64,
    running: bool,
}

impl PacingTimer {
    pub fn new(target_interval_secs: u32) -> Self {
        Self {
            target_interval_secs: target_interval_secs.max(1),
            elapsed_secs: 0,
            trigger_index: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_secs = 0;
        self.trigger_index = 0;
    }

    /// Advance one second; returns the interval event crossed, if any
    pub fn tick(&mut self, now_ms: u64) -> Option<IntervalEvent> {
        if !self.running {
            return None;
        }

        self.elapsed_secs += 1;

        let intervals_passed = self.elapsed_secs / self.target_interval_secs as u64;
        if intervals_passed > self.trigger_index {
            self.trigger_index = intervals_passed;
            return Some(IntervalEvent {
                trigger_index: intervals_passed,
                timestamp_ms: now_ms,
            });
        }

        None
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Number of interval boundaries crossed so far
    pub fn interval_count(&self) -> u64 {
        self.trigger_index
    }

    /// Fraction of the current interval elapsed, for display
    pub fn progress(&self) -> f32 {
        let target = self.target_interval_secs as u64;
        (self.elapsed_secs % target) as f32 / target as f32
    }
}
