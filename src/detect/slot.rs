use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Non-blocking single-occupancy slot for in-flight inference
///
/// At most one inference runs at a time; while the slot is occupied, new work
/// is rejected rather than queued, preserving real-time responsiveness over
/// completeness. The guard releases the slot when dropped, on every exit
/// path.
#[derive(Debug, Clone)]
pub struct InferenceSlot {
    busy: Arc<AtomicBool>,
}

impl InferenceSlot {
    pub fn new() -> Self {
        Self {
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the slot; None while an inference is already in flight
    pub fn try_acquire(&self) -> Option<SlotGuard> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Some(SlotGuard {
                busy: Arc::clone(&self.busy),
            })
        } else {
            None
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Default for InferenceSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Occupancy guard returned by [`InferenceSlot::try_acquire`]
#[derive(Debug)]
pub struct SlotGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
