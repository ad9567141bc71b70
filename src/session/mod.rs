//! Meal session management
//!
//! This module provides the session coordinator and its building blocks:
//! - Pacing timer arithmetic (interval-boundary deduplication)
//! - The tagged pacing-mode variant and sealed session record
//! - The `MealSession` coordinator that owns the active session's counters,
//!   observes exactly one detection driver, and seals the record on end

mod config;
mod record;
mod session;
mod timer;

pub use config::SessionConfig;
pub use record::{DetectorKind, PacerEvent, PacingMode, SessionRecord};
pub use session::{MealSession, SessionClock, SessionDriver, SessionStatus};
pub use timer::{IntervalEvent, PacingTimer};
