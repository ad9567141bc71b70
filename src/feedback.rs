//! Feedback collaborator
//!
//! The engine emits discrete feedback kinds; haptic or audio output is the
//! collaborator's business. The engine never plays sound itself.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Discrete feedback signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// A pacing interval completed (timer mode)
    IntervalReminder,
    /// A bite arrived faster than the target interval (listening mode)
    BiteWarning,
    /// The meal session ended
    MealComplete,
}

/// Requested output channel for feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStyle {
    Vibration,
    Sound,
    Both,
}

impl Default for FeedbackStyle {
    fn default() -> Self {
        FeedbackStyle::Both
    }
}

/// Feedback output collaborator
#[async_trait::async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn emit(&self, kind: FeedbackKind) -> Result<()>;
}

/// Feedback sink that records signals to the log
pub struct LogFeedback {
    style: FeedbackStyle,
}

impl LogFeedback {
    pub fn new(style: FeedbackStyle) -> Self {
        Self { style }
    }
}

impl Default for LogFeedback {
    fn default() -> Self {
        Self::new(FeedbackStyle::Both)
    }
}

#[async_trait::async_trait]
impl FeedbackSink for LogFeedback {
    async fn emit(&self, kind: FeedbackKind) -> Result<()> {
        info!(?kind, style = ?self.style, "Feedback");
        Ok(())
    }
}
