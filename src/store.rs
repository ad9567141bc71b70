//! Meal history persistence collaborator
//!
//! The engine hands sealed session records to a [`MealStore`]; it never reads
//! or writes storage directly. The bundled implementation keeps the history
//! as a JSON list, newest first.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{PacerError, PacerResult};
use crate::session::SessionRecord;

/// Sealed-record storage collaborator
#[async_trait::async_trait]
pub trait MealStore: Send + Sync {
    /// Persist a sealed session record
    async fn save(&self, record: &SessionRecord) -> PacerResult<()>;

    /// Load all records, newest first
    async fn load_all(&self) -> PacerResult<Vec<SessionRecord>>;
}

/// JSON-file meal history store
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the history file
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn read_records(&self) -> PacerResult<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(|e| PacerError::Storage(e.to_string()))
    }

    fn write_records(&self, records: &[SessionRecord]) -> PacerResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text =
            serde_json::to_string_pretty(records).map_err(|e| PacerError::Storage(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MealStore for JsonFileStore {
    async fn save(&self, record: &SessionRecord) -> PacerResult<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records()?;
        records.insert(0, record.clone());
        self.write_records(&records)?;
        info!(
            "Saved meal {} ({} total) to {}",
            record.id,
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn load_all(&self) -> PacerResult<Vec<SessionRecord>> {
        let _guard = self.lock.lock().await;
        self.read_records()
    }
}

/// Aggregate meal history statistics
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    pub meal_count: usize,
    /// Consecutive days with at least one meal, counting back from today;
    /// a missing meal today does not break the streak
    pub current_streak_days: u32,
    pub average_duration_secs: u64,
}

/// Compute history stats over sealed records
pub fn history_stats(records: &[SessionRecord], today: NaiveDate) -> HistoryStats {
    HistoryStats {
        meal_count: records.len(),
        current_streak_days: current_streak(records, today),
        average_duration_secs: average_duration_secs(records),
    }
}

fn current_streak(records: &[SessionRecord], today: NaiveDate) -> u32 {
    if records.is_empty() {
        return 0;
    }

    let mut streak = 0;
    for i in 0..365 {
        let day = today - Duration::days(i);
        let day_str = day.format("%Y-%m-%d").to_string();
        let has_meal = records.iter().any(|r| r.date == day_str);

        if has_meal {
            streak += 1;
        } else if i > 0 {
            // No meal yet today is allowed; an older gap ends the streak
            break;
        }
    }

    streak
}

fn average_duration_secs(records: &[SessionRecord]) -> u64 {
    if records.is_empty() {
        return 0;
    }
    let total: u64 = records.iter().map(|r| r.elapsed_secs).sum();
    ((total as f64) / (records.len() as f64)).round() as u64
}
