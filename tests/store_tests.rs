// Meal history persistence and aggregate statistics tests.

use chrono::{NaiveDate, Utc};

use bitepace::session::{PacingMode, SessionRecord};
use bitepace::store::{history_stats, JsonFileStore, MealStore};

fn record_on(date: &str, elapsed_secs: u64) -> SessionRecord {
    SessionRecord {
        id: uuid::Uuid::new_v4().to_string(),
        started_at: Utc::now(),
        ended_at: Utc::now(),
        mode: PacingMode::Timer,
        target_interval_secs: 20,
        elapsed_secs,
        event_count: 0,
        date: date.to_string(),
        detection_log: None,
    }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

#[tokio::test]
async fn test_round_trip_preserves_records_newest_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("meals.json"));

    let first = record_on("2026-08-27", 300);
    let second = record_on("2026-08-28", 600);
    store.save(&first).await.expect("save");
    store.save(&second).await.expect("save");

    let records = store.load_all().await.expect("load");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, second.id, "latest save comes first");
    assert_eq!(records[1].id, first.id);
    assert_eq!(records[1].elapsed_secs, 300);
}

#[tokio::test]
async fn test_missing_history_file_loads_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("absent/meals.json"));

    let records = store.load_all().await.expect("load");
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nested/deeper/meals.json"));

    store.save(&record_on("2026-08-28", 120)).await.expect("save");

    let records = store.load_all().await.expect("load");
    assert_eq!(records.len(), 1);
}

#[test]
fn test_streak_counts_consecutive_days_back_from_today() {
    let records = vec![
        record_on("2026-08-28", 300),
        record_on("2026-08-27", 300),
        record_on("2026-08-26", 300),
    ];

    let stats = history_stats(&records, day("2026-08-28"));
    assert_eq!(stats.current_streak_days, 3);
    assert_eq!(stats.meal_count, 3);
}

#[test]
fn test_streak_survives_a_day_with_no_meal_yet() {
    // Meals yesterday and the day before, none yet today
    let records = vec![record_on("2026-08-27", 300), record_on("2026-08-26", 300)];

    let stats = history_stats(&records, day("2026-08-28"));
    assert_eq!(stats.current_streak_days, 2);
}

#[test]
fn test_gap_before_yesterday_breaks_the_streak() {
    let records = vec![
        record_on("2026-08-28", 300),
        // no meal on the 27th
        record_on("2026-08-26", 300),
        record_on("2026-08-25", 300),
    ];

    let stats = history_stats(&records, day("2026-08-28"));
    assert_eq!(stats.current_streak_days, 1);
}

#[test]
fn test_empty_history_yields_zero_stats() {
    let stats = history_stats(&[], day("2026-08-28"));
    assert_eq!(stats.meal_count, 0);
    assert_eq!(stats.current_streak_days, 0);
    assert_eq!(stats.average_duration_secs, 0);
}

#[test]
fn test_average_duration_rounds_to_nearest_second() {
    let records = vec![
        record_on("2026-08-28", 100),
        record_on("2026-08-27", 101),
        record_on("2026-08-26", 102),
    ];

    let stats = history_stats(&records, day("2026-08-28"));
    assert_eq!(stats.average_duration_secs, 101);

    let records = vec![record_on("2026-08-28", 1), record_on("2026-08-27", 2)];
    let stats = history_stats(&records, day("2026-08-28"));
    assert_eq!(stats.average_duration_secs, 2, "1.5 rounds up");
}

#[test]
fn test_multiple_meals_on_one_day_count_once_for_the_streak() {
    let records = vec![
        record_on("2026-08-28", 300),
        record_on("2026-08-28", 400),
        record_on("2026-08-27", 300),
    ];

    let stats = history_stats(&records, day("2026-08-28"));
    assert_eq!(stats.current_streak_days, 2);
    assert_eq!(stats.meal_count, 3);
}
