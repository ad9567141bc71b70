// Unit tests for pacing-timer interval arithmetic
//
// The timer must emit exactly one event per interval boundary, never
// duplicating or skipping a boundary, regardless of how ticks line up.

use bitepace::session::PacingTimer;

#[test]
fn test_two_intervals_over_45_ticks() {
    let mut timer = PacingTimer::new(20);
    timer.start();

    let mut events = Vec::new();
    for tick in 1..=45u64 {
        if let Some(event) = timer.tick(tick * 1000) {
            events.push((tick, event));
        }
    }

    assert_eq!(events.len(), 2, "interval=20s over 45 ticks fires twice");
    assert_eq!(events[0].0, 20, "first boundary at tick 20");
    assert_eq!(events[1].0, 40, "second boundary at tick 40");
    assert_eq!(events[0].1.trigger_index, 1);
    assert_eq!(events[1].1.trigger_index, 2);
    assert_eq!(timer.elapsed_secs(), 45);
    assert_eq!(timer.interval_count(), 2);
}

#[test]
fn test_trigger_indexes_strictly_increase() {
    let mut timer = PacingTimer::new(3);
    timer.start();

    let mut indexes = Vec::new();
    for tick in 1..=30u64 {
        if let Some(event) = timer.tick(tick * 1000) {
            indexes.push(event.trigger_index);
        }
    }

    assert_eq!(indexes, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_no_event_before_first_boundary() {
    let mut timer = PacingTimer::new(20);
    timer.start();

    for tick in 1..20u64 {
        assert!(timer.tick(tick * 1000).is_none(), "no event at tick {}", tick);
    }
}

#[test]
fn test_paused_timer_does_not_advance() {
    let mut timer = PacingTimer::new(5);
    timer.start();
    timer.tick(1000);
    timer.pause();

    assert!(timer.tick(2000).is_none());
    assert_eq!(timer.elapsed_secs(), 1, "paused ticks are ignored");
}

#[test]
fn test_reset_clears_elapsed_and_trigger_index() {
    let mut timer = PacingTimer::new(5);
    timer.start();
    for tick in 1..=12u64 {
        timer.tick(tick * 1000);
    }
    assert_eq!(timer.interval_count(), 2);

    timer.reset();
    assert_eq!(timer.elapsed_secs(), 0);
    assert_eq!(timer.interval_count(), 0);
    assert!(!timer.is_running());

    // After a reset the boundary sequence starts over
    timer.start();
    let mut first = None;
    for tick in 1..=5u64 {
        if let Some(event) = timer.tick(tick * 1000) {
            first = Some(event);
        }
    }
    assert_eq!(first.map(|e| e.trigger_index), Some(1));
}

#[test]
fn test_progress_fraction() {
    let mut timer = PacingTimer::new(20);
    timer.start();

    for tick in 1..=5u64 {
        timer.tick(tick * 1000);
    }
    assert!((timer.progress() - 0.25).abs() < f32::EPSILON);

    for tick in 6..=20u64 {
        timer.tick(tick * 1000);
    }
    // The boundary itself wraps back to zero progress
    assert!(timer.progress().abs() < f32::EPSILON);
}
