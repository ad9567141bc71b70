// Unit tests for the amplitude bite detector state machine
//
// Energy readings are fed directly with explicit timestamps; the analysis
// cadence in these tests is the production 50ms cycle.

use bitepace::detect::{AmplitudeDetector, BiteSource, DetectorConfig};

const CYCLE_MS: u64 = 50;

/// Feed `energy` for every cycle in [start_ms, end_ms], collecting bites
fn feed(
    detector: &mut AmplitudeDetector,
    energy: f32,
    start_ms: u64,
    end_ms: u64,
) -> Vec<bitepace::detect::BiteEvent> {
    let mut bites = Vec::new();
    let mut now = start_ms;
    while now <= end_ms {
        if let Some(bite) = detector.update(energy, now) {
            bites.push(bite);
        }
        now += CYCLE_MS;
    }
    bites
}

#[test]
fn test_sustained_sounds_2500ms_apart_yield_two_bites() {
    let mut detector = AmplitudeDetector::new(DetectorConfig::default());

    // 150ms above threshold, drop, then again 2500ms after the first bite
    let mut bites = feed(&mut detector, 0.5, 0, 150);
    bites.extend(feed(&mut detector, 0.01, 200, 2550));
    bites.extend(feed(&mut detector, 0.5, 2600, 2750));

    assert_eq!(bites.len(), 2, "both sustained sounds count");
    assert_eq!(bites[0].source, BiteSource::Amplitude);
    assert_eq!(bites[0].interval_since_last_ms, None, "first bite has no interval");
    assert!(bites[1].interval_since_last_ms.is_some());
}

#[test]
fn test_cooldown_suppresses_second_sound_1000ms_later() {
    let mut detector = AmplitudeDetector::new(DetectorConfig::default());

    let mut bites = feed(&mut detector, 0.5, 0, 150);
    bites.extend(feed(&mut detector, 0.01, 200, 1050));
    bites.extend(feed(&mut detector, 0.5, 1100, 1250));

    assert_eq!(bites.len(), 1, "second sound lands inside the 2000ms cooldown");
}

#[test]
fn test_short_burst_below_sustain_floor_yields_nothing() {
    let mut detector = AmplitudeDetector::new(DetectorConfig::default());

    // 50ms burst: one crossing then back to quiet
    let mut bites = feed(&mut detector, 0.5, 0, 50);
    bites.extend(feed(&mut detector, 0.01, 100, 500));

    assert_eq!(bites.len(), 0, "a 50ms burst is below the 100ms sustain floor");
}

#[test]
fn test_dip_below_threshold_resets_sustain_tracking() {
    let mut detector = AmplitudeDetector::new(DetectorConfig::default());

    // 50ms up, dip, 50ms up again: never continuously sustained
    let mut bites = feed(&mut detector, 0.5, 0, 50);
    bites.extend(feed(&mut detector, 0.05, 100, 100));
    bites.extend(feed(&mut detector, 0.5, 150, 200));

    assert_eq!(bites.len(), 0, "the dip resets the sustain clock");

    // Held past the floor from the new start, it counts
    let more = feed(&mut detector, 0.5, 250, 300);
    assert_eq!(more.len(), 1);
}

#[test]
fn test_current_amplitude_tracks_every_cycle() {
    let mut detector = AmplitudeDetector::new(DetectorConfig::default());

    detector.update(0.42, 0);
    assert!((detector.current_amplitude() - 0.42).abs() < f32::EPSILON);

    // Display reading updates below the threshold too
    detector.update(0.03, 50);
    assert!((detector.current_amplitude() - 0.03).abs() < f32::EPSILON);
}

#[test]
fn test_bite_interval_reported_against_previous_bite() {
    let mut detector = AmplitudeDetector::new(DetectorConfig::default());

    let first = feed(&mut detector, 0.5, 0, 150);
    feed(&mut detector, 0.01, 200, 4950);
    let second = feed(&mut detector, 0.5, 5000, 5150);

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    let gap = second[0].timestamp_ms - first[0].timestamp_ms;
    assert_eq!(second[0].interval_since_last_ms, Some(gap));
}

#[test]
fn test_reset_clears_debounce_state() {
    let mut detector = AmplitudeDetector::new(DetectorConfig::default());

    let bites = feed(&mut detector, 0.5, 0, 150);
    assert_eq!(bites.len(), 1);

    detector.reset();
    assert_eq!(detector.last_bite_ms(), None);
    assert!((detector.current_amplitude() - 0.0).abs() < f32::EPSILON);

    // Cooldown no longer applies after a reset
    let bites = feed(&mut detector, 0.5, 500, 650);
    assert_eq!(bites.len(), 1);
    assert_eq!(bites[0].interval_since_last_ms, None);
}
