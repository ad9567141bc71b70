// Permission and model lifecycle state machine tests.

use bitepace::lifecycle::{
    LifecycleCoordinator, ModelState, PermissionOutcome, PermissionState,
};
use bitepace::session::{DetectorKind, PacingMode};

#[test]
fn test_permission_walks_unknown_requested_granted() {
    let mut lifecycle = LifecycleCoordinator::new();
    assert_eq!(lifecycle.permission(), PermissionState::Unknown);

    lifecycle.begin_permission_request();
    assert_eq!(lifecycle.permission(), PermissionState::Requested);

    lifecycle.resolve_permission(PermissionOutcome::Granted);
    assert_eq!(lifecycle.permission(), PermissionState::Granted);
}

#[test]
fn test_denied_and_cancelled_are_distinct_states() {
    let mut denied = LifecycleCoordinator::new();
    denied.begin_permission_request();
    denied.resolve_permission(PermissionOutcome::Denied);
    assert_eq!(denied.permission(), PermissionState::Denied);

    let mut cancelled = LifecycleCoordinator::new();
    cancelled.begin_permission_request();
    cancelled.resolve_permission(PermissionOutcome::Cancelled);
    assert_eq!(cancelled.permission(), PermissionState::Cancelled);
}

#[test]
fn test_amplitude_streams_on_permission_alone() {
    let mut lifecycle = LifecycleCoordinator::new();
    assert!(!lifecycle.can_stream(DetectorKind::Amplitude));

    lifecycle.begin_permission_request();
    lifecycle.resolve_permission(PermissionOutcome::Granted);

    assert!(lifecycle.can_stream(DetectorKind::Amplitude));
    assert!(
        !lifecycle.can_stream(DetectorKind::Classifier),
        "classifier also needs a loaded model"
    );
}

#[test]
fn test_classifier_streams_only_with_permission_and_model() {
    let mut lifecycle = LifecycleCoordinator::new();
    lifecycle.begin_permission_request();
    lifecycle.resolve_permission(PermissionOutcome::Granted);

    lifecycle.begin_model_load();
    assert_eq!(lifecycle.model(), ModelState::Loading);
    assert!(!lifecycle.can_stream(DetectorKind::Classifier));

    lifecycle.model_loaded();
    assert!(lifecycle.can_stream(DetectorKind::Classifier));
}

#[test]
fn test_model_failure_blocks_classifier_but_not_amplitude() {
    let mut lifecycle = LifecycleCoordinator::new();
    lifecycle.begin_permission_request();
    lifecycle.resolve_permission(PermissionOutcome::Granted);
    lifecycle.begin_model_load();
    lifecycle.model_failed();

    assert_eq!(lifecycle.model(), ModelState::Failed);
    assert!(!lifecycle.can_stream(DetectorKind::Classifier));
    assert!(lifecycle.can_stream(DetectorKind::Amplitude));
}

#[test]
fn test_resolve_mode_degrades_to_timer_when_refused() {
    let requested = PacingMode::Listening {
        detector: DetectorKind::Amplitude,
    };

    for outcome in [PermissionOutcome::Denied, PermissionOutcome::Cancelled] {
        let mut lifecycle = LifecycleCoordinator::new();
        lifecycle.begin_permission_request();
        lifecycle.resolve_permission(outcome);
        assert_eq!(lifecycle.resolve_mode(requested), PacingMode::Timer);
    }
}

#[test]
fn test_resolve_mode_keeps_grantable_requests() {
    let mut lifecycle = LifecycleCoordinator::new();
    lifecycle.begin_permission_request();
    lifecycle.resolve_permission(PermissionOutcome::Granted);

    let amplitude = PacingMode::Listening {
        detector: DetectorKind::Amplitude,
    };
    assert_eq!(lifecycle.resolve_mode(amplitude), amplitude);
    assert_eq!(lifecycle.resolve_mode(PacingMode::Timer), PacingMode::Timer);
}
