//! Capability lifecycle for the audio detectors
//!
//! Two orthogonal state machines gate the streaming detectors:
//! - Microphone permission: `Unknown → Requested → {Granted | Denied | Cancelled}`
//! - Classifier model readiness: `Unloaded → Loading → {Loaded | Failed}`
//!
//! Permission refusal (system denial or user cancellation) forces the session
//! back to Timer mode. Model load failure leaves Listening unavailable but
//! never retries on its own.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::session::{DetectorKind, PacingMode};

/// Result of a permission request, as reported by the capture collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionOutcome {
    /// Microphone access granted
    Granted,
    /// Platform refused access
    Denied,
    /// User declined the prompt
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Unknown,
    Requested,
    Granted,
    Denied,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// Permission and model readiness coordinator
#[derive(Debug, Clone)]
pub struct LifecycleCoordinator {
    permission: PermissionState,
    model: ModelState,
}

impl LifecycleCoordinator {
    pub fn new() -> Self {
        Self {
            permission: PermissionState::Unknown,
            model: ModelState::Unloaded,
        }
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn model(&self) -> ModelState {
        self.model
    }

    /// Mark a permission request as in flight
    pub fn begin_permission_request(&mut self) {
        self.permission = PermissionState::Requested;
    }

    /// Record the outcome of a permission request
    pub fn resolve_permission(&mut self, outcome: PermissionOutcome) {
        self.permission = match outcome {
            PermissionOutcome::Granted => {
                info!("Microphone permission granted");
                PermissionState::Granted
            }
            PermissionOutcome::Denied => {
                warn!("Microphone permission denied, falling back to timer mode");
                PermissionState::Denied
            }
            PermissionOutcome::Cancelled => {
                warn!("Microphone permission cancelled by user, falling back to timer mode");
                PermissionState::Cancelled
            }
        };
    }

    pub fn begin_model_load(&mut self) {
        self.model = ModelState::Loading;
    }

    pub fn model_loaded(&mut self) {
        info!("Classifier model loaded");
        self.model = ModelState::Loaded;
    }

    pub fn model_failed(&mut self) {
        warn!("Classifier model load failed; listening mode unavailable");
        self.model = ModelState::Failed;
    }

    /// Whether a detector of the given kind may enter its streaming state
    pub fn can_stream(&self, kind: DetectorKind) -> bool {
        let granted = self.permission == PermissionState::Granted;
        match kind {
            DetectorKind::Amplitude => granted,
            DetectorKind::Classifier => granted && self.model == ModelState::Loaded,
        }
    }

    /// Map a requested pacing mode to the one the current capabilities allow.
    ///
    /// Denied and cancelled permission both resolve to the Timer fallback.
    pub fn resolve_mode(&self, requested: PacingMode) -> PacingMode {
        match requested {
            PacingMode::Timer => PacingMode::Timer,
            PacingMode::Listening { detector } => {
                if self.can_stream(detector) {
                    PacingMode::Listening { detector }
                } else {
                    PacingMode::Timer
                }
            }
        }
    }
}

impl Default for LifecycleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
