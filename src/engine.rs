//! Engine facade
//!
//! `PacerEngine` is the entry point the control surface talks to: it gates
//! session startup through the lifecycle coordinator, enforces the
//! one-active-session rule, and hands sealed records to the persistence
//! collaborator. Subscribers observe interval, bite, and detection events on
//! a broadcast channel that outlives individual sessions.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::audio::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioSource};
use crate::classify::SoundClassifier;
use crate::config::Config;
use crate::error::{PacerError, PacerResult};
use crate::feedback::FeedbackSink;
use crate::lifecycle::{LifecycleCoordinator, PermissionOutcome};
use crate::session::{
    DetectorKind, MealSession, PacerEvent, PacingMode, SessionConfig, SessionDriver,
    SessionRecord, SessionStatus,
};
use crate::store::{history_stats, HistoryStats, MealStore};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How a session start resolved, fallback included
#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub session_id: String,
    pub requested_mode: PacingMode,
    pub resolved_mode: PacingMode,
    /// Why the resolved mode differs from the requested one, if it does
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Bite-detection and pacing engine
pub struct PacerEngine {
    config: Config,
    lifecycle: Mutex<LifecycleCoordinator>,
    active: Mutex<Option<Arc<MealSession>>>,
    store: Arc<dyn MealStore>,
    feedback: Arc<dyn FeedbackSink>,
    classifier: Arc<dyn SoundClassifier>,
    events: broadcast::Sender<PacerEvent>,
}

impl PacerEngine {
    pub fn new(
        config: Config,
        store: Arc<dyn MealStore>,
        feedback: Arc<dyn FeedbackSink>,
        classifier: Arc<dyn SoundClassifier>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            lifecycle: Mutex::new(LifecycleCoordinator::new()),
            active: Mutex::new(None),
            store,
            feedback,
            classifier,
            events,
        }
    }

    /// Subscribe to interval, bite, and detection events
    pub fn subscribe(&self) -> broadcast::Receiver<PacerEvent> {
        self.events.subscribe()
    }

    /// Start a session, resolving the requested mode against capabilities.
    ///
    /// Permission refusal and audio acquisition failures degrade to Timer
    /// mode; a classifier model load failure is surfaced as an error instead
    /// (Timer and Amplitude requests remain usable afterwards).
    pub async fn start_session(
        &self,
        requested: PacingMode,
        target_interval_secs: Option<u32>,
        source: Option<AudioSource>,
    ) -> PacerResult<StartOutcome> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(PacerError::SessionActive);
        }

        let (driver, resolved, fallback_reason) = self.prepare_driver(requested, source).await?;

        let session_config = SessionConfig {
            mode: resolved,
            target_interval_secs: target_interval_secs
                .unwrap_or(self.config.pacing.default_interval_secs)
                .max(1),
            sample_rate: self.config.audio.sample_rate,
            window_samples: self.config.audio.window_samples,
            detector: self.config.detection.clone(),
        };

        let session = Arc::new(MealSession::new(
            session_config.clone(),
            Arc::clone(&self.feedback),
            self.events.clone(),
        ));

        // Acquisition failures at stream start also degrade to Timer mode
        let (session, resolved, fallback_reason) = match session.start(driver).await {
            Ok(()) => (session, resolved, fallback_reason),
            Err(e) if resolved.is_listening() => {
                warn!("Audio acquisition failed ({}), falling back to timer mode", e);
                let timer_config = SessionConfig {
                    mode: PacingMode::Timer,
                    ..session_config.clone()
                };
                let fallback = Arc::new(MealSession::new(
                    timer_config,
                    Arc::clone(&self.feedback),
                    self.events.clone(),
                ));
                fallback
                    .start(SessionDriver::Timer)
                    .await
                    .map_err(|err| PacerError::Processing(err.to_string()))?;
                (
                    fallback,
                    PacingMode::Timer,
                    Some(format!("audio acquisition failed: {}", e)),
                )
            }
            Err(e) => return Err(PacerError::Processing(e.to_string())),
        };

        let outcome = StartOutcome {
            session_id: session.id().to_string(),
            requested_mode: requested,
            resolved_mode: resolved,
            fallback_reason,
        };

        *active = Some(session);
        Ok(outcome)
    }

    /// End the active session, seal it, and persist the record
    pub async fn end_session(&self) -> PacerResult<SessionRecord> {
        let session = self
            .active
            .lock()
            .await
            .take()
            .ok_or(PacerError::NoActiveSession)?;

        let record = session.end().await;

        // Persistence is best-effort: a storage failure never un-seals the
        // session.
        if let Err(e) = self.store.save(&record).await {
            warn!("Failed to persist meal record {}: {}", record.id, e);
        }

        Ok(record)
    }

    /// Snapshot of the active session, if any
    pub async fn status(&self) -> Option<SessionStatus> {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(session) => Some(session.status().await),
            None => None,
        }
    }

    /// All sealed records, newest first
    pub async fn history(&self) -> PacerResult<Vec<SessionRecord>> {
        self.store.load_all().await
    }

    /// Aggregate stats over the meal history
    pub async fn history_stats(&self) -> PacerResult<HistoryStats> {
        let records = self.store.load_all().await?;
        Ok(history_stats(&records, Utc::now().date_naive()))
    }

    /// Resolve the requested mode and build the matching driver.
    ///
    /// Gates, in order: backend availability, microphone permission, and (for
    /// the classifier) model readiness. The inference collaborator is never
    /// touched unless permission was granted.
    async fn prepare_driver(
        &self,
        requested: PacingMode,
        source: Option<AudioSource>,
    ) -> PacerResult<(SessionDriver, PacingMode, Option<String>)> {
        let detector = match requested {
            PacingMode::Timer => return Ok((SessionDriver::Timer, PacingMode::Timer, None)),
            PacingMode::Listening { detector } => detector,
        };

        let backend_config = AudioBackendConfig {
            sample_rate: self.config.audio.sample_rate,
            frame_samples: match detector {
                DetectorKind::Amplitude => self.config.audio.frame_samples,
                DetectorKind::Classifier => self.config.audio.window_samples,
            },
            paced: true,
        };

        let source = source.unwrap_or(AudioSource::Microphone);
        let mut backend: Box<dyn AudioBackend> =
            match AudioBackendFactory::create(source, backend_config) {
                Ok(backend) => backend,
                Err(e) => {
                    warn!("Audio backend unavailable ({}), falling back to timer mode", e);
                    return Ok((
                        SessionDriver::Timer,
                        PacingMode::Timer,
                        Some(format!("audio backend unavailable: {}", e)),
                    ));
                }
            };

        let mut lifecycle = self.lifecycle.lock().await;
        lifecycle.begin_permission_request();
        let outcome = backend
            .request_permission()
            .await
            .map_err(|e| PacerError::Processing(e.to_string()))?;
        lifecycle.resolve_permission(outcome);

        match outcome {
            PermissionOutcome::Granted => {}
            PermissionOutcome::Denied => {
                return Ok((
                    SessionDriver::Timer,
                    PacingMode::Timer,
                    Some("microphone permission denied".to_string()),
                ));
            }
            PermissionOutcome::Cancelled => {
                return Ok((
                    SessionDriver::Timer,
                    PacingMode::Timer,
                    Some("microphone permission cancelled".to_string()),
                ));
            }
        }

        if detector == DetectorKind::Classifier {
            lifecycle.begin_model_load();
            match self.classifier.load().await {
                Ok(()) => lifecycle.model_loaded(),
                Err(e) => {
                    lifecycle.model_failed();
                    return Err(PacerError::ModelLoad(e.to_string()));
                }
            }
        }

        let resolved = lifecycle.resolve_mode(requested);
        info!("Session mode resolved: {:?} -> {:?}", requested, resolved);

        let driver = match resolved {
            PacingMode::Timer => SessionDriver::Timer,
            PacingMode::Listening {
                detector: DetectorKind::Amplitude,
            } => SessionDriver::Amplitude(backend),
            PacingMode::Listening {
                detector: DetectorKind::Classifier,
            } => SessionDriver::Classifier(backend, Arc::clone(&self.classifier)),
        };

        Ok((driver, resolved, None))
    }
}
