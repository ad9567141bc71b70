use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::config::SessionConfig;
use super::record::{PacerEvent, PacingMode, SessionRecord};
use super::timer::PacingTimer;
use crate::audio::{band_energy, AudioBackend, AudioFrame};
use crate::classify::{arg_max, SoundClassifier};
use crate::detect::{
    AmplitudeDetector, BiteEvent, ClassifierDetector, DetectionLog, InferenceSlot,
};
use crate::error::PacerError;
use crate::feedback::{FeedbackKind, FeedbackSink};

/// Monotonic time source for one session
#[derive(Debug, Clone)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The active detection strategy, selected once per session
pub enum SessionDriver {
    /// Fixed-interval reminders from the session clock
    Timer,
    /// Energy-threshold bite detection over the capture stream
    Amplitude(Box<dyn AudioBackend>),
    /// Windowed sound classification over the capture stream
    Classifier(Box<dyn AudioBackend>, Arc<dyn SoundClassifier>),
}

/// Live counters shared between the session and its driver task
#[derive(Debug, Default)]
struct Tally {
    event_count: u64,
    elapsed_secs: u64,
    current_amplitude: f32,
    last_class: Option<(String, f32)>,
    windows_dropped: u64,
    detection_log: Option<DetectionLog>,
}

/// Snapshot of a running session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub mode: PacingMode,
    pub running: bool,
    pub target_interval_secs: u32,
    pub elapsed_secs: u64,
    pub event_count: u64,
    pub current_amplitude: f32,
    pub detected_class: Option<String>,
    pub confidence: Option<f32>,
}

/// One meal session from start to seal
///
/// Owns the session clock and counters, observes exactly one driver, and on
/// end produces the immutable [`SessionRecord`]. In timer mode `event_count`
/// counts reminders sent; in listening mode it counts too-fast bites (bites
/// arriving sooner than the target interval). Teardown runs on every exit
/// path and never blocks the end call on hardware.
pub struct MealSession {
    id: String,
    config: SessionConfig,
    started_at: DateTime<Utc>,
    clock: SessionClock,
    running: Arc<AtomicBool>,
    stop: Arc<Notify>,
    tally: Arc<Mutex<Tally>>,
    events: broadcast::Sender<PacerEvent>,
    feedback: Arc<dyn FeedbackSink>,
    task: Mutex<Option<JoinHandle<()>>>,
    backend: Arc<Mutex<Option<Box<dyn AudioBackend>>>>,
}

impl MealSession {
    pub fn new(
        config: SessionConfig,
        feedback: Arc<dyn FeedbackSink>,
        events: broadcast::Sender<PacerEvent>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            started_at: Utc::now(),
            clock: SessionClock::new(),
            running: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(Notify::new()),
            tally: Arc::new(Mutex::new(Tally::default())),
            events,
            feedback,
            task: Mutex::new(None),
            backend: Arc::new(Mutex::new(None)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> PacingMode {
        self.config.mode
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the session's driver task
    pub async fn start(&self, driver: SessionDriver) -> Result<()> {
        info!("Starting meal session {} ({:?})", self.id, self.config.mode);
        self.running.store(true, Ordering::SeqCst);

        let handle = match driver {
            SessionDriver::Timer => self.spawn_timer_task(),
            SessionDriver::Amplitude(mut backend) => {
                let rx = backend.start().await?;
                *self.backend.lock().await = Some(backend);
                self.spawn_amplitude_task(rx)
            }
            SessionDriver::Classifier(mut backend, classifier) => {
                let rx = backend.start().await?;
                *self.backend.lock().await = Some(backend);
                self.spawn_classifier_task(rx, classifier)
            }
        };

        *self.task.lock().await = Some(handle);
        Ok(())
    }

    /// End the session and seal it into an immutable record
    ///
    /// Teardown is best-effort: backend stop failures and task join failures
    /// are logged, never returned.
    pub async fn end(&self) -> SessionRecord {
        info!("Ending meal session {}", self.id);
        self.running.store(false, Ordering::SeqCst);
        self.stop.notify_waiters();

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                error!("Session task panicked: {}", e);
            }
        }

        if let Some(mut backend) = self.backend.lock().await.take() {
            if let Err(e) = backend.stop().await {
                error!("Failed to stop audio backend: {}", e);
            }
        }

        if let Err(e) = self.feedback.emit(FeedbackKind::MealComplete).await {
            warn!("Feedback sink failed on meal completion: {}", e);
        }

        let ended_at = Utc::now();
        let mut tally = self.tally.lock().await;

        if tally.windows_dropped > 0 {
            info!(
                "Session {} dropped {} windows while inference was busy",
                self.id, tally.windows_dropped
            );
        }

        SessionRecord {
            id: self.id.clone(),
            started_at: self.started_at,
            ended_at,
            mode: self.config.mode,
            target_interval_secs: self.config.target_interval_secs,
            elapsed_secs: tally.elapsed_secs,
            event_count: tally.event_count,
            date: self.started_at.format("%Y-%m-%d").to_string(),
            detection_log: tally.detection_log.take().map(|log| log.into_entries()),
        }
    }

    /// Wait for the driver task to finish on its own (stream exhausted)
    pub async fn wait_for_driver(&self) {
        let handle = self.task.lock().await.take();
        if let Some(task) = handle {
            if let Err(e) = task.await {
                error!("Session task panicked: {}", e);
            }
        }
    }

    pub async fn status(&self) -> SessionStatus {
        let tally = self.tally.lock().await;
        SessionStatus {
            session_id: self.id.clone(),
            mode: self.config.mode,
            running: self.is_running(),
            target_interval_secs: self.config.target_interval_secs,
            elapsed_secs: tally.elapsed_secs,
            event_count: tally.event_count,
            current_amplitude: tally.current_amplitude,
            detected_class: tally.last_class.as_ref().map(|(name, _)| name.clone()),
            confidence: tally.last_class.as_ref().map(|(_, conf)| *conf),
        }
    }

    fn spawn_timer_task(&self) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        let stop = Arc::clone(&self.stop);
        let tally = Arc::clone(&self.tally);
        let events = self.events.clone();
        let feedback = Arc::clone(&self.feedback);
        let clock = self.clock.clone();
        let target = self.config.target_interval_secs;

        tokio::spawn(async move {
            let mut timer = PacingTimer::new(target);
            timer.start();

            let mut interval = time::interval(Duration::from_secs(1));
            // The first tick completes immediately; consume it so elapsed
            // seconds stay aligned with wall time.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = stop.notified() => break,
                    _ = interval.tick() => {}
                }

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let now_ms = clock.now_ms();
                let fired = timer.tick(now_ms);

                {
                    let mut tally = tally.lock().await;
                    tally.elapsed_secs = timer.elapsed_secs();
                    if fired.is_some() {
                        tally.event_count += 1;
                    }
                }

                if let Some(event) = fired {
                    info!(
                        "Interval {} complete at {}s",
                        event.trigger_index,
                        timer.elapsed_secs()
                    );
                    if let Err(e) = feedback.emit(FeedbackKind::IntervalReminder).await {
                        warn!("Feedback sink failed: {}", e);
                    }
                    let _ = events.send(PacerEvent::Interval(event));
                }
            }
        })
    }

    fn spawn_amplitude_task(&self, mut rx: mpsc::Receiver<AudioFrame>) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        let stop = Arc::clone(&self.stop);
        let tally = Arc::clone(&self.tally);
        let events = self.events.clone();
        let feedback = Arc::clone(&self.feedback);
        let detector_config = self.config.detector.clone();
        let target_ms = self.config.target_interval_secs as u64 * 1000;

        tokio::spawn(async move {
            let mut detector = AmplitudeDetector::new(detector_config.clone());

            loop {
                let frame = tokio::select! {
                    _ = stop.notified() => break,
                    frame = rx.recv() => match frame {
                        Some(frame) => frame,
                        None => break, // stream ended
                    },
                };

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let now_ms = frame.timestamp_ms;
                let energy = band_energy(
                    &frame.samples,
                    frame.sample_rate,
                    detector_config.min_frequency_hz,
                    detector_config.max_frequency_hz,
                );

                let bite = detector.update(energy, now_ms);

                {
                    let mut tally = tally.lock().await;
                    tally.current_amplitude = detector.current_amplitude();
                    tally.elapsed_secs = now_ms / 1000;
                }

                if let Some(bite) = bite {
                    handle_bite(&bite, target_ms, &tally, &events, &feedback).await;
                }
            }
        })
    }

    fn spawn_classifier_task(
        &self,
        mut rx: mpsc::Receiver<AudioFrame>,
        classifier: Arc<dyn SoundClassifier>,
    ) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        let stop = Arc::clone(&self.stop);
        let tally = Arc::clone(&self.tally);
        let events = self.events.clone();
        let feedback = Arc::clone(&self.feedback);
        let detector_config = self.config.detector.clone();
        let target_ms = self.config.target_interval_secs as u64 * 1000;
        let window_samples = self.config.window_samples;

        tokio::spawn(async move {
            let mut detector = ClassifierDetector::new(detector_config);
            let slot = InferenceSlot::new();
            let class_names: Vec<String> = classifier.class_names().to_vec();

            // Completed inferences come back tagged with the window timestamp
            let (result_tx, mut result_rx) =
                mpsc::channel::<(u64, Result<Vec<f32>, PacerError>)>(4);

            let mut buffer: Vec<f32> = Vec::with_capacity(window_samples * 2);
            let mut stream_done = false;

            loop {
                tokio::select! {
                    _ = stop.notified() => break,
                    frame = rx.recv(), if !stream_done => {
                        let Some(frame) = frame else {
                            stream_done = true;
                            if !slot.is_busy() {
                                break;
                            }
                            continue;
                        };

                        if !running.load(Ordering::SeqCst) {
                            break;
                        }

                        let frame_end_ms = frame.timestamp_ms
                            + (frame.samples.len() as u64 * 1000)
                                / frame.sample_rate.max(1) as u64;
                        buffer.extend_from_slice(&frame.samples);

                        while buffer.len() >= window_samples {
                            let window: Vec<f32> = buffer.drain(..window_samples).collect();

                            match slot.try_acquire() {
                                Some(guard) => {
                                    let classifier = Arc::clone(&classifier);
                                    let result_tx = result_tx.clone();
                                    tokio::spawn(async move {
                                        let result = classifier.classify(&window).await;
                                        // Free the slot before handing the
                                        // result back so the next window can
                                        // start immediately.
                                        drop(guard);
                                        let _ = result_tx.send((frame_end_ms, result)).await;
                                    });
                                }
                                None => {
                                    // One inference at a time; reject, never queue
                                    warn!("Inference in flight, dropping window");
                                    tally.lock().await.windows_dropped += 1;
                                }
                            }
                        }
                    },
                    result = result_rx.recv() => {
                        let Some((window_ms, result)) = result else { break };
                        apply_classification(
                            &mut detector,
                            &class_names,
                            window_ms,
                            result,
                            target_ms,
                            &tally,
                            &events,
                            &feedback,
                        )
                        .await;

                        if stream_done && !slot.is_busy() {
                            break;
                        }
                    },
                }
            }

            // The audit log survives the task for the sealed record
            tally.lock().await.detection_log = Some(detector.into_log());
        })
    }
}

/// Tally, broadcast, and feedback for one credited bite
async fn handle_bite(
    bite: &BiteEvent,
    target_ms: u64,
    tally: &Arc<Mutex<Tally>>,
    events: &broadcast::Sender<PacerEvent>,
    feedback: &Arc<dyn FeedbackSink>,
) {
    let too_fast = bite
        .interval_since_last_ms
        .map(|interval| interval < target_ms)
        .unwrap_or(false);

    if too_fast {
        tally.lock().await.event_count += 1;
        if let Err(e) = feedback.emit(FeedbackKind::BiteWarning).await {
            warn!("Feedback sink failed: {}", e);
        }
    }

    info!(
        "Bite detected at {}ms (interval {:?}ms, too_fast {})",
        bite.timestamp_ms, bite.interval_since_last_ms, too_fast
    );
    let _ = events.send(PacerEvent::Bite(bite.clone()));
}

/// Judge one completed inference and propagate its consequences
#[allow(clippy::too_many_arguments)]
async fn apply_classification(
    detector: &mut ClassifierDetector,
    class_names: &[String],
    window_ms: u64,
    result: Result<Vec<f32>, PacerError>,
    target_ms: u64,
    tally: &Arc<Mutex<Tally>>,
    events: &broadcast::Sender<PacerEvent>,
    feedback: &Arc<dyn FeedbackSink>,
) {
    let scores = match result {
        Ok(scores) => scores,
        Err(e) => {
            // Transient per-window failure: logged and skipped, never fatal
            warn!("Audio processing error: {}", e);
            return;
        }
    };

    let Some((idx, confidence)) = arg_max(&scores) else {
        return;
    };
    let class_name = class_names
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("Class {}", idx));

    let observation = detector.observe(&class_name, confidence, window_ms, window_ms / 1000);

    {
        let mut tally = tally.lock().await;
        tally.last_class = Some((class_name, confidence));
        tally.elapsed_secs = window_ms / 1000;
    }

    if let Some(entry) = observation.log_entry {
        let _ = events.send(PacerEvent::Detection(entry));
    }

    if let Some(bite) = observation.bite {
        handle_bite(&bite, target_ms, tally, events, feedback).await;
    }
}
