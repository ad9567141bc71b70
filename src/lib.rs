pub mod audio;
pub mod classify;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod http;
pub mod lifecycle;
pub mod session;
pub mod store;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFile, AudioFrame, AudioSource,
    ScriptedBackend,
};
pub use classify::{ClassMap, ScriptedClassifier, SoundClassifier};
pub use config::Config;
pub use detect::{
    AmplitudeDetector, BiteEvent, BiteSource, ClassifierDetector, DetectionLog, DetectionLogEntry,
    DetectorConfig, InferenceSlot,
};
pub use engine::{PacerEngine, StartOutcome};
pub use error::{PacerError, PacerResult};
pub use feedback::{FeedbackKind, FeedbackSink, FeedbackStyle, LogFeedback};
pub use http::{create_router, AppState};
pub use lifecycle::{LifecycleCoordinator, ModelState, PermissionOutcome, PermissionState};
pub use session::{
    DetectorKind, IntervalEvent, MealSession, PacerEvent, PacingMode, PacingTimer, SessionConfig,
    SessionRecord, SessionStatus,
};
pub use store::{history_stats, HistoryStats, JsonFileStore, MealStore};
