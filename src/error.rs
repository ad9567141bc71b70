use thiserror::Error;

/// Result type alias for engine operations
pub type PacerResult<T> = Result<T, PacerError>;

/// Errors produced by the pacing engine and its collaborators
#[derive(Debug, Error)]
pub enum PacerError {
    /// Microphone permission was refused by the platform
    #[error("microphone permission denied")]
    PermissionDenied,

    /// The user declined the permission prompt
    #[error("microphone permission request cancelled")]
    PermissionCancelled,

    /// Classifier model failed to load; Listening mode stays unavailable
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// Per-window inference failure; logged and skipped, never fatal
    #[error("processing error: {0}")]
    Processing(String),

    /// Best-effort resource release failure; never blocks session end
    #[error("teardown error: {0}")]
    Teardown(String),

    /// A session is already running; it must be sealed first
    #[error("a session is already active")]
    SessionActive,

    /// No session is running
    #[error("no active session")]
    NoActiveSession,

    /// Meal history persistence failure
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
