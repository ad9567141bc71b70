use super::state::AppState;
use crate::audio::AudioSource;
use crate::error::PacerError;
use crate::session::{DetectorKind, PacingMode};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Pacing mode as requested over the wire
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedMode {
    Timer,
    Amplitude,
    Classifier,
}

impl From<RequestedMode> for PacingMode {
    fn from(mode: RequestedMode) -> Self {
        match mode {
            RequestedMode::Timer => PacingMode::Timer,
            RequestedMode::Amplitude => PacingMode::Listening {
                detector: DetectorKind::Amplitude,
            },
            RequestedMode::Classifier => PacingMode::Listening {
                detector: DetectorKind::Classifier,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Pacing mode (default: timer)
    pub mode: Option<RequestedMode>,

    /// Target seconds between bites / reminders (default from config)
    pub interval_secs: Option<u32>,

    /// Optional WAV file standing in for the microphone
    pub wav_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /session/start
/// Start a meal session; the response carries the resolved mode so a
/// permission fallback is visible to the caller
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    let requested: PacingMode = req.mode.unwrap_or(RequestedMode::Timer).into();
    let source = req.wav_path.map(|path| AudioSource::File(path.into()));

    info!("Starting session, requested mode {:?}", requested);

    match state
        .engine
        .start_session(requested, req.interval_secs, source)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /session/end
/// Seal the active session and return its record
pub async fn end_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.end_session().await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /session/status
pub async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.status().await {
        Some(status) => (StatusCode::OK, Json(status)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no active session".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /history
pub async fn history(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.history().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /history/stats
pub async fn history_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.history_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: PacerError) -> axum::response::Response {
    let status = match &err {
        PacerError::SessionActive => StatusCode::CONFLICT,
        PacerError::NoActiveSession => StatusCode::NOT_FOUND,
        PacerError::PermissionDenied | PacerError::PermissionCancelled => StatusCode::FORBIDDEN,
        PacerError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
