use std::sync::Arc;

use crate::engine::PacerEngine;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The pacing engine; enforces the one-active-session rule itself
    pub engine: Arc<PacerEngine>,
}

impl AppState {
    pub fn new(engine: Arc<PacerEngine>) -> Self {
        Self { engine }
    }
}
