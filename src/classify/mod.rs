//! Sound classification collaborator
//!
//! The engine treats the classifier model as opaque: loading is a separate
//! asynchronous step with its own success/failure outcome, and inference maps
//! a fixed-size audio window to a probability vector over a fixed class
//! taxonomy.

pub mod class_map;
pub mod scripted;

use crate::error::PacerResult;

pub use class_map::ClassMap;
pub use scripted::ScriptedClassifier;

/// Sound classifier trait
///
/// `load` must be idempotent: concurrent calls perform at most one load.
#[async_trait::async_trait]
pub trait SoundClassifier: Send + Sync {
    /// Load the model; one-time, never retried automatically
    async fn load(&self) -> PacerResult<()>;

    /// Whether the model is ready for inference
    fn is_loaded(&self) -> bool;

    /// Classify one audio window, returning a score per taxonomy class
    async fn classify(&self, window: &[f32]) -> PacerResult<Vec<f32>>;

    /// Class display names, indexed like the score vector
    fn class_names(&self) -> &[String];
}

/// Index and score of the highest-scoring class, or None for an empty vector
pub fn arg_max(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, s)) if score <= s => {}
            _ => best = Some((i, score)),
        }
    }
    best
}

/// Classifier that reports the model backend as unavailable
///
/// Stands in when no inference runtime is built in; `load` surfaces a model
/// load failure and the lifecycle keeps Listening mode unavailable.
pub struct UnavailableClassifier {
    names: Vec<String>,
}

impl UnavailableClassifier {
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }
}

impl Default for UnavailableClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SoundClassifier for UnavailableClassifier {
    async fn load(&self) -> PacerResult<()> {
        Err(crate::error::PacerError::ModelLoad(
            "model inference backend is not available in this build".to_string(),
        ))
    }

    fn is_loaded(&self) -> bool {
        false
    }

    async fn classify(&self, _window: &[f32]) -> PacerResult<Vec<f32>> {
        Err(crate::error::PacerError::Processing(
            "classifier model not loaded".to_string(),
        ))
    }

    fn class_names(&self) -> &[String] {
        &self.names
    }
}
