use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::SoundClassifier;
use crate::error::{PacerError, PacerResult};

/// Classifier that replays a scripted sequence of score vectors
///
/// Each `classify` call returns the next scripted result; past the end of the
/// script, the last result repeats. Used by tests and offline demos in place
/// of a real inference runtime.
pub struct ScriptedClassifier {
    names: Vec<String>,
    script: Vec<Vec<f32>>,
    cursor: AtomicUsize,
    loaded: AtomicBool,
    load_delay: Option<Duration>,
    fail_load: bool,
    load_gate: Mutex<()>,
    loads_performed: AtomicUsize,
    invocations: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new(names: Vec<String>, script: Vec<Vec<f32>>) -> Self {
        Self {
            names,
            script,
            cursor: AtomicUsize::new(0),
            loaded: AtomicBool::new(false),
            load_delay: None,
            fail_load: false,
            load_gate: Mutex::new(()),
            loads_performed: AtomicUsize::new(0),
            invocations: AtomicUsize::new(0),
        }
    }

    /// Build a script that emits `(class_name, confidence)` argmax results.
    ///
    /// Score vectors are one-hot over the union of the given class names.
    pub fn from_detections(detections: &[(&str, f32)]) -> Self {
        let mut names: Vec<String> = Vec::new();
        for (name, _) in detections {
            if !names.iter().any(|n| n == name) {
                names.push((*name).to_string());
            }
        }

        let script = detections
            .iter()
            .map(|(name, confidence)| {
                let mut scores = vec![0.0f32; names.len()];
                let idx = names.iter().position(|n| n == name).unwrap_or(0);
                scores[idx] = *confidence;
                scores
            })
            .collect();

        Self::new(names, script)
    }

    /// Simulate a slow model load
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Make `load` fail
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Number of loads actually performed (idempotence check)
    pub fn loads_performed(&self) -> usize {
        self.loads_performed.load(Ordering::SeqCst)
    }

    /// Number of `classify` calls made
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SoundClassifier for ScriptedClassifier {
    async fn load(&self) -> PacerResult<()> {
        if self.loaded.load(Ordering::SeqCst) {
            return Ok(());
        }

        // Serialize concurrent loads; the loser of the race finds the model
        // already loaded and returns without loading again.
        let _gate = self.load_gate.lock().await;
        if self.loaded.load(Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_load {
            return Err(PacerError::ModelLoad("scripted load failure".to_string()));
        }

        self.loads_performed.fetch_add(1, Ordering::SeqCst);
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn classify(&self, _window: &[f32]) -> PacerResult<Vec<f32>> {
        if !self.is_loaded() {
            return Err(PacerError::Processing(
                "classifier model not loaded".to_string(),
            ));
        }

        self.invocations.fetch_add(1, Ordering::SeqCst);

        if self.script.is_empty() {
            return Ok(vec![0.0; self.names.len().max(1)]);
        }

        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        let idx = idx.min(self.script.len() - 1);
        Ok(self.script[idx].clone())
    }

    fn class_names(&self) -> &[String] {
        &self.names
    }
}
