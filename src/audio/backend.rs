use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::lifecycle::PermissionOutcome;

/// Audio sample data (f32 mono, normalized to [-1, 1])
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for audio capture backends
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Target sample rate (classifier windows expect 16kHz mono)
    pub sample_rate: u32,
    /// Samples per delivered frame
    pub frame_samples: usize,
    /// Pace frame delivery at real time (false = deliver as fast as possible)
    pub paced: bool,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz mono, the classifier's input rate
            frame_samples: 800, // 50ms at 16kHz, the amplitude analysis cadence
            paced: true,
        }
    }
}

/// Audio capture backend trait
///
/// Permission is requested as a separate step so refusal can be surfaced as a
/// distinct outcome before any capture resources are acquired.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Request microphone permission from the platform
    async fn request_permission(&mut self) -> Result<PermissionOutcome>;

    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. The sender
    /// side closes when the stream ends or the backend is stopped.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio and release the stream
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio source type
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Live microphone input
    Microphone,
    /// WAV file input (offline analysis, batch processing)
    File(PathBuf),
    /// Pre-built frames with a fixed permission outcome (tests, demos)
    Scripted {
        frames: Vec<AudioFrame>,
        permission: PermissionOutcome,
    },
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    /// Create an audio backend for the given source
    pub fn create(source: AudioSource, config: AudioBackendConfig) -> Result<Box<dyn AudioBackend>> {
        match source {
            AudioSource::Microphone => {
                anyhow::bail!("microphone capture backend is not available in this build")
            }
            AudioSource::File(path) => {
                let backend = super::file::WavFileBackend::new(path, config)?;
                Ok(Box::new(backend))
            }
            AudioSource::Scripted { frames, permission } => Ok(Box::new(
                super::scripted::ScriptedBackend::new(frames, permission),
            )),
        }
    }
}
