use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use crate::lifecycle::PermissionOutcome;

/// A fully decoded WAV file
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Convert to f32 mono, summing channels with clipping
    pub fn to_mono_f32(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.iter().map(|s| *s as f32 / 32768.0).collect();
        }

        let ch = self.channels as usize;
        self.samples
            .chunks_exact(ch)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|s| *s as i32).sum();
                let mono = sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
                mono as f32 / 32768.0
            })
            .collect()
    }
}

/// Capture backend that replays a WAV file as a stream of frames
///
/// Permission is always granted; the file stands in for a microphone during
/// offline analysis and batch runs.
pub struct WavFileBackend {
    file: AudioFile,
    config: AudioBackendConfig,
    task: Option<JoinHandle<()>>,
    capturing: bool,
}

impl WavFileBackend {
    pub fn new(path: impl AsRef<Path>, config: AudioBackendConfig) -> Result<Self> {
        let file = AudioFile::open(path)?;
        Ok(Self {
            file,
            config,
            task: None,
            capturing: false,
        })
    }
}

#[async_trait::async_trait]
impl AudioBackend for WavFileBackend {
    async fn request_permission(&mut self) -> Result<PermissionOutcome> {
        Ok(PermissionOutcome::Granted)
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(4);

        let samples = self.file.to_mono_f32();
        let sample_rate = self.file.sample_rate;
        let frame_samples = self.config.frame_samples;
        let paced = self.config.paced;
        let frame_ms = (frame_samples as u64 * 1000) / sample_rate as u64;

        let task = tokio::spawn(async move {
            let mut timestamp_ms: u64 = 0;
            for chunk in samples.chunks(frame_samples) {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    timestamp_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
                timestamp_ms += frame_ms;
                if paced {
                    tokio::time::sleep(Duration::from_millis(frame_ms)).await;
                }
            }
        });

        self.task = Some(task);
        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "wav-file"
    }
}
