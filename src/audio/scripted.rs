use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;

use super::backend::{AudioBackend, AudioFrame};
use crate::lifecycle::PermissionOutcome;

/// Capture backend that delivers a pre-built frame sequence
///
/// The permission outcome is fixed at construction, which makes denial and
/// cancellation paths reproducible end to end.
pub struct ScriptedBackend {
    frames: Vec<AudioFrame>,
    permission: PermissionOutcome,
    frame_delay: Option<Duration>,
    paced: bool,
    capturing: bool,
}

impl ScriptedBackend {
    pub fn new(frames: Vec<AudioFrame>, permission: PermissionOutcome) -> Self {
        Self {
            frames,
            permission,
            frame_delay: None,
            paced: true,
            capturing: false,
        }
    }

    /// Backend that grants permission and replays the given frames
    pub fn granted(frames: Vec<AudioFrame>) -> Self {
        Self::new(frames, PermissionOutcome::Granted)
    }

    /// Fixed delay between frames, overriding real-time pacing
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    /// Pace playback at each frame's real-time duration (default true)
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn request_permission(&mut self) -> Result<PermissionOutcome> {
        Ok(self.permission)
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.permission != PermissionOutcome::Granted {
            anyhow::bail!("scripted backend started without permission");
        }

        let (tx, rx) = mpsc::channel(4);
        let frames = self.frames.clone();
        let frame_delay = self.frame_delay;
        let paced = self.paced;

        tokio::spawn(async move {
            for frame in frames {
                let delay = frame_delay.or_else(|| {
                    paced.then(|| {
                        Duration::from_millis(
                            frame.samples.len() as u64 * 1000 / frame.sample_rate.max(1) as u64,
                        )
                    })
                });
                if tx.send(frame).await.is_err() {
                    break;
                }
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
            }
        });

        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
