//! Headless playback backend.
//!
//! [`SilentBackend`] checks that a clip's file exists, then "plays" it by
//! logging and waiting for a fixed clip length.  The command-line driver
//! uses it so sequences keep their real timing without an audio device.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{AudioBackend, AudioError, Playable, PlayableResource};

pub struct SilentBackend {
    clip_length: Duration,
}

impl SilentBackend {
    pub fn new(clip_length: Duration) -> Self {
        Self { clip_length }
    }
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl AudioBackend for SilentBackend {
    async fn load(&self, resource: &PlayableResource) -> Result<Box<dyn Playable>, AudioError> {
        if tokio::fs::metadata(&resource.path).await.is_err() {
            return Err(AudioError::LoadFailed {
                clip_id: resource.clip_id.clone(),
                reason: format!("file not found: {}", resource.path.display()),
            });
        }
        Ok(Box::new(SilentClip {
            clip_id: resource.clip_id.clone(),
            path: resource.path.clone(),
            clip_length: self.clip_length,
            unloaded: AtomicBool::new(false),
            stop: Notify::new(),
        }))
    }
}

struct SilentClip {
    clip_id: String,
    path: PathBuf,
    clip_length: Duration,
    unloaded: AtomicBool,
    stop: Notify,
}

impl SilentClip {
    async fn run(&self, verb: &str) -> Result<(), AudioError> {
        let stopped = self.stop.notified();
        if self.unloaded.load(Ordering::SeqCst) {
            return Err(AudioError::PlaybackFailed {
                clip_id: self.clip_id.clone(),
                reason: "clip already unloaded".into(),
            });
        }

        log::info!("audio: {verb} {} ({})", self.clip_id, self.path.display());
        tokio::select! {
            _ = tokio::time::sleep(self.clip_length) => {}
            _ = stopped => log::debug!("audio: {} cut short", self.clip_id),
        }
        Ok(())
    }
}

#[async_trait]
impl Playable for SilentClip {
    async fn play(&self) -> Result<(), AudioError> {
        self.run("play").await
    }

    async fn replay(&self) -> Result<(), AudioError> {
        self.run("replay").await
    }

    async fn unload(&self) {
        if !self.unloaded.swap(true, Ordering::SeqCst) {
            self.stop.notify_waiters();
        }
    }
}
