//! Audio session controller.
//!
//! One [`AudioSession`] belongs to one screen and owns at most one loaded
//! clip at a time.  Every `load` bumps a request generation; a load that
//! finishes after a newer one started is unloaded on the spot and reported
//! as [`AudioError::Superseded`], so the most recent request always wins.
//!
//! ```text
//!   Idle ──load──▶ Loading ──ok──▶ Loaded ──play──▶ Playing ──done──▶ Loaded
//!    ▲               │ missing/failed                                  │
//!    └───────────────┴──────────────── teardown ◀──────────────────────┘
//! ```
//!
//! The internal lock is a `std::sync::Mutex` and is never held across an
//! `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{AudioBackend, AudioError, ClipResolver, Playable};

// ---------------------------------------------------------------------------
// SessionState / ClipHandle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Loaded,
    Playing,
}

/// Ticket for the clip a `load` call produced.
///
/// A handle stops being valid as soon as the session loads something else
/// or is torn down; using it afterwards yields [`AudioError::StaleHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipHandle {
    clip_id: String,
    generation: u64,
}

impl ClipHandle {
    pub fn clip_id(&self) -> &str {
        &self.clip_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct Loaded {
    handle: ClipHandle,
    playable: Arc<dyn Playable>,
}

struct Inner {
    generation: u64,
    state: SessionState,
    current: Option<Loaded>,
}

// ---------------------------------------------------------------------------
// AudioSession
// ---------------------------------------------------------------------------

pub struct AudioSession {
    resolver: Arc<dyn ClipResolver>,
    backend: Arc<dyn AudioBackend>,
    inner: Mutex<Inner>,
}

impl AudioSession {
    pub fn new(resolver: Arc<dyn ClipResolver>, backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            resolver,
            backend,
            inner: Mutex::new(Inner {
                generation: 0,
                state: SessionState::Idle,
                current: None,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Clip id of the handle currently held, if any.
    pub fn current_clip(&self) -> Option<String> {
        self.lock()
            .current
            .as_ref()
            .map(|l| l.handle.clip_id.clone())
    }

    /// Load `clip_id`, releasing whatever the session held before.
    ///
    /// # Errors
    ///
    /// - [`AudioError::ClipMissing`] when the resolver knows no such clip.
    /// - [`AudioError::LoadFailed`] when the backend cannot open it.
    /// - [`AudioError::Superseded`] when another `load` or a `teardown`
    ///   started while this one was in flight.
    pub async fn load(&self, clip_id: &str) -> Result<ClipHandle, AudioError> {
        let (generation, previous) = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = SessionState::Loading;
            (inner.generation, inner.current.take())
        };

        if let Some(prev) = previous {
            log::debug!("audio: releasing {} for {clip_id}", prev.handle.clip_id);
            prev.playable.unload().await;
        }

        let Some(resource) = self.resolver.resolve(clip_id) else {
            log::debug!("audio: no resource for clip {clip_id}");
            self.settle_failed(generation);
            return Err(AudioError::ClipMissing(clip_id.to_string()));
        };

        let playable: Arc<dyn Playable> = match self.backend.load(&resource).await {
            Ok(p) => Arc::from(p),
            Err(e) => {
                log::warn!("audio: load of {clip_id} failed: {e}");
                self.settle_failed(generation);
                return Err(e);
            }
        };

        let handle = ClipHandle {
            clip_id: clip_id.to_string(),
            generation,
        };

        let installed = {
            let mut inner = self.lock();
            if inner.generation == generation {
                inner.current = Some(Loaded {
                    handle: handle.clone(),
                    playable: Arc::clone(&playable),
                });
                inner.state = SessionState::Loaded;
                true
            } else {
                false
            }
        };

        if !installed {
            log::debug!("audio: load of {clip_id} superseded, unloading");
            playable.unload().await;
            return Err(AudioError::Superseded(clip_id.to_string()));
        }

        log::debug!("audio: loaded {clip_id} (generation {generation})");
        Ok(handle)
    }

    pub async fn play(&self, handle: &ClipHandle) -> Result<(), AudioError> {
        self.run(handle, false).await
    }

    /// Play `handle` again from the start.
    pub async fn replay(&self, handle: &ClipHandle) -> Result<(), AudioError> {
        self.run(handle, true).await
    }

    /// Load and immediately play `clip_id`.
    pub async fn load_and_play(&self, clip_id: &str) -> Result<(), AudioError> {
        let handle = self.load(clip_id).await?;
        self.play(&handle).await
    }

    /// Release the current handle.  Safe to call in any state, any number of
    /// times; an in-flight `load` will come back `Superseded`.
    pub async fn teardown(&self) {
        let previous = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = SessionState::Idle;
            inner.current.take()
        };
        if let Some(prev) = previous {
            log::debug!("audio: teardown {}", prev.handle.clip_id);
            prev.playable.unload().await;
        }
    }

    async fn run(&self, handle: &ClipHandle, replay: bool) -> Result<(), AudioError> {
        let playable = {
            let mut inner = self.lock();
            let playable = match inner.current.as_ref() {
                Some(l) if l.handle == *handle => Arc::clone(&l.playable),
                _ => return Err(AudioError::StaleHandle(handle.clip_id.clone())),
            };
            inner.state = SessionState::Playing;
            playable
        };

        let result = if replay {
            playable.replay().await
        } else {
            playable.play().await
        };

        {
            let mut inner = self.lock();
            let still_current = matches!(&inner.current, Some(l) if l.handle == *handle);
            if still_current && inner.state == SessionState::Playing {
                inner.state = SessionState::Loaded;
            }
        }

        result.map_err(|e| {
            log::warn!("audio: playback of {} failed: {e}", handle.clip_id);
            match e {
                AudioError::PlaybackFailed { .. } => e,
                other => AudioError::PlaybackFailed {
                    clip_id: handle.clip_id.clone(),
                    reason: other.to_string(),
                },
            }
        })
    }

    fn settle_failed(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation {
            inner.state = SessionState::Idle;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        let Some(loaded) = inner.current.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move { loaded.playable.unload().await });
            }
            Err(_) => log::warn!(
                "audio: session dropped outside a runtime, {} not unloaded",
                loaded.handle.clip_id
            ),
        }
    }
}
