//! Audio: clip resolution, playback backends and the per-screen session.
//!
//! # Pipeline
//!
//! ```text
//! clip id ──ClipResolver──▶ PlayableResource ──AudioBackend::load──▶ Playable
//!                                                                     │
//!                             AudioSession (one live handle) ◀────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::path::Path;
//! use vocab_trainer::audio::{AssetMap, AudioSession, SilentBackend};
//!
//! # async fn demo() -> Result<(), vocab_trainer::audio::AudioError> {
//! let map = AssetMap::load_from(Path::new("asset-map.json"), "assets")?;
//! let session = AudioSession::new(Arc::new(map), Arc::new(SilentBackend::default()));
//! session.load_and_play("ja_coffee.mp3").await?;
//! session.teardown().await;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod resolver;
pub mod session;
pub mod silent;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{AudioBackend, Playable};
pub use resolver::{AssetMap, ClipResolver, PlayableResource};
pub use session::{AudioSession, ClipHandle, SessionState};
pub use silent::SilentBackend;

#[cfg(test)]
pub use backend::MockBackend;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Errors from loading or playing clips.  All of them are recoverable: the
/// session stays usable after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The resolver has no resource for this clip id.
    #[error("no audio for clip {0}")]
    ClipMissing(String),

    #[error("failed to load {clip_id}: {reason}")]
    LoadFailed { clip_id: String, reason: String },

    #[error("playback of {clip_id} failed: {reason}")]
    PlaybackFailed { clip_id: String, reason: String },

    /// A newer load (or a teardown) started while this one was in flight.
    #[error("load of {0} superseded")]
    Superseded(String),

    #[error("handle for {0} is no longer current")]
    StaleHandle(String),

    #[error("asset map: {0}")]
    AssetMap(String),
}
