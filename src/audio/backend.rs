//! Playback backend seam.
//!
//! The session controller never touches audio hardware directly.  It asks an
//! [`AudioBackend`] to load a [`PlayableResource`] and gets back a
//! [`Playable`] it owns until teardown.

use async_trait::async_trait;

use super::{AudioError, PlayableResource};

/// Loads clips into playable handles.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn AudioBackend>` by every session.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    async fn load(&self, resource: &PlayableResource) -> Result<Box<dyn Playable>, AudioError>;
}

/// One loaded clip.
///
/// # Contract
///
/// - `play` and `replay` resolve when playback finishes or the clip is
///   unloaded, whichever happens first.
/// - `unload` releases the underlying resource; the session calls it
///   exactly once per handle.
#[async_trait]
pub trait Playable: Send + Sync {
    async fn play(&self) -> Result<(), AudioError>;

    /// Restart from the beginning.
    async fn replay(&self) -> Result<(), AudioError>;

    async fn unload(&self);
}

// Compile-time assertion: Box<dyn AudioBackend> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioBackend>, _: Box<dyn Playable>) {}
};

// ---------------------------------------------------------------------------
// MockBackend  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockBackend;
