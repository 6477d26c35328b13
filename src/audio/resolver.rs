//! Clip resolver: clip id → loadable audio resource.
//!
//! The production resolver is an [`AssetMap`] read from the JSON file the
//! offline asset step emits:
//!
//! ```text
//! { "ja_coffee.mp3": "japan/ja_coffee.mp3", "en_coffee.mp3": "english/en_coffee.mp3" }
//! ```
//!
//! Relative paths are resolved against the asset root.  Clips the asset
//! step could not find are simply absent, so callers must treat `None` as
//! "nothing to play".

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::AudioError;

/// A clip that can be handed to an [`AudioBackend`](super::AudioBackend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableResource {
    pub clip_id: String,
    pub path: PathBuf,
}

/// Read-only lookup shared by every audio session.
pub trait ClipResolver: Send + Sync {
    fn resolve(&self, clip_id: &str) -> Option<PlayableResource>;
}

// ---------------------------------------------------------------------------
// AssetMap
// ---------------------------------------------------------------------------

/// Precomputed clip id → file map.
#[derive(Debug, Clone, Default)]
pub struct AssetMap {
    root: PathBuf,
    entries: HashMap<String, PathBuf>,
}

impl AssetMap {
    /// Empty map whose relative entries resolve under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    /// Load the JSON map at `path`.
    pub fn load_from(path: &Path, root: impl Into<PathBuf>) -> Result<Self, AudioError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AudioError::AssetMap(format!("{}: {e}", path.display())))?;
        let entries: HashMap<String, PathBuf> = serde_json::from_str(&data)
            .map_err(|e| AudioError::AssetMap(format!("{}: {e}", path.display())))?;

        log::info!(
            "audio: asset map with {} clips from {}",
            entries.len(),
            path.display()
        );
        Ok(Self {
            root: root.into(),
            entries,
        })
    }

    pub fn insert(&mut self, clip_id: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(clip_id.into(), path.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ClipResolver for AssetMap {
    fn resolve(&self, clip_id: &str) -> Option<PlayableResource> {
        let path = self.entries.get(clip_id)?;
        let path = if path.is_absolute() {
            path.clone()
        } else {
            self.root.join(path)
        };
        Some(PlayableResource {
            clip_id: clip_id.to_string(),
            path,
        })
    }
}
