//! Durable progress store and the stage state machine.
//!
//! [`ProgressStore`] is the only way to change a word's stage.  Every
//! mutation is written to disk before the call returns, through a temp file
//! and a rename so a half-written file is never observed.
//!
//! # Advancement rule
//!
//! ```text
//! set_stage(id, s, force = false)  → applied only if s > current
//! set_stage(id, s, force = true)   → applied unconditionally
//! s outside 0..=4                  → ignored
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::legacy::{migrate_legacy, read_entries, LegacyStore, LEGACY_PROGRESS_KEY};
use super::{ProgressError, ProgressRecord, Stage};
use crate::config::ProgressConfig;

// ---------------------------------------------------------------------------
// StageUpdate
// ---------------------------------------------------------------------------

/// What a stage mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageUpdate {
    /// The stored stage changed.
    Changed { from: Stage, to: Stage },
    /// The request did not change anything (not an advance, or already
    /// at the requested stage).
    Unchanged { current: Stage },
    /// The requested value is not a stage.
    Invalid { requested: u8 },
}

impl StageUpdate {
    pub fn is_changed(&self) -> bool {
        matches!(self, StageUpdate::Changed { .. })
    }

    /// `true` when the update moved the word forward.
    pub fn is_advance(&self) -> bool {
        matches!(self, StageUpdate::Changed { from, to } if to > from)
    }
}

// ---------------------------------------------------------------------------
// ProgressStore
// ---------------------------------------------------------------------------

/// File-backed progress with a one-time migration from a legacy store.
pub struct ProgressStore {
    path: PathBuf,
    legacy: Option<Box<dyn LegacyStore>>,
    record: ProgressRecord,
    policy: ProgressConfig,
}

impl ProgressStore {
    /// Open the store at `path` and load it immediately.
    pub fn open(path: impl Into<PathBuf>, legacy: Option<Box<dyn LegacyStore>>) -> Self {
        let mut store = Self {
            path: path.into(),
            legacy,
            record: ProgressRecord::new(),
            policy: ProgressConfig::default(),
        };
        store.load();
        store
    }

    /// Replace the advancement policy.
    pub fn with_policy(mut self, policy: ProgressConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read durable storage.
    ///
    /// When the file is absent, progress is migrated once from the legacy
    /// store (if any).  Unreadable entries are skipped one by one.  A file
    /// that cannot be read at all is moved aside to `*.json.bad` and
    /// progress starts empty; this never fails.
    pub fn load(&mut self) -> &ProgressRecord {
        self.record = match self.read_file() {
            Ok(Some(record)) => record,
            Ok(None) => self.migrate_from_legacy().unwrap_or_default(),
            Err(e) => {
                log::warn!("progress: {e}; starting from empty progress");
                self.set_aside();
                ProgressRecord::new()
            }
        };
        &self.record
    }

    /// Current in-memory record.
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn get_stage(&self, id: &str) -> Stage {
        self.record.stage(id)
    }

    /// Set the stage of `id`.
    ///
    /// Without `force` only forward moves are applied (and capped by
    /// `max_advance` when configured).  Out-of-range values are ignored.
    pub fn set_stage(&mut self, id: &str, new_stage: u8, force: bool) -> StageUpdate {
        let Some(requested) = Stage::from_value(new_stage) else {
            log::debug!("progress: ignoring invalid stage {new_stage} for {id}");
            return StageUpdate::Invalid {
                requested: new_stage,
            };
        };

        let current = self.record.stage(id);
        let target = if force {
            requested
        } else {
            if requested <= current {
                return StageUpdate::Unchanged { current };
            }
            match self.cap_advance(current, requested) {
                capped if capped == current => return StageUpdate::Unchanged { current },
                capped => capped,
            }
        };

        self.record.insert(id, target);
        if let Err(e) = self.persist() {
            log::error!("progress: {e}; keeping in-memory stage for {id}");
        }

        if target == current {
            StageUpdate::Unchanged { current }
        } else {
            log::debug!("progress: {id} {current} → {target}");
            StageUpdate::Changed {
                from: current,
                to: target,
            }
        }
    }

    /// Move `id` one stage forward, but only while it sits at `required`.
    pub fn advance(&mut self, id: &str, required: Stage) -> StageUpdate {
        let current = self.record.stage(id);
        match current.next() {
            Some(next) if current == required => self.set_stage(id, next.value(), false),
            _ => StageUpdate::Unchanged { current },
        }
    }

    /// Catalog "star" toggle: a started word goes back to New, a new word
    /// starts Learning.
    pub fn toggle_learning(&mut self, id: &str) -> StageUpdate {
        if self.record.stage(id) >= Stage::Learning {
            self.set_stage(id, Stage::New.value(), true)
        } else {
            self.set_stage(id, Stage::Learning.value(), false)
        }
    }

    /// Delete the durable store and clear the in-memory record.
    pub fn reset_all(&mut self) -> Result<(), ProgressError> {
        self.record = ProgressRecord::new();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("progress: reset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProgressError::StoreWriteFailed(e.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn cap_advance(&self, current: Stage, requested: Stage) -> Stage {
        match self.policy.max_advance {
            Some(max) => {
                let ceiling = current.value().saturating_add(max).min(Stage::MAX);
                Stage::from_value(requested.value().min(ceiling)).unwrap_or(requested)
            }
            None => requested,
        }
    }

    fn read_file(&self) -> Result<Option<ProgressRecord>, ProgressError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| ProgressError::StoreReadFailed(e.to_string()))?;
        match ProgressRecord::from_json(&data) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                log::warn!("progress: {e}; reading entries one by one");
                read_entries(&data).map(Some)
            }
        }
    }

    fn set_aside(&self) {
        if !self.path.is_file() {
            return;
        }
        let bad = self.path.with_extension("json.bad");
        match std::fs::rename(&self.path, &bad) {
            Ok(()) => log::warn!("progress: unreadable file moved to {}", bad.display()),
            Err(e) => log::error!("progress: could not move {} aside: {e}", self.path.display()),
        }
    }

    fn migrate_from_legacy(&mut self) -> Option<ProgressRecord> {
        let legacy = self.legacy.as_mut()?;

        let raw = match legacy.get(LEGACY_PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("progress: legacy store unreadable: {e}");
                return None;
            }
        };

        let record = match migrate_legacy(&raw) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("progress: legacy progress unusable: {e}");
                return None;
            }
        };

        self.record = record.clone();
        match self.persist() {
            Ok(()) => {
                if let Some(legacy) = self.legacy.as_mut() {
                    if let Err(e) = legacy.remove(LEGACY_PROGRESS_KEY) {
                        log::warn!("progress: could not clear legacy progress: {e}");
                    }
                }
                log::info!("progress: migrated {} entries from legacy store", record.len());
            }
            Err(e) => log::error!("progress: migration not saved: {e}"),
        }
        Some(record)
    }

    fn persist(&self) -> Result<(), ProgressError> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let data = self.record.to_json().map_err(std::io::Error::other)?;
            let tmp = self.path.with_extension("json.tmp");
            std::fs::write(&tmp, data)?;
            std::fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| ProgressError::StoreWriteFailed(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SharedProgress
// ---------------------------------------------------------------------------

/// Handle to the store shared by every screen.
///
/// Lock for the duration of one operation; do **not** hold the lock across
/// `.await` points.
pub type SharedProgress = Arc<Mutex<ProgressStore>>;

pub fn new_shared_progress(store: ProgressStore) -> SharedProgress {
    Arc::new(Mutex::new(store))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::legacy::{JsonKvStore, MemoryKvStore};
    use tempfile::tempdir;

    fn store_in_temp() -> (ProgressStore, tempfile::TempDir) {
        let dir = tempdir().expect("temp dir");
        let store = ProgressStore::open(dir.path().join("wordProgress.json"), None);
        (store, dir)
    }

    #[test]
    fn non_forced_never_moves_backwards() {
        let (mut store, _dir) = store_in_temp();

        assert!(store.set_stage("w1", 2, false).is_changed());
        assert_eq!(
            store.set_stage("w1", 1, false),
            StageUpdate::Unchanged {
                current: Stage::Familiar
            }
        );
        assert_eq!(store.get_stage("w1"), Stage::Familiar);

        let update = store.set_stage("w1", 1, true);
        assert_eq!(
            update,
            StageUpdate::Changed {
                from: Stage::Familiar,
                to: Stage::Learning
            }
        );
        assert_eq!(store.get_stage("w1"), Stage::Learning);
    }

    #[test]
    fn monotonic_over_arbitrary_sequence() {
        let (mut store, _dir) = store_in_temp();
        let mut last = Stage::New;
        for requested in [3u8, 1, 0, 4, 2, 9, 1] {
            store.set_stage("w", requested, false);
            let now = store.get_stage("w");
            assert!(now >= last, "stage went from {last:?} to {now:?}");
            last = now;
        }
        assert_eq!(last, Stage::Mastered);
    }

    #[test]
    fn invalid_stage_is_ignored() {
        let (mut store, _dir) = store_in_temp();
        store.set_stage("w1", 3, false);
        assert_eq!(
            store.set_stage("w1", 5, true),
            StageUpdate::Invalid { requested: 5 }
        );
        assert_eq!(store.get_stage("w1"), Stage::Confident);
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("wordProgress.json");

        {
            let mut store = ProgressStore::open(&path, None);
            store.set_stage("w1", 2, false);
            store.set_stage("w2", 4, false);
        }

        let reopened = ProgressStore::open(&path, None);
        assert_eq!(reopened.get_stage("w1"), Stage::Familiar);
        assert_eq!(reopened.get_stage("w2"), Stage::Mastered);
        assert_eq!(reopened.get_stage("w3"), Stage::New);
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("wordProgress.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = ProgressStore::open(&path, None);
        assert!(store.record().is_empty());

        store.set_stage("w1", 1, false);
        let kept = std::fs::read_to_string(path.with_extension("json.bad")).unwrap();
        assert_eq!(kept, "{ not json");
    }

    #[test]
    fn one_bad_entry_keeps_the_rest_on_disk() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("wordProgress.json");
        std::fs::write(
            &path,
            r#"{"a":{"stage":4},"b":{"stage":3},"c":{"listen":1},"d":"junk"}"#,
        )
        .unwrap();

        let mut store = ProgressStore::open(&path, None);
        assert_eq!(store.get_stage("a"), Stage::Mastered);
        assert_eq!(store.get_stage("b"), Stage::Confident);
        assert_eq!(store.get_stage("c"), Stage::Learning);

        store.set_stage("z", 1, false);

        let reopened = ProgressStore::open(&path, None);
        assert_eq!(reopened.get_stage("a"), Stage::Mastered);
        assert_eq!(reopened.get_stage("b"), Stage::Confident);
        assert_eq!(reopened.get_stage("c"), Stage::Learning);
        assert_eq!(reopened.get_stage("z"), Stage::Learning);
        assert_eq!(reopened.record().len(), 4);
    }

    #[test]
    fn reset_all_deletes_file() {
        let (mut store, _dir) = store_in_temp();
        store.set_stage("w1", 3, false);
        assert!(store.path().exists());

        store.reset_all().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().is_empty());

        // resetting twice is harmless
        store.reset_all().unwrap();
    }

    #[test]
    fn migrates_legacy_exactly_once() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("wordProgress.json");
        let legacy_path = dir.path().join("legacy.json");
        let blob = r#"{"a":{"listen":1,"speak":2},"b":{"stage":4}}"#;
        std::fs::write(
            &legacy_path,
            serde_json::json!({ LEGACY_PROGRESS_KEY: blob }).to_string(),
        )
        .unwrap();

        let store = ProgressStore::open(&path, Some(Box::new(JsonKvStore::new(&legacy_path))));
        assert_eq!(store.get_stage("a"), Stage::Familiar);
        assert_eq!(store.get_stage("b"), Stage::Mastered);
        assert!(path.exists());

        let legacy = JsonKvStore::new(&legacy_path);
        assert!(legacy.get(LEGACY_PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn existing_file_wins_over_legacy() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("wordProgress.json");
        std::fs::write(&path, r#"{"a":{"stage":1}}"#).unwrap();

        let mut legacy = MemoryKvStore::new();
        legacy.insert(LEGACY_PROGRESS_KEY, r#"{"a":{"stage":4}}"#);

        let store = ProgressStore::open(&path, Some(Box::new(legacy)));
        assert_eq!(store.get_stage("a"), Stage::Learning);
    }

    #[test]
    fn advance_requires_matching_stage() {
        let (mut store, _dir) = store_in_temp();
        assert!(!store.advance("w1", Stage::Learning).is_changed());

        store.set_stage("w1", 1, false);
        let update = store.advance("w1", Stage::Learning);
        assert!(update.is_advance());
        assert_eq!(store.get_stage("w1"), Stage::Familiar);

        store.set_stage("w1", 4, false);
        assert_eq!(
            store.advance("w1", Stage::Mastered),
            StageUpdate::Unchanged {
                current: Stage::Mastered
            }
        );
    }

    #[test]
    fn toggle_learning_flips_between_new_and_learning() {
        let (mut store, _dir) = store_in_temp();
        store.toggle_learning("w1");
        assert_eq!(store.get_stage("w1"), Stage::Learning);
        store.toggle_learning("w1");
        assert_eq!(store.get_stage("w1"), Stage::New);

        store.set_stage("w2", 3, false);
        store.toggle_learning("w2");
        assert_eq!(store.get_stage("w2"), Stage::New);
    }

    #[test]
    fn max_advance_caps_jumps() {
        let dir = tempdir().expect("temp dir");
        let mut store = ProgressStore::open(dir.path().join("p.json"), None).with_policy(
            ProgressConfig {
                max_advance: Some(1),
            },
        );

        store.set_stage("w1", 4, false);
        assert_eq!(store.get_stage("w1"), Stage::Learning);

        // forced writes ignore the cap
        store.set_stage("w1", 4, true);
        assert_eq!(store.get_stage("w1"), Stage::Mastered);
    }

    #[test]
    fn zero_max_advance_writes_nothing() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("p.json");
        let mut store = ProgressStore::open(&path, None).with_policy(ProgressConfig {
            max_advance: Some(0),
        });

        assert_eq!(
            store.set_stage("w9", 2, false),
            StageUpdate::Unchanged {
                current: Stage::New
            }
        );
        assert!(store.record().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let dir = tempdir().expect("temp dir");
        // A directory in place of the file makes every write fail.
        let path = dir.path().join("blocked");
        std::fs::create_dir(&path).unwrap();
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let mut store = ProgressStore::open(&path, None);
        store.set_stage("w1", 2, false);
        assert_eq!(store.get_stage("w1"), Stage::Familiar);
    }
}
