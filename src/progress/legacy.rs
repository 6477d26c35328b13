//! Legacy flat key-value store and the one-time migration out of it.
//!
//! Older releases kept progress under the `wordProgress` key of a flat
//! string → string store.  The value is JSON in one of two shapes:
//!
//! ```text
//! { "w1": { "stage": 2 } }               current shape
//! { "w1": { "listen": 1, "speak": 3 } }  split listen/speak shape
//! ```
//!
//! The split shape folds into `stage = max(listen, speak)`.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::Deserialize;

use super::{ProgressError, ProgressRecord, Stage};

/// Key under which older releases stored progress.
pub const LEGACY_PROGRESS_KEY: &str = "wordProgress";

// ---------------------------------------------------------------------------
// LegacyStore trait
// ---------------------------------------------------------------------------

/// Minimal flat key-value interface over the old storage.
pub trait LegacyStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, ProgressError>;
    fn remove(&mut self, key: &str) -> Result<(), ProgressError>;
}

// ---------------------------------------------------------------------------
// JsonKvStore
// ---------------------------------------------------------------------------

/// Legacy store kept as a single JSON object of string values.
pub struct JsonKvStore {
    path: PathBuf,
}

impl JsonKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, ProgressError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| ProgressError::StoreReadFailed(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| ProgressError::StoreReadFailed(e.to_string()))
    }
}

impl LegacyStore for JsonKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        Ok(self.read_all()?.remove(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), ProgressError> {
        let mut all = self.read_all()?;
        if all.remove(key).is_none() {
            return Ok(());
        }
        let data = serde_json::to_string_pretty(&all)
            .map_err(|e| ProgressError::StoreWriteFailed(e.to_string()))?;
        std::fs::write(&self.path, data)
            .map_err(|e| ProgressError::StoreWriteFailed(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MemoryKvStore
// ---------------------------------------------------------------------------

/// In-memory legacy store, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    values: HashMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl LegacyStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        Ok(self.values.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<(), ProgressError> {
        self.values.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Migration
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    #[serde(default)]
    stage: Option<u8>,
    #[serde(default)]
    listen: Option<u8>,
    #[serde(default)]
    speak: Option<u8>,
}

impl LegacyEntry {
    fn fold(&self) -> Stage {
        let raw = self
            .stage
            .unwrap_or_else(|| self.listen.unwrap_or(0).max(self.speak.unwrap_or(0)));
        Stage::from_value(raw.min(Stage::MAX)).unwrap_or_default()
    }
}

/// Convert a legacy progress blob into the current record.
///
/// Entries already in the current shape are kept as-is; split entries take
/// the larger of their listen/speak levels.  Values above the top stage
/// are clamped.
pub fn migrate_legacy(raw: &str) -> Result<ProgressRecord, ProgressError> {
    read_entries(raw)
}

/// Read a progress object one entry at a time.
///
/// Entries that are not objects, or whose levels are not small unsigned
/// integers, are skipped with a warning; the rest survive.  Only a blob
/// that is not a JSON object at all is an error.
pub fn read_entries(raw: &str) -> Result<ProgressRecord, ProgressError> {
    let entries: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| ProgressError::StoreReadFailed(e.to_string()))?;

    Ok(entries
        .into_iter()
        .filter_map(|(id, value)| match LegacyEntry::deserialize(&value) {
            Ok(entry) => Some((id, entry.fold())),
            Err(e) => {
                log::warn!("progress: skipping entry {id}: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn folds_listen_speak_into_max() {
        let record = migrate_legacy(
            r#"{
                "a": { "listen": 1, "speak": 3 },
                "b": { "listen": 2 },
                "c": {}
            }"#,
        )
        .unwrap();
        assert_eq!(record.stage("a"), Stage::Confident);
        assert_eq!(record.stage("b"), Stage::Familiar);
        assert_eq!(record.stage("c"), Stage::New);
    }

    #[test]
    fn keeps_current_shape_entries() {
        let record = migrate_legacy(r#"{ "a": { "stage": 4, "listen": 1 } }"#).unwrap();
        assert_eq!(record.stage("a"), Stage::Mastered);
    }

    #[test]
    fn clamps_out_of_range_levels() {
        let record = migrate_legacy(r#"{ "a": { "speak": 7 } }"#).unwrap();
        assert_eq!(record.stage("a"), Stage::Mastered);
    }

    #[test]
    fn bad_entries_are_skipped_not_fatal() {
        let record = read_entries(
            r#"{
                "a": { "stage": 3 },
                "b": "junk",
                "c": { "listen": -1 },
                "d": { "stage": 7 }
            }"#,
        )
        .unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.stage("a"), Stage::Confident);
        assert_eq!(record.stage("d"), Stage::Mastered);
    }

    #[test]
    fn malformed_blob_is_read_error() {
        assert!(matches!(
            migrate_legacy("[1, 2"),
            Err(ProgressError::StoreReadFailed(_))
        ));
    }

    #[test]
    fn json_kv_store_get_and_remove() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("legacy.json");
        std::fs::write(
            &path,
            r#"{ "wordProgress": "{}", "targetLang": "japanese" }"#,
        )
        .unwrap();

        let mut store = JsonKvStore::new(&path);
        assert_eq!(store.get(LEGACY_PROGRESS_KEY).unwrap().as_deref(), Some("{}"));

        store.remove(LEGACY_PROGRESS_KEY).unwrap();
        assert!(store.get(LEGACY_PROGRESS_KEY).unwrap().is_none());
        assert_eq!(store.get("targetLang").unwrap().as_deref(), Some("japanese"));
    }

    #[test]
    fn json_kv_store_missing_file_is_empty() {
        let dir = tempdir().expect("temp dir");
        let store = JsonKvStore::new(dir.path().join("absent.json"));
        assert!(store.get(LEGACY_PROGRESS_KEY).unwrap().is_none());
    }
}
