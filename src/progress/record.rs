//! The persisted word-id → stage mapping.
//!
//! On disk the record is a JSON object keyed by word id:
//!
//! ```text
//! { "w1": { "stage": 2 }, "w7": { "stage": 0 } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct StageEntry {
    stage: Stage,
}

/// Stage of every word the learner has touched.  Absent ids are
/// [`Stage::New`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    entries: BTreeMap<String, StageEntry>,
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage of `id`, defaulting to [`Stage::New`].
    pub fn stage(&self, id: &str) -> Stage {
        self.entries
            .get(id)
            .map(|e| e.stage)
            .unwrap_or_default()
    }

    /// Number of ids with an explicit entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Stage)> {
        self.entries.iter().map(|(id, e)| (id.as_str(), e.stage))
    }

    pub(crate) fn insert(&mut self, id: impl Into<String>, stage: Stage) {
        self.entries.insert(id.into(), StageEntry { stage });
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

impl FromIterator<(String, Stage)> for ProgressRecord {
    fn from_iter<I: IntoIterator<Item = (String, Stage)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (id, stage) in iter {
            record.insert(id, stage);
        }
        record
    }
}

/// Pure stage lookup; absent ids are stage 0.
pub fn get_stage(record: &ProgressRecord, id: &str) -> Stage {
    record.stage(id)
}

/// Group the ids of `record` by stage.  Every stage has an entry, possibly
/// empty; ids within a bucket are in ascending order.
pub fn bucketize(record: &ProgressRecord) -> BTreeMap<Stage, Vec<String>> {
    let mut buckets: BTreeMap<Stage, Vec<String>> =
        Stage::ALL.into_iter().map(|s| (s, Vec::new())).collect();
    for (id, stage) in record.iter() {
        buckets.entry(stage).or_default().push(id.to_string());
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_defaults_to_new() {
        let record = ProgressRecord::new();
        assert_eq!(get_stage(&record, "anything"), Stage::New);
    }

    #[test]
    fn json_shape_is_stage_objects() {
        let record: ProgressRecord = [("w1".to_string(), Stage::Familiar)].into_iter().collect();
        let json = record.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({ "w1": { "stage": 2 } }));
    }

    #[test]
    fn from_json_rejects_out_of_range_stage() {
        assert!(ProgressRecord::from_json(r#"{"w1":{"stage":9}}"#).is_err());
    }

    #[test]
    fn bucketize_groups_by_stage() {
        let record: ProgressRecord = [
            ("b".to_string(), Stage::Learning),
            ("a".to_string(), Stage::Learning),
            ("c".to_string(), Stage::Mastered),
            ("d".to_string(), Stage::New),
        ]
        .into_iter()
        .collect();

        let buckets = bucketize(&record);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[&Stage::New], vec!["d"]);
        assert_eq!(buckets[&Stage::Learning], vec!["a", "b"]);
        assert!(buckets[&Stage::Familiar].is_empty());
        assert!(buckets[&Stage::Confident].is_empty());
        assert_eq!(buckets[&Stage::Mastered], vec!["c"]);
    }
}
