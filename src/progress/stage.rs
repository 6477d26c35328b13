//! Mastery stages of the learning funnel.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ProgressError;

/// How well the learner knows a word.
///
/// ```text
/// New ──▶ Learning ──▶ Familiar ──▶ Confident ──▶ Mastered
///  0         1            2             3             4
/// ```
///
/// Practice screens select words by *exact* stage, so a word moves from
/// one mode to the next as it advances.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stage {
    #[default]
    New,
    Learning,
    Familiar,
    Confident,
    Mastered,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::New,
        Stage::Learning,
        Stage::Familiar,
        Stage::Confident,
        Stage::Mastered,
    ];

    /// Highest stage value.
    pub const MAX: u8 = 4;

    /// Numeric value as stored on disk.
    pub fn value(self) -> u8 {
        match self {
            Stage::New => 0,
            Stage::Learning => 1,
            Stage::Familiar => 2,
            Stage::Confident => 3,
            Stage::Mastered => 4,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// The following stage, or `None` at [`Stage::Mastered`].
    pub fn next(self) -> Option<Self> {
        Self::from_value(self.value() + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Learning => "Learning",
            Stage::Familiar => "Familiar",
            Stage::Confident => "Confident",
            Stage::Mastered => "Mastered",
        }
    }
}

impl TryFrom<u8> for Stage {
    type Error = ProgressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(ProgressError::InvalidStage(value))
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> Self {
        stage.value()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::try_from(stage.value()).unwrap(), stage);
        }
    }

    #[test]
    fn out_of_range_is_invalid() {
        assert!(matches!(
            Stage::try_from(5),
            Err(ProgressError::InvalidStage(5))
        ));
    }

    #[test]
    fn next_stops_at_mastered() {
        assert_eq!(Stage::New.next(), Some(Stage::Learning));
        assert_eq!(Stage::Confident.next(), Some(Stage::Mastered));
        assert_eq!(Stage::Mastered.next(), None);
    }

    #[test]
    fn default_is_new() {
        assert_eq!(Stage::default(), Stage::New);
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Stage::Familiar).unwrap(), "2");
        assert!(serde_json::from_str::<Stage>("9").is_err());
    }
}
