//! Practice modes and the words each one shows.

use std::fmt;
use std::str::FromStr;

use super::TrainerError;
use crate::catalog::{WordCatalog, WordRecord};
use crate::progress::{ProgressRecord, Stage};

/// The four practice screens, in funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PracticeMode {
    Learn,
    Listen,
    Speak,
    Review,
}

impl PracticeMode {
    pub const ALL: [PracticeMode; 4] = [
        PracticeMode::Learn,
        PracticeMode::Listen,
        PracticeMode::Speak,
        PracticeMode::Review,
    ];

    /// The only stage a word may be at to appear in this mode.
    pub fn stage(self) -> Stage {
        match self {
            PracticeMode::Learn => Stage::Learning,
            PracticeMode::Listen => Stage::Familiar,
            PracticeMode::Speak => Stage::Confident,
            PracticeMode::Review => Stage::Mastered,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PracticeMode::Learn => "learn",
            PracticeMode::Listen => "listen",
            PracticeMode::Speak => "speak",
            PracticeMode::Review => "review",
        }
    }

    /// Catalog words at exactly [`stage`](Self::stage), in catalog order.
    pub fn eligible<'a>(
        self,
        catalog: &'a WordCatalog,
        record: &ProgressRecord,
    ) -> Vec<&'a WordRecord> {
        let stage = self.stage();
        catalog
            .iter()
            .filter(|w| record.stage(&w.id) == stage)
            .collect()
    }
}

impl FromStr for PracticeMode {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or(TrainerError::UnknownMode(s))
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
