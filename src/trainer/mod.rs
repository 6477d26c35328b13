//! Practice modes: which words each screen shows and how they cycle.
//!
//! ```text
//!   ProgressRecord ──PracticeMode::eligible (stage == mode)──▶ Deck
//!                                                               │
//!   advance button ──ProgressStore::advance──▶ StageChanged ────┘ drop on next()
//! ```

pub mod deck;
pub mod mode;
pub mod practice;

use thiserror::Error;

pub use deck::Deck;
pub use mode::PracticeMode;
pub use practice::PracticeSession;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainerError {
    #[error("unknown practice mode: {0}")]
    UnknownMode(String),
}
