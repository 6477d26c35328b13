//! Per-word mastery progress.
//!
//! # Architecture
//!
//! ```text
//!   screens ──set_stage/advance/toggle──▶ ProgressStore ──persist──▶ wordProgress.json
//!                                           │    ▲
//!                                           │    └── one-time migration ◀── LegacyStore
//!                                           ▼
//!                                     ProgressRecord ──bucketize──▶ {stage: [ids]}
//! ```
//!
//! There is no global progress state: the store is created once and handed
//! to consumers as a [`SharedProgress`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use vocab_trainer::progress::{ProgressStore, Stage};
//!
//! let mut store = ProgressStore::open("wordProgress.json", None);
//! store.set_stage("w1", 2, false);
//! store.set_stage("w1", 1, false); // ignored: not an advance
//! assert_eq!(store.get_stage("w1"), Stage::Familiar);
//! ```

pub mod legacy;
pub mod record;
pub mod stage;
pub mod store;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use legacy::{migrate_legacy, read_entries, JsonKvStore, LegacyStore, MemoryKvStore, LEGACY_PROGRESS_KEY};
pub use record::{bucketize, get_stage, ProgressRecord};
pub use stage::Stage;
pub use store::{new_shared_progress, ProgressStore, SharedProgress, StageUpdate};

// ---------------------------------------------------------------------------
// ProgressError
// ---------------------------------------------------------------------------

/// Errors from the progress store.  None of them reach the learner: reads
/// fall back to empty progress and failed writes leave memory authoritative.
#[derive(Debug, Clone, Error)]
pub enum ProgressError {
    #[error("failed to read progress: {0}")]
    StoreReadFailed(String),

    #[error("failed to write progress: {0}")]
    StoreWriteFailed(String),

    #[error("stage {0} out of range (0-4)")]
    InvalidStage(u8),
}
