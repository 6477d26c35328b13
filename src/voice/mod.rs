//! Voice search: resolve a noisy speech transcript to one catalog word.
//!
//! # Architecture
//!
//! ```text
//! SpeechRecognizer (trait) ──transcript──▶ VoiceResolver ──▶ WordRecord
//!        │                                  │  normalize
//!        │                                  │  AliasTable::canonicalize
//!        │                                  │  exact pass / fuzzy pass
//!        └──────────── VoiceSearch ─────────┴──▶ TrainerEvent::WordMatched
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vocab_trainer::catalog::{Language, WordCatalog};
//! use vocab_trainer::voice::VoiceResolver;
//!
//! let catalog = Arc::new(WordCatalog::load_from(std::path::Path::new("words.json")).unwrap());
//! let resolver = VoiceResolver::new(catalog, Language::Japanese);
//! match resolver.resolve("I said noodles") {
//!     Ok(word) => println!("→ {}", word.english),
//!     Err(e) => println!("{e}"),
//! }
//! ```

pub mod alias;
pub mod normalize;
pub mod resolver;
pub mod search;

use thiserror::Error;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use alias::AliasTable;
pub use normalize::normalize;
pub use resolver::VoiceResolver;
pub use search::{SpeechRecognizer, VoiceSearch};

#[cfg(test)]
pub use search::ScriptedRecognizer;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`SpeechRecognizer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("speech recognition unavailable: {0}")]
    Unavailable(String),

    #[error("no speech detected")]
    NoSpeech,

    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    /// Neither pass matched; carries the transcript as heard.
    #[error("no match found for: {0}")]
    NoMatch(String),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("listening cancelled")]
    Cancelled,

    #[error("alias table: {0}")]
    Aliases(String),
}
