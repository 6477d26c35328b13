//! Word catalog: typed word records, target languages and the field resolver.
//!
//! The catalog is loaded once at startup and shared read-only behind an
//! `Arc<WordCatalog>`.  Everything that needs per-language text or clip ids
//! goes through [`resolve_fields`] instead of poking at record fields.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use vocab_trainer::catalog::{resolve_fields, Language, WordCatalog};
//!
//! let catalog = WordCatalog::load_from(std::path::Path::new("words.json")).unwrap();
//! for word in &catalog {
//!     let fields = resolve_fields(word, Language::Japanese);
//!     println!("{} = {} ({})", word.english, fields.text, fields.phonetic);
//! }
//! ```

pub mod fields;
pub mod language;
pub mod store;
pub mod word;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use fields::{resolve_fields, ClipKeys, ResolvedFields};
pub use language::Language;
pub use store::WordCatalog;
pub use word::{ClipSet, LanguageFields, WordRecord};

// ---------------------------------------------------------------------------
// CatalogError
// ---------------------------------------------------------------------------

/// Errors raised while loading the catalog or picking a language.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate word id: {0}")]
    DuplicateId(String),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// The language is listed but has no recordings yet.
    #[error("language not available yet: {0}")]
    LanguageUnavailable(String),
}
