//! Typed word records as stored in the catalog file.
//!
//! Each record keeps its per-language data in a nested map keyed by the
//! language code:
//!
//! ```json
//! {
//!   "id": "w12",
//!   "english": "noodle",
//!   "type": "local dishes",
//!   "aliases": ["ramen"],
//!   "gloss_clip": "en_noodle.mp3",
//!   "fields": {
//!     "japanese": {
//!       "text": "めん",
//!       "phonetic": "men",
//!       "clips": { "normal": "ja_men.mp3", "slow": "ja_men_slow.mp3", "alternate": "ja_men_f.mp3" }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Language;

/// Clip ids recorded for one language of one word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipSet {
    /// Normal-speed voice.
    #[serde(default)]
    pub normal: Option<String>,
    /// Slowed-down voice.
    #[serde(default)]
    pub slow: Option<String>,
    /// Alternate speaker (the "female" recording).
    #[serde(default)]
    pub alternate: Option<String>,
}

/// Display text, transcription and clips for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageFields {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub clips: ClipSet,
}

/// One vocabulary entry.  Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: String,
    /// English gloss.
    pub english: String,
    /// Category tag used for grouping (`"drinks"`, `"numbers"`, …).
    #[serde(rename = "type", default)]
    pub category: Option<String>,
    /// Alternate spoken forms accepted by voice search.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tip: Option<String>,
    /// Numeric value for number words, used for ordering.
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    /// Clip of the English gloss being spoken.
    #[serde(default)]
    pub gloss_clip: Option<String>,
    /// Per-language data keyed by [`Language::code`].
    #[serde(default)]
    pub fields: BTreeMap<String, LanguageFields>,
}

impl WordRecord {
    /// Minimal record with only an id and gloss.
    pub fn new(id: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            english: english.into(),
            category: None,
            aliases: Vec::new(),
            tip: None,
            value: None,
            image: None,
            gloss_clip: None,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style helper that attaches data for `lang`.
    pub fn with_language(mut self, lang: Language, fields: LanguageFields) -> Self {
        self.fields.insert(lang.code().to_string(), fields);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_gloss_clip(mut self, clip: impl Into<String>) -> Self {
        self.gloss_clip = Some(clip.into());
        self
    }

    /// Data recorded for `lang`, if any.
    pub fn fields_for(&self, lang: Language) -> Option<&LanguageFields> {
        self.fields.get(lang.code())
    }

    /// Category name used for grouping; untagged words fall under `"other"`.
    pub fn category_or_other(&self) -> &str {
        self.category.as_deref().unwrap_or("other")
    }
}
