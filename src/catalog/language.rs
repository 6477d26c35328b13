//! Target languages offered by the trainer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// A language the learner can pick as their target.
///
/// Only some languages ship with recorded clips; the rest are listed so the
/// picker can show them as "coming soon".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Japanese,
    Korean,
    French,
    Spanish,
    Thai,
    Turkish,
}

impl Language {
    /// All languages in picker order.
    pub const ALL: [Language; 6] = [
        Language::Japanese,
        Language::Korean,
        Language::French,
        Language::Spanish,
        Language::Thai,
        Language::Turkish,
    ];

    /// Key used in catalog files and settings (`"japanese"`, `"korean"`, …).
    pub fn code(self) -> &'static str {
        match self {
            Language::Japanese => "japanese",
            Language::Korean => "korean",
            Language::French => "french",
            Language::Spanish => "spanish",
            Language::Thai => "thai",
            Language::Turkish => "turkish",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Thai => "Thai",
            Language::Turkish => "Turkish",
        }
    }

    /// Whether clips and phonetics are available for this language.
    pub fn is_available(self) -> bool {
        matches!(self, Language::Japanese | Language::Korean)
    }

    /// Look a language up by its catalog code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    /// Parse a code and require the language to be selectable as a target.
    ///
    /// ```
    /// use vocab_trainer::catalog::Language;
    ///
    /// assert_eq!(Language::select("korean").unwrap(), Language::Korean);
    /// assert!(Language::select("thai").is_err());
    /// ```
    pub fn select(code: &str) -> Result<Self, CatalogError> {
        let lang: Language = code.parse()?;
        if !lang.is_available() {
            return Err(CatalogError::LanguageUnavailable(lang.code().to_string()));
        }
        Ok(lang)
    }
}

impl FromStr for Language {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CatalogError::UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_japanese_and_korean_are_available() {
        let available: Vec<_> = Language::ALL
            .into_iter()
            .filter(|l| l.is_available())
            .collect();
        assert_eq!(available, vec![Language::Japanese, Language::Korean]);
    }

    #[test]
    fn from_code_is_case_insensitive() {
        assert_eq!(Language::from_code("Japanese"), Some(Language::Japanese));
        assert_eq!(Language::from_code(" spanish "), Some(Language::Spanish));
        assert_eq!(Language::from_code("klingon"), None);
    }

    #[test]
    fn select_rejects_unavailable_and_unknown() {
        assert!(matches!(
            Language::select("turkish"),
            Err(CatalogError::LanguageUnavailable(code)) if code == "turkish"
        ));
        assert!(matches!(
            Language::select("latin"),
            Err(CatalogError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&Language::Korean).unwrap();
        assert_eq!(json, "\"korean\"");
        let back: Language = serde_json::from_str("\"thai\"").unwrap();
        assert_eq!(back, Language::Thai);
    }
}
