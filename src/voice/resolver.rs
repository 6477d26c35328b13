//! Transcript → word record.
//!
//! ```text
//! raw ──normalize──▶ cleaned ──aliases──▶ canonical ──exact pass──▶ match
//!                       │                                  │ none
//!                       └── tokens ──fuzzy pass (levenshtein ≤ max)──▶ match | NoMatch
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use super::{normalize, AliasTable, VoiceError};
use crate::catalog::{resolve_fields, Language, WordCatalog, WordRecord};
use crate::config::MatchingConfig;

pub struct VoiceResolver {
    catalog: Arc<WordCatalog>,
    aliases: AliasTable,
    language: Language,
    max_distance: usize,
    fillers: Vec<String>,
}

impl VoiceResolver {
    /// Resolver with the built-in alias table and default matching policy.
    pub fn new(catalog: Arc<WordCatalog>, language: Language) -> Self {
        let matching = MatchingConfig::default();
        Self {
            catalog,
            aliases: AliasTable::default(),
            language,
            max_distance: matching.max_distance,
            fillers: matching.filler_phrases,
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_matching(mut self, matching: &MatchingConfig) -> Self {
        self.max_distance = matching.max_distance;
        self.fillers = matching.filler_phrases.clone();
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Find the word the learner said.
    ///
    /// # Errors
    ///
    /// [`VoiceError::NoMatch`] carrying the untouched transcript when neither
    /// pass finds a word.
    pub fn resolve(&self, transcript: &str) -> Result<&WordRecord, VoiceError> {
        let cleaned = normalize(transcript, &self.fillers);
        let canonical = self.aliases.canonicalize(&cleaned);
        log::debug!("voice: {transcript:?} → cleaned {cleaned:?}, canonical {canonical:?}");

        if !canonical.is_empty() {
            if let Some(word) = self.find_exact(canonical) {
                log::info!("voice: exact match {} ({})", word.id, word.english);
                return Ok(word);
            }
        }

        if let Some((name, dist)) = self.closest(&cleaned) {
            if dist <= self.max_distance {
                if let Some(word) = self.find_exact(&name) {
                    log::info!(
                        "voice: fuzzy match {} ({}) via {name:?}, distance {dist}",
                        word.id,
                        word.english
                    );
                    return Ok(word);
                }
            }
            log::debug!("voice: closest {name:?} at distance {dist} rejected");
        }

        Err(VoiceError::NoMatch(transcript.to_string()))
    }

    fn find_exact(&self, needle: &str) -> Option<&WordRecord> {
        self.catalog
            .iter()
            .find(|word| names(word, self.language).any(|n| n == needle))
    }

    /// Closest catalog name to any token of `cleaned`.  Ties keep the first
    /// token and the first name in catalog order.
    fn closest(&self, cleaned: &str) -> Option<(String, usize)> {
        let mut seen = HashSet::new();
        let candidates: Vec<String> = self
            .catalog
            .iter()
            .flat_map(|word| names(word, self.language))
            .filter(|n| seen.insert(n.clone()))
            .collect();

        let mut best: Option<(String, usize)> = None;
        for token in cleaned.split_whitespace() {
            for candidate in &candidates {
                let dist = strsim::levenshtein(token, candidate);
                if best.as_ref().map_or(true, |(_, d)| dist < *d) {
                    best = Some((candidate.clone(), dist));
                }
            }
        }
        best
    }
}

/// Every lowercase spelling a word answers to in `lang`.
fn names(word: &WordRecord, lang: Language) -> impl Iterator<Item = String> + '_ {
    let fields = resolve_fields(word, lang);
    [word.english.as_str(), fields.text, fields.phonetic]
        .into_iter()
        .chain(word.aliases.iter().map(String::as_str))
        .filter(|n| !n.trim().is_empty())
        .map(|n| n.trim().to_lowercase())
}
