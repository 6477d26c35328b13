//! In-memory word catalog, loaded once at startup.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::{CatalogError, WordRecord};

/// Categories listed first in the index, in this order.  Anything else
/// follows alphabetically.
const PRIORITY_CATEGORIES: &[&str] = &[
    "numbers",
    "place",
    "ingredients",
    "local ingredients",
    "things",
    "local dishes",
    "drinks",
    "speech",
    "concepts",
];

/// Read-only list of word records with an id index.
///
/// Catalog order is significant: voice search uses it as the tie-break.
#[derive(Debug, Clone, Default)]
pub struct WordCatalog {
    words: Vec<WordRecord>,
    by_id: HashMap<String, usize>,
}

impl WordCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn from_words(words: Vec<WordRecord>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(words.len());
        for (idx, word) in words.iter().enumerate() {
            if by_id.insert(word.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(word.id.clone()));
            }
        }
        Ok(Self { words, by_id })
    }

    /// Load a JSON array of [`WordRecord`]s.
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path)?;
        let words: Vec<WordRecord> = serde_json::from_str(&data)?;
        let catalog = Self::from_words(words)?;
        log::info!(
            "catalog: loaded {} words from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&WordRecord> {
        self.by_id.get(id).map(|&idx| &self.words[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordRecord> {
        self.words.iter()
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Distinct categories: priority ones first, then the rest sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        for word in &self.words {
            if let Some(cat) = word.category.as_deref() {
                if !seen.contains(&cat) {
                    seen.push(cat);
                }
            }
        }

        let mut ordered: Vec<String> = PRIORITY_CATEGORIES
            .iter()
            .filter(|p| seen.contains(p))
            .map(|p| p.to_string())
            .collect();

        let mut leftovers: Vec<&str> = seen
            .into_iter()
            .filter(|c| !PRIORITY_CATEGORIES.contains(c))
            .collect();
        leftovers.sort_unstable();
        ordered.extend(leftovers.into_iter().map(String::from));
        ordered
    }

    /// Words grouped by category, sections sorted by name.
    ///
    /// Number sections are ordered by `value`, all others by gloss.
    pub fn grouped(&self) -> BTreeMap<String, Vec<&WordRecord>> {
        let mut groups: BTreeMap<String, Vec<&WordRecord>> = BTreeMap::new();
        for word in &self.words {
            groups
                .entry(word.category_or_other().to_string())
                .or_default()
                .push(word);
        }

        for (category, words) in groups.iter_mut() {
            if is_number_category(category) {
                words.sort_by(|a, b| {
                    a.value
                        .unwrap_or(0.0)
                        .partial_cmp(&b.value.unwrap_or(0.0))
                        .unwrap_or(Ordering::Equal)
                });
            } else {
                words.sort_by(|a, b| a.english.cmp(&b.english));
            }
        }
        groups
    }
}

impl<'a> IntoIterator for &'a WordCatalog {
    type Item = &'a WordRecord;
    type IntoIter = std::slice::Iter<'a, WordRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

fn is_number_category(category: &str) -> bool {
    category.eq_ignore_ascii_case("number") || category.eq_ignore_ascii_case("numbers")
}
