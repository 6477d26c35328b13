//! Cycling deck of word ids for one practice screen.
//!
//! A word that advances out of the mode stays on screen until the learner
//! moves on; it is dropped from the deck on the following [`Deck::next`].

use rand::seq::SliceRandom;

use super::PracticeMode;
use crate::catalog::WordCatalog;
use crate::progress::ProgressRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    ids: Vec<String>,
    position: usize,
    pending_removal: Option<String>,
}

impl Deck {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            position: 0,
            pending_removal: None,
        }
    }

    /// Deck of the words eligible for `mode`, optionally shuffled.
    pub fn for_mode(
        mode: PracticeMode,
        catalog: &WordCatalog,
        record: &ProgressRecord,
        shuffle: bool,
    ) -> Self {
        let mut ids: Vec<String> = mode
            .eligible(catalog, record)
            .into_iter()
            .map(|w| w.id.clone())
            .collect();
        if shuffle {
            ids.shuffle(&mut rand::thread_rng());
        }
        log::debug!("trainer: {mode} deck with {} words", ids.len());
        Self::new(ids)
    }

    pub fn current(&self) -> Option<&str> {
        self.ids.get(self.position).map(String::as_str)
    }

    /// Drop `id` from the deck on the next move.
    pub fn mark_for_removal(&mut self, id: &str) {
        self.pending_removal = Some(id.to_string());
    }

    /// Move to the next word, wrapping around.
    pub fn next(&mut self) -> Option<&str> {
        if let Some(id) = self.pending_removal.take() {
            if let Some(pos) = self.ids.iter().position(|x| *x == id) {
                self.ids.remove(pos);
                if self.ids.is_empty() {
                    self.position = 0;
                    return None;
                }
                if pos == self.position {
                    // The following word slid into the current slot.
                    self.position %= self.ids.len();
                    return self.current();
                }
                if pos < self.position {
                    self.position -= 1;
                }
            }
        }

        if self.ids.is_empty() {
            return None;
        }
        self.position = (self.position + 1) % self.ids.len();
        self.current()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WordRecord;
    use crate::progress::Stage;

    fn deck(ids: &[&str]) -> Deck {
        Deck::new(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn cycles_and_wraps() {
        let mut d = deck(&["a", "b", "c"]);
        assert_eq!(d.current(), Some("a"));
        assert_eq!(d.next(), Some("b"));
        assert_eq!(d.next(), Some("c"));
        assert_eq!(d.next(), Some("a"));
    }

    #[test]
    fn advanced_word_leaves_on_next_move() {
        let mut d = deck(&["a", "b", "c"]);
        d.mark_for_removal("a");
        assert_eq!(d.current(), Some("a"));

        assert_eq!(d.next(), Some("b"));
        assert_eq!(d.ids(), ["b", "c"]);
        assert_eq!(d.next(), Some("c"));
        assert_eq!(d.next(), Some("b"));
    }

    #[test]
    fn removing_last_slot_wraps_to_front() {
        let mut d = deck(&["a", "b"]);
        d.next();
        d.mark_for_removal("b");
        assert_eq!(d.next(), Some("a"));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn removing_only_word_empties_deck() {
        let mut d = deck(&["a"]);
        d.mark_for_removal("a");
        assert_eq!(d.next(), None);
        assert!(d.is_empty());
        assert_eq!(d.current(), None);
    }

    #[test]
    fn shuffled_deck_keeps_eligible_words() {
        let catalog = WordCatalog::from_words(
            (0..20).map(|i| WordRecord::new(format!("w{i}"), "x")).collect(),
        )
        .unwrap();
        let record: ProgressRecord = (0..20)
            .filter(|i| i % 2 == 0)
            .map(|i| (format!("w{i}"), Stage::Familiar))
            .collect();

        let d = Deck::for_mode(PracticeMode::Listen, &catalog, &record, true);
        let mut ids = d.ids().to_vec();
        ids.sort();
        let mut expected: Vec<String> = (0..20).filter(|i| i % 2 == 0).map(|i| format!("w{i}")).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }
}
