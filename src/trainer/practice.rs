//! One practice screen: a deck plus the stage advance button.

use std::sync::{Arc, MutexGuard, PoisonError};

use super::{Deck, PracticeMode};
use crate::catalog::{WordCatalog, WordRecord};
use crate::events::{emit, EventSender, TrainerEvent};
use crate::progress::{ProgressStore, SharedProgress, StageUpdate};

pub struct PracticeSession {
    mode: PracticeMode,
    catalog: Arc<WordCatalog>,
    progress: SharedProgress,
    events: EventSender,
    deck: Deck,
    shuffle: bool,
}

impl PracticeSession {
    pub fn open(
        mode: PracticeMode,
        catalog: Arc<WordCatalog>,
        progress: SharedProgress,
        events: EventSender,
        shuffle: bool,
    ) -> Self {
        let deck = {
            let store = lock(&progress);
            Deck::for_mode(mode, &catalog, store.record(), shuffle)
        };
        Self {
            mode,
            catalog,
            progress,
            events,
            deck,
            shuffle,
        }
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current(&self) -> Option<&WordRecord> {
        self.deck.current().and_then(|id| self.catalog.get(id))
    }

    pub fn next(&mut self) -> Option<&WordRecord> {
        let id = self.deck.next()?.to_string();
        self.catalog.get(&id)
    }

    /// Press the advance button for the word on screen.
    ///
    /// The word only moves when it is still at this mode's stage; it then
    /// leaves the deck on the next move.
    pub fn advance_current(&mut self) -> Option<StageUpdate> {
        let id = self.deck.current()?.to_string();
        let update = lock(&self.progress).advance(&id, self.mode.stage());

        if let StageUpdate::Changed { from, to } = update {
            self.deck.mark_for_removal(&id);
            emit(
                &self.events,
                TrainerEvent::StageChanged {
                    word_id: id,
                    from,
                    to,
                },
            );
        }
        Some(update)
    }

    /// Rebuild the deck from the current progress.
    pub fn refresh(&mut self) {
        let store = lock(&self.progress);
        self.deck = Deck::for_mode(self.mode, &self.catalog, store.record(), self.shuffle);
    }
}

fn lock(progress: &SharedProgress) -> MutexGuard<'_, ProgressStore> {
    progress.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_channel;
    use crate::progress::{new_shared_progress, Stage};
    use tempfile::tempdir;

    fn catalog() -> Arc<WordCatalog> {
        Arc::new(
            WordCatalog::from_words(vec![
                WordRecord::new("a", "one"),
                WordRecord::new("b", "two"),
                WordRecord::new("c", "three"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn advancing_moves_word_to_next_mode() {
        let dir = tempdir().expect("temp dir");
        let mut store = ProgressStore::open(dir.path().join("p.json"), None);
        store.set_stage("a", 2, false);
        store.set_stage("b", 2, false);
        let progress = new_shared_progress(store);
        let (tx, mut rx) = event_channel(8);

        let mut listen =
            PracticeSession::open(PracticeMode::Listen, catalog(), progress.clone(), tx, false);
        assert_eq!(listen.current().unwrap().id, "a");

        let update = listen.advance_current().unwrap();
        assert_eq!(
            update,
            StageUpdate::Changed {
                from: Stage::Familiar,
                to: Stage::Confident
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            TrainerEvent::StageChanged {
                word_id: "a".into(),
                from: Stage::Familiar,
                to: Stage::Confident,
            }
        );

        // Still shown until the learner moves on.
        assert_eq!(listen.current().unwrap().id, "a");
        assert_eq!(listen.next().unwrap().id, "b");
        assert_eq!(listen.deck().len(), 1);
        assert_eq!(progress.lock().unwrap().get_stage("a"), Stage::Confident);
    }

    #[test]
    fn second_press_does_not_skip_a_stage() {
        let dir = tempdir().expect("temp dir");
        let mut store = ProgressStore::open(dir.path().join("p.json"), None);
        store.set_stage("c", 1, false);
        let progress = new_shared_progress(store);
        let (tx, _rx) = event_channel(8);

        let mut learn = PracticeSession::open(PracticeMode::Learn, catalog(), progress.clone(), tx, false);
        assert!(learn.advance_current().unwrap().is_changed());
        assert!(!learn.advance_current().unwrap().is_changed());
        assert_eq!(progress.lock().unwrap().get_stage("c"), Stage::Familiar);
    }

    #[test]
    fn refresh_picks_up_outside_changes() {
        let dir = tempdir().expect("temp dir");
        let progress = new_shared_progress(ProgressStore::open(dir.path().join("p.json"), None));
        let (tx, _rx) = event_channel(8);

        let mut learn =
            PracticeSession::open(PracticeMode::Learn, catalog(), progress.clone(), tx, false);
        assert!(learn.deck().is_empty());

        progress.lock().unwrap().set_stage("b", 1, false);
        learn.refresh();
        assert_eq!(learn.deck().ids(), ["b".to_string()]);
        assert_eq!(learn.current().unwrap().id, "b");
    }

    #[test]
    fn empty_mode_has_no_current_word() {
        let dir = tempdir().expect("temp dir");
        let progress = new_shared_progress(ProgressStore::open(dir.path().join("p.json"), None));
        let (tx, _rx) = event_channel(8);

        let mut review = PracticeSession::open(PracticeMode::Review, catalog(), progress, tx, false);
        assert!(review.current().is_none());
        assert!(review.advance_current().is_none());
        assert!(review.next().is_none());
    }
}
