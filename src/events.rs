//! Events the core emits toward the navigation layer.
//!
//! Screens subscribe through a `tokio::sync::mpsc` channel; the core never
//! navigates on its own.

use tokio::sync::mpsc;

use crate::progress::Stage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainerEvent {
    /// Voice search found a word; show its record.
    WordMatched { word_id: String, transcript: String },

    /// A practice screen moved a word to another stage.
    StageChanged { word_id: String, from: Stage, to: Stage },

    /// Autoplay reached the reveal step.
    Revealed { word_id: String },

    /// Autoplay finished a word; show the next one.
    Advanced { word_id: String },
}

pub type EventSender = mpsc::Sender<TrainerEvent>;
pub type EventReceiver = mpsc::Receiver<TrainerEvent>;

/// Bounded event channel.
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    mpsc::channel(capacity)
}

/// Send without waiting.  A full or closed channel drops the event and logs.
pub fn emit(tx: &EventSender, event: TrainerEvent) {
    if let Err(e) = tx.try_send(event) {
        log::warn!("events: dropped {:?}", e.into_inner());
    }
}
