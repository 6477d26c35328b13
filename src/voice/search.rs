//! Voice search driver: recognizer → resolver → [`TrainerEvent::WordMatched`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{SpeechError, VoiceError, VoiceResolver};
use crate::events::{emit, EventSender, TrainerEvent};

/// External speech-to-text boundary.
///
/// `listen` captures one utterance and resolves to its best transcript.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn listen(&self) -> Result<String, SpeechError>;
}

// Compile-time assertion: Box<dyn SpeechRecognizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechRecognizer>) {}
};

pub struct VoiceSearch {
    resolver: VoiceResolver,
    recognizer: Arc<dyn SpeechRecognizer>,
    events: EventSender,
}

impl VoiceSearch {
    pub fn new(
        resolver: VoiceResolver,
        recognizer: Arc<dyn SpeechRecognizer>,
        events: EventSender,
    ) -> Self {
        Self {
            resolver,
            recognizer,
            events,
        }
    }

    pub fn resolver(&self) -> &VoiceResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut VoiceResolver {
        &mut self.resolver
    }

    /// Listen for one utterance and resolve it.
    ///
    /// Returns the matched word id.  Cancelling `cancel` abandons the
    /// recognizer call and returns [`VoiceError::Cancelled`].
    pub async fn listen_once(&self, cancel: &CancellationToken) -> Result<String, VoiceError> {
        let transcript = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("voice: listening cancelled");
                return Err(VoiceError::Cancelled);
            }
            heard = self.recognizer.listen() => heard.map_err(|e| {
                log::warn!("voice: recognizer failed: {e}");
                VoiceError::from(e)
            })?,
        };
        self.submit(&transcript)
    }

    /// Resolve a transcript obtained elsewhere (typed input, replays).
    pub fn submit(&self, transcript: &str) -> Result<String, VoiceError> {
        match self.resolver.resolve(transcript) {
            Ok(word) => {
                emit(
                    &self.events,
                    TrainerEvent::WordMatched {
                        word_id: word.id.clone(),
                        transcript: transcript.to_string(),
                    },
                );
                Ok(word.id.clone())
            }
            Err(e) => {
                log::info!("voice: {e}");
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedRecognizer  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use scripted::ScriptedRecognizer;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Language, WordCatalog, WordRecord};
    use crate::events::event_channel;
    use std::time::Duration;

    fn resolver() -> VoiceResolver {
        let catalog = WordCatalog::from_words(vec![
            WordRecord::new("w1", "coffee"),
            WordRecord::new("w2", "noodle"),
        ])
        .unwrap();
        VoiceResolver::new(Arc::new(catalog), Language::Japanese)
    }

    #[tokio::test]
    async fn match_emits_word_matched() {
        let (tx, mut rx) = event_channel(4);
        let rec = ScriptedRecognizer::new(vec![Ok("please noodles".into())]);
        let search = VoiceSearch::new(resolver(), Arc::new(rec), tx);

        let id = search.listen_once(&CancellationToken::new()).await.unwrap();
        assert_eq!(id, "w2");
        assert_eq!(
            rx.recv().await,
            Some(TrainerEvent::WordMatched {
                word_id: "w2".into(),
                transcript: "please noodles".into(),
            })
        );
    }

    #[tokio::test]
    async fn no_match_emits_nothing() {
        let (tx, mut rx) = event_channel(4);
        let rec = ScriptedRecognizer::new(vec![Ok("xyz qqq".into())]);
        let search = VoiceSearch::new(resolver(), Arc::new(rec), tx);

        let err = search.listen_once(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err, VoiceError::NoMatch("xyz qqq".into()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn recognizer_error_is_passed_through() {
        let (tx, _rx) = event_channel(4);
        let rec = ScriptedRecognizer::new(vec![Err(SpeechError::Recognition("mic busy".into()))]);
        let search = VoiceSearch::new(resolver(), Arc::new(rec), tx);

        let err = search.listen_once(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(
            err,
            VoiceError::Speech(SpeechError::Recognition("mic busy".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_abandons_listening() {
        let (tx, mut rx) = event_channel(4);
        let rec = ScriptedRecognizer::new(vec![Ok("coffee".into())])
            .with_delay(Duration::from_secs(30));
        let search = VoiceSearch::new(resolver(), Arc::new(rec), tx);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        assert_eq!(
            search.listen_once(&cancel).await.unwrap_err(),
            VoiceError::Cancelled
        );
        assert!(rx.try_recv().is_err());
    }
}
