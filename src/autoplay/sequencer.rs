//! Single-driver autoplay runner.
//!
//! Each run is one tokio task walking a [`SequenceScript`].  The task checks
//! its [`CancellationToken`] before every step and races every suspension
//! point (clip load/play, waits) against it, so once `start`/`stop` return
//! the previous run can no longer play audio or fire a callback.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{build_script, Hook, SequenceScript, Step};
use crate::audio::AudioSession;
use crate::catalog::{Language, WordRecord};
use crate::config::AutoplayConfig;

pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Screen hooks fired by a run.
#[derive(Clone)]
pub struct Callbacks {
    pub on_reveal: Callback,
    pub on_advance: Callback,
}

impl Callbacks {
    pub fn new(
        on_reveal: impl Fn() + Send + Sync + 'static,
        on_advance: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_reveal: Arc::new(on_reveal),
            on_advance: Arc::new(on_advance),
        }
    }

    fn fire(&self, hook: Hook) {
        match hook {
            Hook::Reveal => (self.on_reveal)(),
            Hook::Advance => (self.on_advance)(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

struct Run {
    generation: String,
    token: CancellationToken,
    task: JoinHandle<RunOutcome>,
}

// ---------------------------------------------------------------------------
// AutoplaySequencer
// ---------------------------------------------------------------------------

/// Runs at most one autoplay script at a time over a shared audio session.
pub struct AutoplaySequencer {
    session: Arc<AudioSession>,
    config: AutoplayConfig,
    current: Option<Run>,
}

impl AutoplaySequencer {
    pub fn new(session: Arc<AudioSession>, config: AutoplayConfig) -> Self {
        Self {
            session,
            config,
            current: None,
        }
    }

    /// Start autoplay for `word`, cancelling any run for a different word.
    ///
    /// Returns `false` without doing anything when a run for the same word is
    /// still in progress.
    pub async fn start(&mut self, word: &WordRecord, lang: Language, callbacks: Callbacks) -> bool {
        let script = build_script(word, lang, &self.config);

        if let Some(run) = &self.current {
            if run.generation == script.generation && !run.task.is_finished() {
                log::debug!("autoplay: {} already running", script.generation);
                return false;
            }
        }

        self.stop().await;

        log::info!(
            "autoplay: start {} ({} steps)",
            script.generation,
            script.steps.len()
        );
        let token = CancellationToken::new();
        let generation = script.generation.clone();
        let task = tokio::spawn(drive(
            Arc::clone(&self.session),
            script,
            callbacks,
            token.clone(),
        ));
        self.current = Some(Run {
            generation,
            token,
            task,
        });
        true
    }

    /// Cancel the current run and wait until it has released its clip.
    ///
    /// Returns the run's outcome, or `None` when nothing was started.
    pub async fn stop(&mut self) -> Option<RunOutcome> {
        let run = self.current.take()?;
        run.token.cancel();
        Some(join(run).await)
    }

    /// Wait for the current run to finish on its own.
    pub async fn wait(&mut self) -> Option<RunOutcome> {
        let run = self.current.take()?;
        Some(join(run).await)
    }

    /// Word id of the run in progress.
    pub fn active_generation(&self) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|run| !run.task.is_finished())
            .map(|run| run.generation.as_str())
    }
}

impl Drop for AutoplaySequencer {
    fn drop(&mut self) {
        if let Some(run) = self.current.take() {
            run.token.cancel();
        }
    }
}

async fn join(run: Run) -> RunOutcome {
    match run.task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("autoplay: run {} panicked: {e}", run.generation);
            RunOutcome::Cancelled
        }
    }
}

async fn drive(
    session: Arc<AudioSession>,
    script: SequenceScript,
    callbacks: Callbacks,
    token: CancellationToken,
) -> RunOutcome {
    let SequenceScript { generation, steps } = script;

    for step in steps {
        if token.is_cancelled() {
            return cancelled(&session, &generation).await;
        }

        match step {
            Step::Play(clip) => {
                let played = tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    r = session.load_and_play(&clip) => Some(r),
                };
                match played {
                    None => return cancelled(&session, &generation).await,
                    Some(Err(e)) => log::warn!("autoplay: skipping {clip}: {e}"),
                    Some(Ok(())) => {}
                }
            }
            Step::Wait(delay) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return cancelled(&session, &generation).await,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Step::Invoke(hook) => {
                log::debug!("autoplay: {generation} {hook:?}");
                callbacks.fire(hook);
            }
        }
    }

    session.teardown().await;
    log::info!("autoplay: {generation} completed");
    RunOutcome::Completed
}

async fn cancelled(session: &AudioSession, generation: &str) -> RunOutcome {
    session.teardown().await;
    log::debug!("autoplay: {generation} cancelled");
    RunOutcome::Cancelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AssetMap, MockBackend};
    use crate::catalog::{ClipSet, LanguageFields};
    use std::sync::Mutex;
    use std::time::Duration;

    fn word(id: &str) -> WordRecord {
        WordRecord::new(id, id)
            .with_gloss_clip(format!("en_{id}"))
            .with_language(
                Language::Japanese,
                LanguageFields {
                    text: id.into(),
                    phonetic: id.into(),
                    clips: ClipSet {
                        normal: Some(format!("ja_{id}")),
                        slow: None,
                        alternate: Some(format!("ja_{id}_f")),
                    },
                },
            )
    }

    fn setup(backend: &MockBackend) -> AutoplaySequencer {
        let mut map = AssetMap::new("/assets");
        for id in ["w1", "w2"] {
            for clip in [format!("ja_{id}"), format!("ja_{id}_f"), format!("en_{id}")] {
                map.insert(clip.clone(), clip);
            }
        }
        let session = Arc::new(AudioSession::new(Arc::new(map), Arc::new(backend.clone())));
        AutoplaySequencer::new(session, AutoplayConfig::default())
    }

    fn recording(log: &Arc<Mutex<Vec<String>>>, id: &str) -> Callbacks {
        let (a, b) = (Arc::clone(log), Arc::clone(log));
        let (ra, rb) = (format!("reveal:{id}"), format!("advance:{id}"));
        Callbacks::new(
            move || a.lock().unwrap().push(ra.clone()),
            move || b.lock().unwrap().push(rb.clone()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn completed_run_plays_every_clip_in_order() {
        let backend = MockBackend::new();
        let mut seq = setup(&backend);
        let hooks = Arc::new(Mutex::new(Vec::new()));

        assert!(seq.start(&word("w1"), Language::Japanese, recording(&hooks, "w1")).await);
        assert_eq!(seq.wait().await, Some(RunOutcome::Completed));

        let plays: Vec<String> = backend
            .events()
            .into_iter()
            .filter(|e| e.starts_with("play:"))
            .collect();
        assert_eq!(plays, vec!["play:ja_w1_f", "play:ja_w1", "play:en_w1"]);
        assert_eq!(*hooks.lock().unwrap(), vec!["reveal:w1", "advance:w1"]);
        assert_eq!(backend.live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn new_word_cancels_old_run_mid_wait() {
        let backend = MockBackend::new();
        let mut seq = setup(&backend);
        let hooks = Arc::new(Mutex::new(Vec::new()));

        seq.start(&word("w1"), Language::Japanese, recording(&hooks, "w1")).await;
        // Past the first gap, inside the 2 s pause after the normal clip.
        tokio::time::sleep(Duration::from_millis(1500)).await;

        seq.start(&word("w2"), Language::Japanese, recording(&hooks, "w2")).await;
        let switched_at = backend.events().len();
        assert_eq!(seq.wait().await, Some(RunOutcome::Completed));

        let after: Vec<String> = backend.events()[switched_at..].to_vec();
        assert!(after.iter().all(|e| !e.contains("w1")), "w1 ran after switch: {after:?}");
        assert_eq!(*hooks.lock().unwrap(), vec!["reveal:w2", "advance:w2"]);
        assert_eq!(backend.live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn same_word_while_running_is_ignored() {
        let backend = MockBackend::new();
        let mut seq = setup(&backend);
        let hooks = Arc::new(Mutex::new(Vec::new()));

        assert!(seq.start(&word("w1"), Language::Japanese, recording(&hooks, "w1")).await);
        assert!(!seq.start(&word("w1"), Language::Japanese, recording(&hooks, "w1")).await);
        assert_eq!(seq.active_generation(), Some("w1"));

        seq.wait().await;
        assert_eq!(*hooks.lock().unwrap(), vec!["reveal:w1", "advance:w1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_and_releases_clip() {
        let backend = MockBackend::new().with_play_time(Duration::from_secs(5));
        let mut seq = setup(&backend);
        let hooks = Arc::new(Mutex::new(Vec::new()));

        seq.start(&word("w1"), Language::Japanese, recording(&hooks, "w1")).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(seq.stop().await, Some(RunOutcome::Cancelled));
        assert_eq!(seq.active_generation(), None);
        assert_eq!(backend.live(), 0);
        assert!(hooks.lock().unwrap().is_empty());
        assert_eq!(seq.stop().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_clips_do_not_stop_the_run() {
        let backend = MockBackend::new();
        let mut seq = setup(&backend);
        let hooks = Arc::new(Mutex::new(Vec::new()));

        // No asset-map entries for w3: every play is ClipMissing.
        seq.start(&word("w3"), Language::Japanese, recording(&hooks, "w3")).await;
        assert_eq!(seq.wait().await, Some(RunOutcome::Completed));

        assert!(backend.events().is_empty());
        assert_eq!(*hooks.lock().unwrap(), vec!["reveal:w3", "advance:w3"]);
    }
}
