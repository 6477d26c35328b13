//! Command-line trainer: line commands over the core subsystems.
//!
//! # Architecture
//!
//! [`TrainerApp`] owns one instance of every core component and turns each
//! parsed [`Command`] into calls on them:
//!
//! * `progress`: the shared [`ProgressStore`](crate::progress::ProgressStore).
//! * `session` : the audio session for manual play buttons.
//! * `autoplay`: the sequencer, on its own audio session.
//! * `voice`   : voice search; matches go out as [`TrainerEvent`]s.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `say <transcript>` | resolve a transcript to a word |
//! | `listen` | capture one utterance from the recognizer |
//! | `stage <id> <0-4> [force]` | set a word's stage |
//! | `advance <id> <required>` | stage advance button |
//! | `toggle <id>` | catalog learning toggle |
//! | `buckets` | word ids per stage |
//! | `deck <mode>` | open (or refresh) a practice deck |
//! | `next` / `pass` | move through the deck / advance the word on screen |
//! | `categories` | catalog grouped by category |
//! | `play <id> [slow]` | play a word's clip |
//! | `autoplay <id>` / `stop` | start / stop hands-free listening |
//! | `lang <code>` | switch target language |
//! | `reset` | delete all progress |
//! | `quit` | exit |

use std::str::FromStr;
use std::sync::{Arc, MutexGuard, PoisonError};

use anyhow::{anyhow, bail, Context, Result};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::audio::AudioSession;
use crate::autoplay::{AutoplaySequencer, Callbacks};
use crate::catalog::{resolve_fields, Language, WordCatalog, WordRecord};
use crate::events::{emit, EventSender, TrainerEvent};
use crate::progress::{bucketize, ProgressStore, SharedProgress, Stage, StageUpdate};
use crate::trainer::{PracticeMode, PracticeSession};
use crate::voice::VoiceSearch;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Listen,
    Stage { id: String, stage: u8, force: bool },
    Advance { id: String, required: u8 },
    Toggle(String),
    Buckets,
    Deck(String),
    Next,
    Pass,
    Categories,
    Play { id: String, slow: bool },
    Autoplay(String),
    Stop,
    Lang(String),
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let cmd = match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("say", _) if !rest.is_empty() => Command::Say(rest.to_string()),
            ("say", _) => return Err(CommandError::Usage("say <transcript>")),
            ("listen", []) => Command::Listen,
            ("stage", [id, n]) | ("stage", [id, n, "force"]) => Command::Stage {
                id: id.to_string(),
                stage: n
                    .parse()
                    .map_err(|_| CommandError::Usage("stage <id> <0-4> [force]"))?,
                force: args.len() == 3,
            },
            ("stage", _) => return Err(CommandError::Usage("stage <id> <0-4> [force]")),
            ("advance", [id, n]) => Command::Advance {
                id: id.to_string(),
                required: n
                    .parse()
                    .map_err(|_| CommandError::Usage("advance <id> <required stage>"))?,
            },
            ("advance", _) => return Err(CommandError::Usage("advance <id> <required stage>")),
            ("toggle", [id]) => Command::Toggle(id.to_string()),
            ("toggle", _) => return Err(CommandError::Usage("toggle <id>")),
            ("buckets", []) => Command::Buckets,
            ("deck", [mode]) => Command::Deck(mode.to_string()),
            ("deck", _) => return Err(CommandError::Usage("deck <learn|listen|speak|review>")),
            ("next", []) => Command::Next,
            ("pass", []) => Command::Pass,
            ("categories", []) => Command::Categories,
            ("play", [id]) => Command::Play {
                id: id.to_string(),
                slow: false,
            },
            ("play", [id, "slow"]) => Command::Play {
                id: id.to_string(),
                slow: true,
            },
            ("play", _) => return Err(CommandError::Usage("play <id> [slow]")),
            ("autoplay", [id]) => Command::Autoplay(id.to_string()),
            ("autoplay", _) => return Err(CommandError::Usage("autoplay <id>")),
            ("stop", []) => Command::Stop,
            ("lang", [code]) => Command::Lang(code.to_string()),
            ("lang", _) => return Err(CommandError::Usage("lang <code>")),
            ("reset", []) => Command::Reset,
            ("help", _) | ("?", _) => Command::Help,
            ("quit", _) | ("exit", _) => Command::Quit,
            _ => return Err(CommandError::Unknown(line.to_string())),
        };
        Ok(cmd)
    }
}

/// What the driver should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

// ---------------------------------------------------------------------------
// TrainerApp
// ---------------------------------------------------------------------------

pub struct TrainerApp {
    catalog: Arc<WordCatalog>,
    progress: SharedProgress,
    language: Language,
    session: Arc<AudioSession>,
    autoplay: AutoplaySequencer,
    voice: VoiceSearch,
    events: EventSender,
    practice: Option<PracticeSession>,
}

impl TrainerApp {
    pub fn new(
        catalog: Arc<WordCatalog>,
        progress: SharedProgress,
        language: Language,
        session: Arc<AudioSession>,
        autoplay: AutoplaySequencer,
        voice: VoiceSearch,
        events: EventSender,
    ) -> Self {
        Self {
            catalog,
            progress,
            language,
            session,
            autoplay,
            voice,
            events,
            practice: None,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Run one command.  Errors are for the learner to read; the app stays
    /// usable after any of them.
    pub async fn handle(&mut self, cmd: Command) -> Result<Reply> {
        let text = match cmd {
            Command::Say(transcript) => {
                let id = self.voice.submit(&transcript)?;
                self.describe(self.word(&id)?)
            }
            Command::Listen => {
                let id = self.voice.listen_once(&CancellationToken::new()).await?;
                self.describe(self.word(&id)?)
            }
            Command::Stage { id, stage, force } => {
                self.word(&id)?;
                let update = self.store().set_stage(&id, stage, force);
                self.report(&id, update)
            }
            Command::Advance { id, required } => {
                self.word(&id)?;
                let required = Stage::from_value(required)
                    .ok_or_else(|| anyhow!("stage {required} out of range (0-4)"))?;
                let update = self.store().advance(&id, required);
                self.report(&id, update)
            }
            Command::Toggle(id) => {
                self.word(&id)?;
                let update = self.store().toggle_learning(&id);
                self.report(&id, update)
            }
            Command::Buckets => {
                let buckets = bucketize(self.store().record());
                buckets
                    .iter()
                    .map(|(stage, ids)| format!("{} {stage}: {}", stage.value(), ids.join(", ")))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::Deck(mode) => {
                let mode: PracticeMode = mode.parse()?;
                let practice = match self.practice.take() {
                    Some(mut open) if open.mode() == mode => {
                        open.refresh();
                        open
                    }
                    _ => PracticeSession::open(
                        mode,
                        Arc::clone(&self.catalog),
                        Arc::clone(&self.progress),
                        self.events.clone(),
                        false,
                    ),
                };
                let deck = self.practice.insert(practice).deck();
                if deck.is_empty() {
                    format!("{mode}: no words at stage {}", mode.stage())
                } else {
                    format!("{mode}: {}", deck.ids().join(", "))
                }
            }
            Command::Next => {
                let practice = self.practice.as_mut().context("no deck open (try `deck <mode>`)")?;
                match practice.next().map(|w| w.id.clone()) {
                    Some(id) => self.describe(self.word(&id)?),
                    None => format!("{}: deck is empty", practice.mode()),
                }
            }
            Command::Pass => {
                let practice = self.practice.as_mut().context("no deck open (try `deck <mode>`)")?;
                let id = practice
                    .current()
                    .map(|w| w.id.clone())
                    .with_context(|| format!("{}: deck is empty", practice.mode()))?;
                let update = practice
                    .advance_current()
                    .with_context(|| format!("{}: deck is empty", practice.mode()))?;
                summarize(&id, update)
            }
            Command::Categories => {
                let groups = self.catalog.grouped();
                let mut names = self.catalog.categories();
                if groups.contains_key("other") && !names.iter().any(|n| n == "other") {
                    names.push("other".into());
                }
                names
                    .iter()
                    .filter_map(|name| {
                        let words = groups.get(name)?;
                        let glosses: Vec<&str> = words.iter().map(|w| w.english.as_str()).collect();
                        Some(format!("{name}: {}", glosses.join(", ")))
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::Play { id, slow } => {
                let word = self.word(&id)?;
                let clips = resolve_fields(word, self.language).clips;
                let clip = if slow { clips.slow } else { clips.normal }
                    .ok_or_else(|| anyhow!("{id} has no {} clip", if slow { "slow" } else { "normal" }))?
                    .to_string();
                self.session.load_and_play(&clip).await?;
                format!("played {clip}")
            }
            Command::Autoplay(id) => {
                let word = self.word(&id)?.clone();
                let callbacks = self.autoplay_callbacks(&word.id);
                if self.autoplay.start(&word, self.language, callbacks).await {
                    format!("autoplay started for {}", word.english)
                } else {
                    format!("autoplay already running for {}", word.english)
                }
            }
            Command::Stop => match self.autoplay.stop().await {
                Some(outcome) => format!("autoplay stopped ({outcome:?})"),
                None => "autoplay not running".into(),
            },
            Command::Lang(code) => {
                let lang = Language::select(&code)?;
                self.autoplay.stop().await;
                self.language = lang;
                self.voice.resolver_mut().set_language(lang);
                format!("target language: {}", lang.label())
            }
            Command::Reset => {
                self.store()
                    .reset_all()
                    .context("could not delete progress")?;
                "progress reset".into()
            }
            Command::Help => HELP.trim().to_string(),
            Command::Quit => {
                self.autoplay.stop().await;
                self.session.teardown().await;
                return Ok(Reply::Quit);
            }
        };
        Ok(Reply::Text(text))
    }

    fn word(&self, id: &str) -> Result<&WordRecord> {
        match self.catalog.get(id) {
            Some(w) => Ok(w),
            None => bail!("no word with id {id}"),
        }
    }

    fn store(&self) -> MutexGuard<'_, ProgressStore> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn describe(&self, word: &WordRecord) -> String {
        let fields = resolve_fields(word, self.language);
        let stage = self.store().get_stage(&word.id);
        let mut line = format!("{} [{}] {}", word.id, stage, word.english);
        if !fields.text.is_empty() {
            line.push_str(&format!(" = {} ({})", fields.text, fields.phonetic));
        }
        if let Some(tip) = &word.tip {
            line.push_str(&format!("\n  tip: {tip}"));
        }
        line
    }

    fn report(&self, id: &str, update: StageUpdate) -> String {
        if let StageUpdate::Changed { from, to } = update {
            emit(
                &self.events,
                TrainerEvent::StageChanged {
                    word_id: id.to_string(),
                    from,
                    to,
                },
            );
        }
        summarize(id, update)
    }

    fn autoplay_callbacks(&self, word_id: &str) -> Callbacks {
        let (reveal_tx, advance_tx) = (self.events.clone(), self.events.clone());
        let (reveal_id, advance_id) = (word_id.to_string(), word_id.to_string());
        Callbacks::new(
            move || {
                emit(
                    &reveal_tx,
                    TrainerEvent::Revealed {
                        word_id: reveal_id.clone(),
                    },
                )
            },
            move || {
                emit(
                    &advance_tx,
                    TrainerEvent::Advanced {
                        word_id: advance_id.clone(),
                    },
                )
            },
        )
    }
}

fn summarize(id: &str, update: StageUpdate) -> String {
    match update {
        StageUpdate::Changed { from, to } => format!("{id}: {from} → {to}"),
        StageUpdate::Unchanged { current } => format!("{id}: stays {current}"),
        StageUpdate::Invalid { requested } => format!("{id}: stage {requested} ignored (0-4)"),
    }
}

const HELP: &str = "
say <transcript>          find a word by what was said
listen                    capture one utterance
stage <id> <0-4> [force]  set a word's stage
advance <id> <required>   advance a word sitting at <required>
toggle <id>               start learning / reset a word
buckets                   word ids per stage
deck <mode>               learn | listen | speak | review
next                      next word in the open deck
pass                      advance the word on screen
categories                catalog by category
play <id> [slow]          play a word's clip
autoplay <id> | stop      hands-free listening
lang <code>               japanese | korean | ...
reset                     delete all progress
quit
";
