//! Hands-free listening: timed clip sequences with reveal/advance hooks.
//!
//! ```text
//! WordRecord ──build_script──▶ SequenceScript [Play, Wait, Invoke, …]
//!                                    │
//!             AutoplaySequencer::start ─ spawn ─▶ driver task ──▶ AudioSession
//!                                    │                 │
//!             start(other word)/stop ─ cancel token ───┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vocab_trainer::audio::{AssetMap, AudioSession, SilentBackend};
//! use vocab_trainer::autoplay::{AutoplaySequencer, Callbacks};
//! use vocab_trainer::catalog::{Language, WordRecord};
//! use vocab_trainer::config::AutoplayConfig;
//!
//! # async fn demo(word: WordRecord) {
//! let session = Arc::new(AudioSession::new(
//!     Arc::new(AssetMap::new("assets")),
//!     Arc::new(SilentBackend::default()),
//! ));
//! let mut autoplay = AutoplaySequencer::new(session, AutoplayConfig::default());
//! autoplay
//!     .start(&word, Language::Japanese, Callbacks::new(|| println!("reveal"), || println!("next")))
//!     .await;
//! autoplay.wait().await;
//! # }
//! ```

pub mod script;
pub mod sequencer;

pub use script::{build_script, Hook, SequenceScript, Step};
pub use sequencer::{AutoplaySequencer, Callback, Callbacks, RunOutcome};
