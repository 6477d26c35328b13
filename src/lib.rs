//! Vocabulary trainer core.
//!
//! ```text
//! catalog ──▶ progress (stage state machine) ──▶ trainer (practice decks)
//!    │
//!    ├──▶ audio (clip resolver, session) ──▶ autoplay (timed sequences)
//!    └──▶ voice (transcript → word) ──▶ events ──▶ navigation layer
//! ```

pub mod app;
pub mod audio;
pub mod autoplay;
pub mod catalog;
pub mod config;
pub mod events;
pub mod progress;
pub mod trainer;
pub mod voice;
