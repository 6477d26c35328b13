//! Application entry point for the command-line vocabulary trainer.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Load the word catalog, clip map and alias table.
//! 4. Open the progress store, migrating the legacy store once if needed.
//! 5. Build the audio sessions, autoplay sequencer and voice search.
//! 6. Spawn the event printer.
//! 7. Read commands from stdin until `quit` or end of input.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use vocab_trainer::{
    app::{Command, Reply, TrainerApp},
    audio::{AssetMap, AudioSession, ClipResolver, SilentBackend},
    autoplay::AutoplaySequencer,
    catalog::{Language, WordCatalog},
    config::{AppConfig, AppPaths},
    events::{event_channel, TrainerEvent},
    progress::{new_shared_progress, JsonKvStore, ProgressStore},
    voice::{AliasTable, SpeechError, SpeechRecognizer, VoiceResolver, VoiceSearch},
};

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("vocab-trainer starting up");

    // 2. Configuration
    let paths = AppPaths::new();
    let config = AppConfig::load_from(&paths.settings_file).unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let language = if config.target_language.is_available() {
        config.target_language
    } else {
        log::warn!(
            "{} is not available yet; falling back to {}",
            config.target_language.label(),
            Language::Japanese.label()
        );
        Language::Japanese
    };

    // 3. Catalog, clip map, aliases
    let catalog_path = config.catalog.catalog_path(&paths);
    let catalog = Arc::new(
        WordCatalog::load_from(&catalog_path)
            .with_context(|| format!("loading catalog {}", catalog_path.display()))?,
    );
    log::info!("{} words loaded from {}", catalog.len(), catalog_path.display());

    let asset_root = config.catalog.asset_root_path(&paths);
    let asset_map_path = config.catalog.asset_map_path(&paths);
    let clips: Arc<dyn ClipResolver> = match AssetMap::load_from(&asset_map_path, &asset_root) {
        Ok(map) => Arc::new(map),
        Err(e) => {
            log::warn!("{e}; every clip will be reported missing");
            Arc::new(AssetMap::new(&asset_root))
        }
    };

    let alias_path = config
        .matching
        .alias_file
        .clone()
        .unwrap_or_else(|| paths.aliases_file.clone());
    let aliases = if alias_path.exists() {
        AliasTable::load_from(&alias_path).unwrap_or_else(|e| {
            log::warn!("{e}; using built-in aliases");
            AliasTable::default()
        })
    } else {
        AliasTable::default()
    };

    // 4. Progress
    let store = ProgressStore::open(
        &paths.progress_file,
        Some(Box::new(JsonKvStore::new(&paths.legacy_store_file))),
    )
    .with_policy(config.progress.clone());
    let progress = new_shared_progress(store);

    // 5. Audio, autoplay, voice
    let backend = Arc::new(SilentBackend::new(Duration::from_millis(800)));
    let session = Arc::new(AudioSession::new(Arc::clone(&clips), backend.clone()));
    let autoplay = AutoplaySequencer::new(
        Arc::new(AudioSession::new(clips, backend)),
        config.autoplay.clone(),
    );

    let (event_tx, mut event_rx) = event_channel(64);
    let resolver = VoiceResolver::new(Arc::clone(&catalog), language)
        .with_aliases(aliases)
        .with_matching(&config.matching);
    let voice = VoiceSearch::new(resolver, Arc::new(NoRecognizer), event_tx.clone());

    // 6. Event printer
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                TrainerEvent::WordMatched { word_id, transcript } => {
                    println!("» matched {word_id} from {transcript:?}")
                }
                TrainerEvent::StageChanged { word_id, from, to } => {
                    println!("» {word_id} moved {from} → {to}")
                }
                TrainerEvent::Revealed { word_id } => println!("» reveal {word_id}"),
                TrainerEvent::Advanced { word_id } => println!("» next after {word_id}"),
            }
        }
    });

    let mut app = TrainerApp::new(
        catalog, progress, language, session, autoplay, voice, event_tx,
    );

    // 7. Command loop
    println!("vocab-trainer ({}), type `help`", language.label());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let cmd: Command = match line.parse() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match app.handle(cmd).await {
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Quit) => break,
            Err(e) => println!("error: {e:#}"),
        }
    }

    app.handle(Command::Quit).await?;
    log::info!("vocab-trainer shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// NoRecognizer: fallback SpeechRecognizer when no microphone backend exists
// ---------------------------------------------------------------------------

struct NoRecognizer;

#[async_trait]
impl SpeechRecognizer for NoRecognizer {
    async fn listen(&self) -> Result<String, SpeechError> {
        Err(SpeechError::Unavailable(
            "no speech backend in the terminal build; use `say <transcript>`".into(),
        ))
    }
}
