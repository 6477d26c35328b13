//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::catalog::Language;

// ---------------------------------------------------------------------------
// CatalogConfig
// ---------------------------------------------------------------------------

/// Where the word catalog and the precomputed clip map live.
///
/// `None` means "use the default under [`AppPaths::data_dir`]".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Word catalog JSON file.
    pub catalog_file: Option<PathBuf>,
    /// Clip-id → asset file map produced by the offline asset step.
    pub asset_map_file: Option<PathBuf>,
    /// Directory that relative asset paths are resolved against.
    pub asset_root: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn catalog_path(&self, paths: &AppPaths) -> PathBuf {
        self.catalog_file
            .clone()
            .unwrap_or_else(|| paths.catalog_file.clone())
    }

    pub fn asset_map_path(&self, paths: &AppPaths) -> PathBuf {
        self.asset_map_file
            .clone()
            .unwrap_or_else(|| paths.asset_map_file.clone())
    }

    pub fn asset_root_path(&self, paths: &AppPaths) -> PathBuf {
        self.asset_root
            .clone()
            .unwrap_or_else(|| paths.data_dir.join("assets"))
    }
}

// ---------------------------------------------------------------------------
// MatchingConfig
// ---------------------------------------------------------------------------

/// Voice-query matching policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Largest Levenshtein distance the fuzzy pass will accept.
    pub max_distance: usize,
    /// Leading phrases stripped from a transcript before matching.
    pub filler_phrases: Vec<String>,
    /// Extra alias table merged over the built-in one.  `None` uses
    /// [`AppPaths::aliases_file`] when it exists.
    pub alias_file: Option<PathBuf>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_distance: 2,
            filler_phrases: vec![
                "i said".into(),
                "this is".into(),
                "please".into(),
                "can i have".into(),
            ],
            alias_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AutoplayConfig
// ---------------------------------------------------------------------------

/// Timing of the hands-free listening sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoplayConfig {
    /// Pause after the alternate-voice clip.
    pub alternate_gap_ms: u64,
    /// Pause after the normal-voice clip.
    pub normal_gap_ms: u64,
    /// Pause after the secondary-language clip, before the reveal.
    pub secondary_gap_ms: u64,
    /// Pause after the gloss clip, before advancing.
    pub gloss_gap_ms: u64,
    /// Third language voiced between the target clips and the reveal.
    /// `None` skips that step.
    pub secondary_language: Option<Language>,
}

impl AutoplayConfig {
    pub fn alternate_gap(&self) -> Duration {
        Duration::from_millis(self.alternate_gap_ms)
    }

    pub fn normal_gap(&self) -> Duration {
        Duration::from_millis(self.normal_gap_ms)
    }

    pub fn secondary_gap(&self) -> Duration {
        Duration::from_millis(self.secondary_gap_ms)
    }

    pub fn gloss_gap(&self) -> Duration {
        Duration::from_millis(self.gloss_gap_ms)
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            alternate_gap_ms: 1_000,
            normal_gap_ms: 2_000,
            secondary_gap_ms: 1_000,
            gloss_gap_ms: 2_000,
            secondary_language: Some(Language::Spanish),
        }
    }
}

// ---------------------------------------------------------------------------
// ProgressConfig
// ---------------------------------------------------------------------------

/// Stage advancement policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Cap on how many stages one non-forced update may jump.  `None`
    /// allows any forward jump (e.g. selecting "Mastered" directly).
    pub max_advance: Option<u8>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use vocab_trainer::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language being learned.
    pub target_language: Language,
    /// Catalog and asset locations.
    pub catalog: CatalogConfig,
    /// Voice matching policy.
    pub matching: MatchingConfig,
    /// Autoplay sequence timing.
    pub autoplay: AutoplayConfig,
    /// Stage advancement policy.
    pub progress: ProgressConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_language: Language::Japanese,
            catalog: CatalogConfig::default(),
            matching: MatchingConfig::default(),
            autoplay: AutoplayConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
