//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + alias table):
//!   Windows: %APPDATA%\vocab-trainer\
//!   macOS:   ~/Library/Application Support/vocab-trainer/
//!   Linux:   ~/.config/vocab-trainer/
//!
//! Data dir (progress, legacy store, catalog, assets):
//!   Windows: %LOCALAPPDATA%\vocab-trainer\
//!   macOS:   ~/Library/Application Support/vocab-trainer/
//!   Linux:   ~/.local/share/vocab-trainer/

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `aliases.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the user alias table (`aliases.json`).
    pub aliases_file: PathBuf,
    /// Directory holding learner data and bundled assets.
    pub data_dir: PathBuf,
    /// Full path to the current progress file (`wordProgress.json`).
    pub progress_file: PathBuf,
    /// Full path to the flat key-value store used by older releases.
    pub legacy_store_file: PathBuf,
    /// Default location of the word catalog (`words.json`).
    pub catalog_file: PathBuf,
    /// Default location of the precomputed clip map (`asset-map.json`).
    pub asset_map_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "vocab-trainer";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self::with_dirs(config_dir, data_dir)
    }

    /// Lay the standard file names out under explicit directories.
    pub fn with_dirs(config_dir: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.as_ref().to_path_buf();
        let data_dir = data_dir.as_ref().to_path_buf();

        Self {
            settings_file: config_dir.join("settings.toml"),
            aliases_file: config_dir.join("aliases.json"),
            progress_file: data_dir.join("wordProgress.json"),
            legacy_store_file: data_dir.join("legacy-store.json"),
            catalog_file: data_dir.join("words.json"),
            asset_map_file: data_dir.join("asset-map.json"),
            config_dir,
            data_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
