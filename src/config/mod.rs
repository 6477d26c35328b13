//! Application configuration: cross-platform paths and TOML-backed settings.

pub mod paths;
pub mod settings;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use paths::AppPaths;
pub use settings::{AppConfig, AutoplayConfig, CatalogConfig, MatchingConfig, ProgressConfig};
