//! Configuration loading for the Vantage media browser backend.
//!
//! Configuration is read from an optional TOML file with environment
//! variable overrides layered on top. Every field has a sensible default so
//! an empty (or missing) file yields a working setup.
#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub mod logging;
pub mod util;

pub use logging::init_tracing;

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_VAR: &str = "VANTAGE_CONFIG";
/// Environment override for the library root.
pub const ROOT_VAR: &str = "VANTAGE_ROOT";
/// Environment override for the thumbnail cache directory.
pub const CACHE_DIR_VAR: &str = "VANTAGE_CACHE_DIR";
/// Environment override for the watch debounce window in milliseconds.
pub const DEBOUNCE_MS_VAR: &str = "VANTAGE_DEBOUNCE_MS";

/// Top-level configuration document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VantageConfig {
    /// Media library root the UI browses. `None` until the caller picks one.
    pub root: Option<PathBuf>,
    pub watch: WatchSettings,
    pub tree: TreeSettings,
    pub thumbnails: ThumbnailSettings,
}

/// Directory watch tuning.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WatchSettings {
    /// Debounce window for coalescing event bursts into one notification.
    pub debounce_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// Tree-read bounds.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TreeSettings {
    /// Recursion cap for tree listings on pathological/deep trees.
    pub max_depth: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

/// Thumbnail cache geometry and placement.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailSettings {
    /// Cache root. Defaults to the platform cache dir when unset.
    pub cache_dir: Option<PathBuf>,
    /// Bounding box edge; generated thumbnails fit within a square this size.
    pub max_dimension: u32,
    /// JPEG re-encode quality (1-100).
    pub quality: u8,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            max_dimension: 480,
            quality: 80,
        }
    }
}

impl VantageConfig {
    /// Load configuration from the default location with env overrides.
    ///
    /// Resolution order: `$VANTAGE_CONFIG`, then
    /// `<platform config dir>/vantage/vantage.toml`. A missing file is not
    /// an error; a file that fails to parse is.
    pub fn load() -> anyhow::Result<Self> {
        let path = util::path_var(CONFIG_PATH_VAR).or_else(default_config_path);
        let mut config = match path {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a specific TOML config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(root) = util::path_var(ROOT_VAR) {
            tracing::debug!(root = %root.display(), "library root overridden from environment");
            self.root = Some(root);
        }
        if let Some(dir) = util::path_var(CACHE_DIR_VAR) {
            tracing::debug!(dir = %dir.display(), "cache dir overridden from environment");
            self.thumbnails.cache_dir = Some(dir);
        }
        if let Some(ms) = util::u64_var(DEBOUNCE_MS_VAR) {
            self.watch.debounce_ms = ms.max(1);
        }
    }

    /// Effective thumbnail cache root, falling back to the platform cache
    /// directory (or the system temp dir as a last resort).
    pub fn thumbnail_cache_dir(&self) -> PathBuf {
        self.thumbnails.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("vantage")
                .join("thumbnails")
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("vantage").join("vantage.toml"))
}
