//! The `MediaBrowser` facade: the one surface the UI/IPC layer talks to.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use vantage_config::VantageConfig;
use vantage_model::{Entry, FolderMetadata};

use crate::error::Result;
use crate::fs::{self, DirectoryWatcher, WatchConfig};
use crate::sidecar;
use crate::thumbs::ThumbnailService;

/// Owns the listing, mutation, watch, sidecar, and thumbnail services for
/// one media library and exposes them as single-shot async operations.
///
/// Callers issue one logical operation per UI action; independent
/// operations (several thumbnail fetches for a visible grid, say) run
/// concurrently without coordination.
pub struct MediaBrowser {
    watcher: DirectoryWatcher,
    thumbnails: ThumbnailService,
    tree_depth: usize,
}

impl fmt::Debug for MediaBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBrowser")
            .field("watcher", &self.watcher)
            .field("thumbnails", &self.thumbnails)
            .field("tree_depth", &self.tree_depth)
            .finish()
    }
}

impl MediaBrowser {
    pub fn new(config: &VantageConfig) -> Self {
        Self {
            watcher: DirectoryWatcher::new(WatchConfig::from(&config.watch)),
            thumbnails: ThumbnailService::with_settings(
                config.thumbnail_cache_dir(),
                config.thumbnails.max_dimension,
                config.thumbnails.quality,
            ),
            tree_depth: config.tree.max_depth,
        }
    }

    // --- listing ---

    /// List one directory level.
    pub async fn list_directory(&self, path: &Path) -> Result<Vec<Entry>> {
        fs::list_directory(path).await
    }

    /// List a folder tree; `depth` defaults to the configured cap.
    pub async fn list_tree(&self, path: &Path, depth: Option<usize>) -> Result<Vec<Entry>> {
        fs::list_tree(path, depth.unwrap_or(self.tree_depth)).await
    }

    /// Stat one path into an entry.
    pub async fn file_info(&self, path: &Path) -> Result<Entry> {
        fs::file_info(path).await
    }

    // --- mutation ---

    pub async fn create_folder(&self, parent: &Path, name: &str) -> Result<PathBuf> {
        fs::create_folder(parent, name).await
    }

    pub async fn rename(&self, old_path: &Path, new_name: &str) -> Result<PathBuf> {
        fs::rename(old_path, new_name).await
    }

    pub async fn delete(&self, path: &Path) -> Result<()> {
        fs::delete(path).await
    }

    pub async fn move_item(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf> {
        fs::move_item(source, dest_dir).await
    }

    pub async fn copy_items(&self, sources: &[PathBuf], dest_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::copy_items(sources, dest_dir).await
    }

    // --- watching ---

    /// Watch `path` for external changes, superseding any previous watch.
    /// Debounced signals arrive on `changes`.
    pub async fn watch(&self, path: &Path, changes: mpsc::Sender<()>) -> Result<()> {
        self.watcher.watch(path, changes).await
    }

    /// Release the active watch, if any.
    pub async fn unwatch(&self) {
        self.watcher.unwatch().await
    }

    // --- folder tags ---

    pub async fn read_folder_tags(&self, folder: &Path) -> Option<FolderMetadata> {
        sidecar::read_metadata(folder).await
    }

    pub async fn write_folder_tags(&self, folder: &Path, tags: Vec<String>) -> Result<()> {
        sidecar::write_tags(folder, tags).await
    }

    // --- thumbnails ---

    /// Cached thumbnail bytes for a file, or `None` when the file is not a
    /// supported image or generation failed.
    pub async fn get_thumbnail(&self, file: &Path) -> Option<Vec<u8>> {
        self.thumbnails.get(file).await
    }

    pub async fn clear_thumbnail_cache(&self) -> Result<()> {
        self.thumbnails.clear().await
    }

    pub async fn thumbnail_cache_size(&self) -> u64 {
        self.thumbnails.cache_size().await
    }
}
