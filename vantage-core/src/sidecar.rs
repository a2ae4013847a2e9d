//! Per-folder sidecar metadata document.
//!
//! One hidden JSON file per folder, sibling to the folder's contents. The
//! dotfile filter in the listing layer keeps it out of every view.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;
use vantage_model::FolderMetadata;

use crate::error::Result;

/// Fixed hidden file name of the sidecar document.
pub const SIDECAR_FILENAME: &str = ".vantage.json";

fn sidecar_path(folder: &Path) -> PathBuf {
    folder.join(SIDECAR_FILENAME)
}

/// Read a folder's sidecar document.
///
/// A missing file means the folder was never tagged; a corrupt one is
/// reported and treated the same. Neither is an error to the caller.
pub async fn read_metadata(folder: &Path) -> Option<FolderMetadata> {
    let path = sidecar_path(folder);
    let raw = tokio::fs::read_to_string(&path).await.ok()?;
    match serde_json::from_str(&raw) {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring corrupt sidecar document");
            None
        }
    }
}

/// Replace a folder's tag set wholesale.
///
/// Creates the document on first write (fixing `createdAt` permanently);
/// later writes refresh `updatedAt` and swap the tags. Writes are never
/// merged with existing tags.
pub async fn write_tags(folder: &Path, tags: Vec<String>) -> Result<()> {
    let now = Utc::now();
    let metadata = match read_metadata(folder).await {
        Some(mut existing) => {
            existing.replace_tags(tags, now);
            existing
        }
        None => FolderMetadata::new(tags, now),
    };

    let body = serde_json::to_string_pretty(&metadata)?;
    tokio::fs::write(sidecar_path(folder), body).await?;
    Ok(())
}
