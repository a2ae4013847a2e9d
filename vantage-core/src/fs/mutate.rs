//! Tree mutation: create, rename, trash, move, copy.
//!
//! Every operation here changes real user data, so the error policy is
//! strict: any underlying failure aborts and propagates. The tolerant
//! skip-and-continue behavior of the listing layer does not apply.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BrowserError, Result};
use crate::fs::conflict;

/// Create a folder under `parent`, auto-suffixing the name on conflict.
/// Fails when `parent` itself is missing.
pub async fn create_folder(parent: &Path, desired_name: &str) -> Result<PathBuf> {
    let path = conflict::resolve_folder_name(parent, desired_name).await;
    tokio::fs::create_dir(&path).await?;
    debug!(path = %path.display(), "created folder");
    Ok(path)
}

/// Rename an item in place.
///
/// Unlike create/move/copy, rename does not auto-suffix: a target that
/// already exists is rejected with [`BrowserError::NameConflict`] and
/// nothing on disk is touched.
pub async fn rename(old_path: &Path, new_name: &str) -> Result<PathBuf> {
    let dir = old_path
        .parent()
        .ok_or_else(|| BrowserError::Internal(format!(
            "cannot rename filesystem root {}",
            old_path.display()
        )))?;
    let new_path = dir.join(new_name);

    if tokio::fs::try_exists(&new_path).await? {
        return Err(BrowserError::NameConflict(new_path));
    }

    tokio::fs::rename(old_path, &new_path).await?;
    debug!(from = %old_path.display(), to = %new_path.display(), "renamed");
    Ok(new_path)
}

/// Move an item to the OS trash. Never a permanent delete; the user can
/// recover it through the system recycle bin.
pub async fn delete(path: &Path) -> Result<()> {
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || trash::delete(&target))
        .await
        .map_err(|err| BrowserError::Internal(format!("trash task panicked: {err}")))??;
    debug!(path = %path.display(), "moved to trash");
    Ok(())
}

/// Relocate `source` into `dest_dir`, auto-suffixing on conflict.
/// Directories move as one unit; contents are never merged into an
/// existing same-named directory.
pub async fn move_item(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let name = item_name(source)?;
    let dest = conflict::resolve_item_name(dest_dir, name).await;
    tokio::fs::rename(source, &dest).await?;
    debug!(from = %source.display(), to = %dest.display(), "moved");
    Ok(dest)
}

/// Copy each source into `dest_dir` under a conflict-free name,
/// recursively for directories.
///
/// A failure on any source aborts the whole call; already-copied items are
/// left in place with no partial-success report.
pub async fn copy_items(sources: &[PathBuf], dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(sources.len());

    for source in sources {
        let name = item_name(source)?;
        let dest = conflict::resolve_item_name(dest_dir, name).await;
        let metadata = tokio::fs::metadata(source).await?;

        if metadata.is_dir() {
            copy_dir_recursive(source, &dest).await?;
        } else {
            tokio::fs::copy(source, &dest).await?;
        }

        debug!(from = %source.display(), to = %dest.display(), "copied");
        copied.push(dest);
    }

    Ok(copied)
}

/// Plain file-and-directory walk. Symlinks and special files are skipped
/// rather than followed, which also keeps symlink cycles out of the walk.
async fn copy_dir_recursive(source: &Path, dest: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dest).await?;
    let mut read_dir = tokio::fs::read_dir(source).await?;

    while let Some(dirent) = read_dir.next_entry().await? {
        let file_type = dirent.file_type().await?;
        let child_src = dirent.path();
        let child_dest = dest.join(dirent.file_name());

        if file_type.is_dir() {
            Box::pin(copy_dir_recursive(&child_src, &child_dest)).await?;
        } else if file_type.is_file() {
            tokio::fs::copy(&child_src, &child_dest).await?;
        }
    }

    Ok(())
}

fn item_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BrowserError::NotFound(path.to_path_buf()))
}
