//! One-level directory listing and depth-bounded tree reading.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use vantage_model::{
    Entry, FileEntry, FolderEntry, is_image_extension, is_supported_extension,
    is_video_extension, normalized_extension,
};

use crate::error::{BrowserError, Result};

/// Recursion cap applied when the caller does not supply a depth bound.
pub const DEFAULT_TREE_DEPTH: usize = 10;

/// List one directory level as typed entries.
///
/// Fails only when `path` itself cannot be opened. Dotfiles (including the
/// sidecar document) are hidden, unsupported file types are dropped, and
/// entries that cannot be stat'd are skipped silently so a single
/// inaccessible file never blanks the whole view. No ordering is imposed.
pub async fn list_directory(path: &Path) -> Result<Vec<Entry>> {
    let mut read_dir = tokio::fs::read_dir(path).await?;
    let mut entries = Vec::new();

    loop {
        let dirent = match read_dir.next_entry().await {
            Ok(Some(dirent)) => dirent,
            Ok(None) => break,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "directory iteration aborted early");
                break;
            }
        };

        let name = match dirent.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                debug!(name = ?raw, "skipping entry with non-UTF-8 name");
                continue;
            }
        };
        if name.starts_with('.') {
            continue;
        }

        let entry_path = dirent.path();
        let metadata = match dirent.metadata().await {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!(path = %entry_path.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let modified_at = modified_time(&metadata);

        if metadata.is_dir() {
            entries.push(Entry::Folder(FolderEntry {
                name,
                path: entry_path,
                modified_at,
                tags: Vec::new(),
                children: None,
            }));
        } else if metadata.is_file() {
            let Some(extension) = normalized_extension(&entry_path) else {
                continue;
            };
            if !is_supported_extension(&extension) {
                continue;
            }
            entries.push(Entry::File(FileEntry {
                name,
                path: entry_path,
                is_image: is_image_extension(&extension),
                is_video: is_video_extension(&extension),
                extension,
                size: metadata.len(),
                modified_at,
            }));
        }
    }

    Ok(entries)
}

/// Recursively list `path`, attaching `children` to folders up to
/// `max_depth` extra levels. Depth 0 returns one level with no children.
///
/// A subfolder that fails to list (permissions, races) gets an empty
/// children list instead of failing the whole call.
pub async fn list_tree(path: &Path, max_depth: usize) -> Result<Vec<Entry>> {
    let mut entries = list_directory(path).await?;

    if max_depth > 0 {
        for entry in &mut entries {
            if let Entry::Folder(folder) = entry {
                let children = Box::pin(list_tree(&folder.path, max_depth - 1)).await;
                folder.children = Some(match children {
                    Ok(children) => children,
                    Err(err) => {
                        debug!(
                            path = %folder.path.display(),
                            error = %err,
                            "subtree listing failed, attaching empty children"
                        );
                        Vec::new()
                    }
                });
            }
        }
    }

    Ok(entries)
}

/// Stat a single path into an `Entry`.
///
/// Files outside the media allow-list are rejected; listings would never
/// have produced an entry for them.
pub async fn file_info(path: &Path) -> Result<Entry> {
    let metadata = tokio::fs::metadata(path).await?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BrowserError::NotFound(path.to_path_buf()))?
        .to_owned();
    let modified_at = modified_time(&metadata);

    if metadata.is_dir() {
        return Ok(Entry::Folder(FolderEntry {
            name,
            path: path.to_path_buf(),
            modified_at,
            tags: Vec::new(),
            children: None,
        }));
    }

    let extension = normalized_extension(path)
        .filter(|ext| is_supported_extension(ext))
        .ok_or_else(|| BrowserError::Unsupported(path.to_path_buf()))?;

    Ok(Entry::File(FileEntry {
        name,
        path: path.to_path_buf(),
        is_image: is_image_extension(&extension),
        is_video: is_video_extension(&extension),
        extension,
        size: metadata.len(),
        modified_at,
    }))
}

fn modified_time(metadata: &std::fs::Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::write(path, b"data").unwrap();
    }

    #[tokio::test]
    async fn hidden_and_unsupported_entries_are_filtered() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("photo.jpg"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join(".vantage.json"));
        touch(&dir.path().join(".DS_Store"));
        std::fs::create_dir(dir.path().join("albums")).unwrap();

        let entries = list_directory(dir.path()).await.unwrap();
        let mut names: Vec<_> = entries.iter().map(Entry::name).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["albums", "photo.jpg"]);
    }

    #[tokio::test]
    async fn image_and_video_flags_are_disjoint() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("clip.MP4"));
        touch(&dir.path().join("scan.PNG"));

        let entries = list_directory(dir.path()).await.unwrap();
        assert_eq!(entries.len(), 2);
        for entry in entries {
            let Entry::File(file) = entry else {
                panic!("expected files only")
            };
            assert!(file.is_image ^ file.is_video, "{}", file.name);
            assert!(file.extension.starts_with('.'));
            assert_eq!(file.extension, file.extension.to_lowercase());
        }
    }

    #[tokio::test]
    async fn listing_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(list_directory(&missing).await.is_err());
    }

    #[tokio::test]
    async fn depth_zero_leaves_children_unpopulated() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        touch(&dir.path().join("a").join("one.jpg"));

        let entries = list_tree(dir.path(), 0).await.unwrap();
        let Entry::Folder(folder) = &entries[0] else {
            panic!("expected folder")
        };
        assert!(folder.children.is_none());
    }

    #[tokio::test]
    async fn tree_recurses_exactly_depth_levels() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b/c")).unwrap();

        let entries = list_tree(dir.path(), 1).await.unwrap();
        let Entry::Folder(a) = &entries[0] else {
            panic!("expected folder a")
        };
        let children = a.children.as_ref().unwrap();
        let Entry::Folder(b) = &children[0] else {
            panic!("expected folder b")
        };
        // Depth budget spent: b was listed but not descended into.
        assert!(b.children.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_subfolder_yields_empty_children() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        if std::fs::read_dir(&locked).is_ok() {
            // Running privileged; permissions are not enforced here.
            return;
        }

        let entries = list_tree(dir.path(), 2).await.unwrap();
        let Entry::Folder(folder) = &entries[0] else {
            panic!("expected folder")
        };
        assert_eq!(folder.children.as_deref(), Some(&[][..]));

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn file_info_rejects_non_media() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("notes.txt"));
        let err = file_info(&dir.path().join("notes.txt")).await.unwrap_err();
        assert!(matches!(err, BrowserError::Unsupported(_)));

        touch(&dir.path().join("pic.webp"));
        let entry = file_info(&dir.path().join("pic.webp")).await.unwrap();
        assert_eq!(entry.name(), "pic.webp");
    }
}
