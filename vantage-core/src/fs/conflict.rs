//! " (n)" suffixing for create/move/copy destinations.
//!
//! The existence probe and the eventual create/rename are not atomic with
//! respect to concurrent external mutation; the blast radius of that race is
//! a naming surprise, not data loss, so no lock guards it.

use std::path::{Path, PathBuf};

/// First conflict-free path for a folder named `desired` under `dir`.
///
/// Folder names take the counter after the whole name: `trip`, `trip (1)`,
/// `trip (2)`, ...
pub async fn resolve_folder_name(dir: &Path, desired: &str) -> PathBuf {
    resolve(dir, desired, "").await
}

/// First conflict-free path for a file or directory named `desired` under
/// `dir`, inserting the counter before the extension when one exists:
/// `photo.jpg`, `photo (1).jpg`, `photo (2).jpg`, ...
pub async fn resolve_item_name(dir: &Path, desired: &str) -> PathBuf {
    let (stem, ext) = split_extension(desired);
    resolve(dir, stem, ext).await
}

async fn resolve(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{stem}{ext}"));
    let mut counter = 1u64;
    while path_exists(&candidate).await {
        candidate = dir.join(format!("{stem} ({counter}){ext}"));
        counter += 1;
    }
    candidate
}

async fn path_exists(path: &Path) -> bool {
    // try_exists treats permission failures as absent, which matches the
    // accepted check-then-act race semantics.
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Split a name at the final dot. Names without a dot, and dotfiles like
/// `.config`, have no recognized split point and suffix the whole name.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => {
            let split = stem.len();
            (&name[..split], &name[split..])
        }
        _ => (name, ""),
    }
}
