//! Content-addressed on-disk thumbnail cache.
//!
//! The cache path is a pure function of the source path string: sha256 of
//! the exact bytes, hex digest, first two hex chars as a shard directory.
//! Lookup is one stat, no index. The digest is never reversed or looked up
//! by value. Two path strings that denote the same file but differ
//! syntactically address different cache entries; no normalization is
//! attempted (known limitation, not silently fixed).
//!
//! Concurrent gets for distinct sources never contend because their cache
//! paths are disjoint by construction. Duplicate misses for one source may
//! both regenerate; the last writer wins, which is fine because the output
//! is deterministic for the same source bytes.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use vantage_model::{is_image_extension, normalized_extension};

use crate::error::Result;

/// Extension of cached derived images (lossy JPEG re-encode).
const CACHE_EXTENSION: &str = "jpg";

/// Staleness-aware thumbnail cache rooted at one directory.
#[derive(Clone, Debug)]
pub struct ThumbnailService {
    cache_dir: PathBuf,
    max_dimension: u32,
    quality: u8,
}

impl ThumbnailService {
    /// Cache with the stock 480px bounding box at JPEG quality 80.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self::with_settings(cache_dir, 480, 80)
    }

    pub fn with_settings(cache_dir: PathBuf, max_dimension: u32, quality: u8) -> Self {
        // Absolutize so cache paths stay stable regardless of later cwd
        // changes.
        let cache_dir = if cache_dir.is_absolute() {
            cache_dir
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(cache_dir)
        };

        Self {
            cache_dir,
            max_dimension: max_dimension.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    /// Deterministic cache location for a source path.
    pub fn cache_path_for(&self, source: &Path) -> PathBuf {
        let digest = Sha256::digest(source.as_os_str().as_encoded_bytes());
        let digest_hex = hex::encode(digest);
        self.cache_dir
            .join(&digest_hex[..2])
            .join(format!("{digest_hex}.{CACHE_EXTENSION}"))
    }

    /// Fetch a displayable thumbnail for `source`.
    ///
    /// Returns `None` for anything outside the image allow-list (videos get
    /// a caller-side placeholder) and for any read/decode/write failure;
    /// a broken source image must not take down a grid render, so failures
    /// are logged and absorbed here. A cached entry counts as fresh only
    /// when its mtime is strictly newer than the source's; equal stamps
    /// regenerate, which stays correct on coarse filesystem clocks.
    pub async fn get(&self, source: &Path) -> Option<Vec<u8>> {
        let extension = normalized_extension(source)?;
        if !is_image_extension(&extension) {
            return None;
        }

        let cache_path = self.cache_path_for(source);

        let source_modified = match tokio::fs::metadata(source).await {
            Ok(metadata) => metadata.modified().ok()?,
            Err(err) => {
                debug!(path = %source.display(), error = %err, "thumbnail source unreadable");
                return None;
            }
        };

        // A missing cache entry is an ordinary miss, not an error.
        if let Ok(cache_metadata) = tokio::fs::metadata(&cache_path).await
            && let Ok(cache_modified) = cache_metadata.modified()
            && cache_modified > source_modified
        {
            match tokio::fs::read(&cache_path).await {
                Ok(bytes) => return Some(bytes),
                Err(err) => {
                    debug!(
                        path = %cache_path.display(),
                        error = %err,
                        "cached thumbnail unreadable, regenerating"
                    );
                }
            }
        }

        self.generate(source, &cache_path).await
    }

    async fn generate(&self, source: &Path, cache_path: &Path) -> Option<Vec<u8>> {
        let source_path = source.to_path_buf();
        let (max_dimension, quality) = (self.max_dimension, self.quality);

        let encoded = tokio::task::spawn_blocking(move || {
            encode_thumbnail(&source_path, max_dimension, quality)
        })
        .await;

        let bytes = match encoded {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(err)) => {
                debug!(path = %source.display(), error = %err, "thumbnail generation failed");
                return None;
            }
            Err(err) => {
                warn!(path = %source.display(), error = %err, "thumbnail task panicked");
                return None;
            }
        };

        if let Some(shard_dir) = cache_path.parent()
            && let Err(err) = tokio::fs::create_dir_all(shard_dir).await
        {
            debug!(path = %shard_dir.display(), error = %err, "cannot create cache shard");
            return None;
        }
        if let Err(err) = tokio::fs::write(cache_path, &bytes).await {
            debug!(path = %cache_path.display(), error = %err, "cache write failed");
            return None;
        }

        Some(bytes)
    }

    /// Delete the entire cache and recreate it empty.
    ///
    /// Unlike lookups, this propagates failure: the cache root has to exist
    /// for subsequent lookups to work.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        Ok(())
    }

    /// Best-effort recursive byte total under the cache root; 0 when the
    /// root is missing or unreadable.
    pub async fn cache_size(&self) -> u64 {
        dir_size(&self.cache_dir).await
    }
}

async fn dir_size(dir: &Path) -> u64 {
    let Ok(mut read_dir) = tokio::fs::read_dir(dir).await else {
        return 0;
    };

    let mut size = 0;
    while let Ok(Some(dirent)) = read_dir.next_entry().await {
        let Ok(metadata) = dirent.metadata().await else {
            continue;
        };
        if metadata.is_dir() {
            size += Box::pin(dir_size(&dirent.path())).await;
        } else {
            size += metadata.len();
        }
    }
    size
}

/// Decode, fit within the bounding box without upscaling, re-encode lossy.
fn encode_thumbnail(path: &Path, max_dimension: u32, quality: u8) -> image::ImageResult<Vec<u8>> {
    let img = image::open(path)?;
    let img = if img.width() > max_dimension || img.height() > max_dimension {
        img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
    } else {
        img
    };

    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.to_rgb8().write_with_encoder(encoder)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use tempfile::tempdir;

    fn service(dir: &Path) -> ThumbnailService {
        ThumbnailService::new(dir.join("cache"))
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, image::Rgb([40, 90, 160]))
            .save(path)
            .unwrap();
    }

    fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).unwrap();
        (img.width(), img.height())
    }

    #[tokio::test]
    async fn cache_path_is_sharded_by_digest_prefix() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let cache_path = svc.cache_path_for(Path::new("/photos/sunset.jpg"));

        let file_name = cache_path.file_name().unwrap().to_str().unwrap();
        let (digest, ext) = file_name.split_once('.').unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(ext, "jpg");

        let shard = cache_path.parent().unwrap().file_name().unwrap();
        assert_eq!(shard.to_str().unwrap(), &digest[..2]);
    }

    #[tokio::test]
    async fn distinct_path_strings_get_distinct_entries() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        // No normalization: syntactic aliases address different entries.
        assert_ne!(
            svc.cache_path_for(Path::new("/photos/sunset.jpg")),
            svc.cache_path_for(Path::new("/photos/./sunset.jpg"))
        );
    }

    #[tokio::test]
    async fn large_source_fits_bounding_box_without_distortion() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let source = dir.path().join("wide.png");
        write_png(&source, 960, 480);

        let bytes = svc.get(&source).await.unwrap();
        assert_eq!(decoded_dimensions(&bytes), (480, 240));
    }

    #[tokio::test]
    async fn small_source_is_never_upscaled() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let source = dir.path().join("small.png");
        write_png(&source, 120, 80);

        let bytes = svc.get(&source).await.unwrap();
        assert_eq!(decoded_dimensions(&bytes), (120, 80));
    }

    #[tokio::test]
    async fn second_get_is_a_byte_identical_cache_hit() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let source = dir.path().join("photo.png");
        write_png(&source, 600, 600);

        let first = svc.get(&source).await.unwrap();
        let cache_path = svc.cache_path_for(&source);
        let written_at = std::fs::metadata(&cache_path).unwrap().modified().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        let second = svc.get(&source).await.unwrap();

        assert_eq!(first, second);
        // The cache file was not rewritten: no second re-encode happened.
        assert_eq!(
            std::fs::metadata(&cache_path).unwrap().modified().unwrap(),
            written_at
        );
    }

    #[tokio::test]
    async fn touching_the_source_invalidates_the_entry() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let source = dir.path().join("photo.png");
        write_png(&source, 600, 600);

        svc.get(&source).await.unwrap();
        let cache_path = svc.cache_path_for(&source);
        let first_written = std::fs::metadata(&cache_path).unwrap().modified().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        write_png(&source, 500, 500);

        let bytes = svc.get(&source).await.unwrap();
        assert_eq!(decoded_dimensions(&bytes), (480, 480));
        let second_written = std::fs::metadata(&cache_path).unwrap().modified().unwrap();
        assert!(second_written > first_written, "entry must regenerate");
    }

    #[tokio::test]
    async fn videos_never_get_thumbnails_even_when_cached() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"not really video data").unwrap();

        // Seed a cache entry at the video's hashed path; it must be ignored.
        let cache_path = svc.cache_path_for(&source);
        std::fs::create_dir_all(cache_path.parent().unwrap()).unwrap();
        std::fs::write(&cache_path, b"stale bytes").unwrap();

        assert!(svc.get(&source).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_source_yields_none_not_an_error() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let source = dir.path().join("broken.jpg");
        std::fs::write(&source, b"this is not a jpeg").unwrap();

        assert!(svc.get(&source).await.is_none());
    }

    #[tokio::test]
    async fn clear_empties_and_recreates_the_root() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let source = dir.path().join("photo.png");
        write_png(&source, 600, 600);
        svc.get(&source).await.unwrap();
        assert!(svc.cache_size().await > 0);

        svc.clear().await.unwrap();
        assert_eq!(svc.cache_size().await, 0);
        assert!(dir.path().join("cache").is_dir());
    }

    #[tokio::test]
    async fn cache_size_is_zero_for_missing_root() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        assert_eq!(svc.cache_size().await, 0);
    }
}
