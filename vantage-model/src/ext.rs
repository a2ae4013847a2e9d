//! Fixed extension allow-lists for browsable media.
//!
//! The lists are deliberately not user-configurable: every listing and
//! thumbnail decision in the workspace keys off these two disjoint sets.

use std::path::Path;

/// Image extensions eligible for listing and thumbnail generation.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// Video extensions eligible for listing. Thumbnails for these are deferred
/// to the caller, which shows a placeholder.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".mkv", ".webm", ".avi"];

/// Lowercased extension of `path` including the leading dot, or `None` when
/// the file name has no extension.
pub fn normalized_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// Whether `ext` (leading dot, lowercase) names a supported image format.
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// Whether `ext` (leading dot, lowercase) names a supported video format.
pub fn is_video_extension(ext: &str) -> bool {
    VIDEO_EXTENSIONS.contains(&ext)
}

/// Whether `ext` belongs to either allow-list.
pub fn is_supported_extension(ext: &str) -> bool {
    is_image_extension(ext) || is_video_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn allow_lists_are_disjoint() {
        for ext in IMAGE_EXTENSIONS {
            assert!(!VIDEO_EXTENSIONS.contains(ext), "{ext} in both lists");
        }
    }

    #[test]
    fn extension_is_lowercased_with_leading_dot() {
        let path = PathBuf::from("/photos/Sunset.JPG");
        assert_eq!(normalized_extension(&path).as_deref(), Some(".jpg"));
    }

    #[test]
    fn extensionless_names_have_no_extension() {
        assert_eq!(normalized_extension(Path::new("/photos/README")), None);
        assert_eq!(normalized_extension(Path::new("/photos/.hidden")), None);
    }

    #[test]
    fn supported_covers_both_lists() {
        assert!(is_supported_extension(".png"));
        assert!(is_supported_extension(".mkv"));
        assert!(!is_supported_extension(".txt"));
    }
}
