//! Core data model definitions shared across Vantage crates.
#![allow(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use ::chrono;

pub mod entry;
pub mod ext;
pub mod metadata;

// Intentionally curated re-exports for downstream consumers.
pub use entry::{Entry, FileEntry, FolderEntry};
pub use ext::{
    IMAGE_EXTENSIONS, VIDEO_EXTENSIONS, is_image_extension, is_supported_extension,
    is_video_extension, normalized_extension,
};
pub use metadata::FolderMetadata;
