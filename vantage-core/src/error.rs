use std::path::PathBuf;

use thiserror::Error;

/// Failure states surfaced across the service boundary.
///
/// Listing and mutation failures propagate; per-entry stat failures, subtree
/// recursion failures, and thumbnail generation failures are absorbed where
/// they occur and never reach callers as errors.
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("a file or folder named {} already exists", .0.display())]
    NameConflict(PathBuf),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a supported media file: {}", .0.display())]
    Unsupported(PathBuf),

    #[error("trash error: {0}")]
    Trash(#[from] trash::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BrowserError>;
