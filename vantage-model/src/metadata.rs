//! Per-folder sidecar metadata.

use chrono::{DateTime, Utc};

/// Contents of the hidden per-folder sidecar document.
///
/// `created_at` is fixed at the first write for a folder and never changes;
/// `updated_at` is refreshed and `tags` replaced wholesale on every
/// subsequent write. Writes are never partially merged.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FolderMetadata {
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FolderMetadata {
    /// Fresh document for a folder's first tag write.
    pub fn new(tags: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the tag set wholesale, keeping the original creation time.
    pub fn replace_tags(&mut self, tags: Vec<String>, now: DateTime<Utc>) {
        self.tags = tags;
        self.updated_at = now;
    }
}
