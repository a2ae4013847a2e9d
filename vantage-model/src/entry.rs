//! Directory entry types returned by listings and tree reads.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// One file or folder record produced by a directory listing.
///
/// Serialized with an internal `type` tag (`"file"` / `"folder"`) and
/// camelCase fields, matching the wire format consumed by the UI layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Entry {
    #[cfg_attr(feature = "serde", serde(rename = "file"))]
    File(FileEntry),
    #[cfg_attr(feature = "serde", serde(rename = "folder"))]
    Folder(FolderEntry),
}

/// A media file entry. Non-media files are filtered out before this struct
/// is ever constructed, so `is_image` and `is_video` are never both false
/// by accident and never both true by construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FileEntry {
    /// Base name without any path separators.
    pub name: String,
    /// Absolute path, always `parent/name` of the directory that produced it.
    pub path: PathBuf,
    /// Lowercased extension including the leading dot.
    pub extension: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
    pub is_image: bool,
    pub is_video: bool,
}

/// A folder entry. `tags` stays empty unless the caller loads the sidecar
/// document; `children` is populated only by tree reads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FolderEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified_at: DateTime<Utc>,
    pub tags: Vec<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub children: Option<Vec<Entry>>,
}

impl Entry {
    /// Base name of the entry.
    pub fn name(&self) -> &str {
        match self {
            Entry::File(file) => &file.name,
            Entry::Folder(folder) => &folder.name,
        }
    }

    /// Absolute path of the entry.
    pub fn path(&self) -> &Path {
        match self {
            Entry::File(file) => &file.path,
            Entry::Folder(folder) => &folder.path,
        }
    }

    /// Last modification time reported by the filesystem.
    pub fn modified_at(&self) -> DateTime<Utc> {
        match self {
            Entry::File(file) => file.modified_at,
            Entry::Folder(folder) => folder.modified_at,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Entry::Folder(_))
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    fn sample_file() -> Entry {
        Entry::File(FileEntry {
            name: "sunset.jpg".into(),
            path: PathBuf::from("/photos/sunset.jpg"),
            extension: ".jpg".into(),
            size: 1024,
            modified_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            is_image: true,
            is_video: false,
        })
    }

    #[test]
    fn file_serializes_with_type_tag_and_camel_case() {
        let json = serde_json::to_value(sample_file()).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["isImage"], true);
        assert_eq!(json["isVideo"], false);
        assert_eq!(json["modifiedAt"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn folder_omits_children_when_absent() {
        let folder = Entry::Folder(FolderEntry {
            name: "trips".into(),
            path: PathBuf::from("/photos/trips"),
            modified_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            tags: vec![],
            children: None,
        });
        let json = serde_json::to_value(folder).unwrap();
        assert_eq!(json["type"], "folder");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn entry_round_trips() {
        let entry = sample_file();
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
