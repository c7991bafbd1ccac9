//! Structural file metadata returned by resolvers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    HardLink,
    CharDevice,
    BlockDevice,
    Fifo,
    /// Anything else the backing store can represent
    Other,
}

impl FileKind {
    /// Links carry a target path instead of content.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Symlink | Self::HardLink)
    }

    /// Whether entries of this kind can hold byte content.
    #[must_use]
    pub const fn carries_content(self) -> bool {
        matches!(self, Self::Regular | Self::Other)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Regular => "regular",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::HardLink => "hardlink",
            Self::CharDevice => "char-device",
            Self::BlockDevice => "block-device",
            Self::Fifo => "fifo",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Metadata describing one file as stored in its backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Path as stored
    pub path: String,
    pub kind: FileKind,
    /// Size in bytes
    pub size: u64,
    /// Target of a symlink or hardlink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
    /// Unix permission bits
    pub mode: u32,
    pub user_id: u64,
    pub group_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_time: Option<DateTime<Utc>>,
    /// MIME type sniffed from the leading content bytes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
}

/// A content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileDigest {
    /// Hash algorithm, lowercase (e.g. "sha256", "md5")
    pub algorithm: String,
    /// Lowercase hex digest
    pub value: String,
}

impl FileDigest {
    pub fn new(algorithm: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(FileKind::Symlink.is_link());
        assert!(FileKind::HardLink.is_link());
        assert!(!FileKind::Regular.is_link());
        assert!(FileKind::Regular.carries_content());
        assert!(!FileKind::Directory.carries_content());
        assert!(!FileKind::Fifo.carries_content());
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = FileMetadata {
            path: "link.txt".into(),
            kind: FileKind::Symlink,
            size: 0,
            link_target: Some("a/b.txt".into()),
            mode: 0o777,
            user_id: 0,
            group_id: 0,
            mod_time: None,
            mime_type: String::new(),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["kind"], "symlink");
        assert_eq!(json["linkTarget"], "a/b.txt");
        assert!(json.get("modTime").is_none());
        assert!(json.get("mimeType").is_none());
    }
}
