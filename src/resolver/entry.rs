//! Indexed archive entries.

use crate::model::{FileKind, FileMetadata};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tar::EntryType;

/// One header (plus content, for regular files) from an indexed archive.
///
/// Built once while the stream is consumed and immutable afterwards.
#[derive(Clone)]
pub struct ArchiveEntry {
    /// Name exactly as stored in the header
    pub name: String,
    pub kind: FileKind,
    /// Target of a symlink or hardlink
    pub link_target: Option<String>,
    /// Size declared by the header
    pub size: u64,
    pub mode: u32,
    pub uid: u64,
    pub gid: u64,
    pub mod_time: Option<DateTime<Utc>>,
    pub(crate) content: Option<Arc<[u8]>>,
}

impl ArchiveEntry {
    /// Content bytes, if the entry carried any.
    #[must_use]
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Content that is present and non-empty.
    pub(crate) fn non_empty_content(&self) -> Option<&Arc<[u8]>> {
        self.content.as_ref().filter(|c| !c.is_empty())
    }

    pub(crate) fn metadata(&self) -> FileMetadata {
        let mime_type = match (self.kind, self.content()) {
            (FileKind::Regular, Some(content)) => super::mime::sniff(content).to_string(),
            _ => String::new(),
        };
        FileMetadata {
            path: self.name.clone(),
            kind: self.kind,
            size: self.size,
            link_target: self.link_target.clone(),
            mode: self.mode,
            user_id: self.uid,
            group_id: self.gid,
            mod_time: self.mod_time,
            mime_type,
        }
    }
}

impl std::fmt::Debug for ArchiveEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("link_target", &self.link_target)
            .field("size", &self.size)
            .field("content_len", &self.content.as_ref().map(|c| c.len()))
            .finish_non_exhaustive()
    }
}

/// Map a tar header type onto a file kind.
pub(crate) fn kind_of(entry_type: EntryType) -> FileKind {
    match entry_type {
        EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => FileKind::Regular,
        EntryType::Directory => FileKind::Directory,
        EntryType::Symlink => FileKind::Symlink,
        EntryType::Link => FileKind::HardLink,
        EntryType::Char => FileKind::CharDevice,
        EntryType::Block => FileKind::BlockDevice,
        EntryType::Fifo => FileKind::Fifo,
        _ => FileKind::Other,
    }
}

/// Convert a header mtime (seconds since the epoch) to UTC.
pub(crate) fn mod_time(seconds: u64) -> Option<DateTime<Utc>> {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
