//! File resolution over heterogeneous backing stores.
//!
//! A [`FileResolver`] is the capability set every backing store exposes to
//! catalogers: path, glob, and MIME lookups, content and metadata access, and
//! a lazy enumeration of every entry. All operations are read-only; a built
//! resolver can be shared across threads and queried concurrently.
//!
//! Lookup misses are never errors for the batch operations: a path that does
//! not resolve to a regular file is skipped silently. Content and metadata
//! access on a missing location return a not-found error
//! ([`CatalogError::is_not_found`](crate::error::CatalogError::is_not_found)).

mod archive;
mod cancel;
mod entry;
pub mod glob;
pub mod mime;
mod stream;

pub use archive::{ArchiveBuildError, ArchiveResolver};
pub use cancel::CancellationToken;
pub use entry::ArchiveEntry;
pub use stream::LocationStream;

use crate::error::Result;
use crate::model::{FileMetadata, Location};
use std::io::Read;

/// The interface every backing store implements.
pub trait FileResolver: Send + Sync {
    /// Locations of the regular files the given paths resolve to.
    ///
    /// A path naming a symlink or hardlink is followed one hop; paths that do
    /// not end at a regular file are skipped.
    fn files_by_path(&self, paths: &[&str]) -> Result<Vec<Location>>;

    /// Locations of regular files whose stored path matches any pattern.
    ///
    /// Patterns use recursive glob syntax (`**` spans directories). A
    /// malformed pattern fails the whole call.
    fn files_by_glob(&self, patterns: &[&str]) -> Result<Vec<Location>>;

    /// Locations of regular files whose sniffed content type is one of `types`.
    ///
    /// An empty `types` yields an empty result.
    fn files_by_mime_type(&self, types: &[&str]) -> Result<Vec<Location>>;

    /// Reader over the content at the location's real path.
    fn file_contents_by_location(&self, location: &Location) -> Result<Box<dyn Read + Send>>;

    /// Structural metadata for the location's real path.
    fn file_metadata_by_location(&self, location: &Location) -> Result<FileMetadata>;

    /// Whether the path exists; links must have an existing target (one hop).
    fn has_path(&self, path: &str) -> bool;

    /// Resolve `path` as a sibling of `anchor`.
    ///
    /// Layered stores restrict the lookup to the anchor's layer and below;
    /// single-filesystem stores ignore the anchor.
    fn relative_file_by_path(&self, anchor: &Location, path: &str) -> Option<Location>;

    /// Every indexed entry, files and directories, without link resolution.
    ///
    /// Produced lazily by a background producer that stops when `cancel`
    /// fires or the returned stream is dropped.
    fn all_locations(&self, cancel: &CancellationToken) -> LocationStream;
}
