//! Tar-backed resolver.
//!
//! The whole stream is drained once at build time; every header is indexed
//! and regular-file content is retained in memory, so queries never touch
//! the (possibly non-seekable) source again. After build the index is
//! immutable and shared behind an `Arc`.

use super::entry::{self, ArchiveEntry};
use super::glob;
use super::{mime, CancellationToken, FileResolver, LocationStream};
use crate::config::{ArchiveConfig, Compression, DEFAULT_CHANNEL_CAPACITY};
use crate::error::{ArchiveErrorKind, CatalogError, ErrorContext, OptionContext, Result};
use crate::model::{Coordinates, FileDigest, FileKind, FileMetadata, Location};
use crate::utils::{normalize_path, sha256_hex};
use flate2::read::GzDecoder;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const PREALLOC_LIMIT: u64 = 1 << 20;

/// Failure to index an archive, carrying whatever was indexed before it.
///
/// Callers choose between aborting and continuing with
/// [`ArchiveBuildError::into_partial`].
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ArchiveBuildError {
    #[source]
    error: CatalogError,
    partial: Box<ArchiveResolver>,
}

impl ArchiveBuildError {
    fn new(error: CatalogError, partial: ArchiveResolver) -> Self {
        Self {
            error,
            partial: Box::new(partial),
        }
    }

    /// The underlying failure.
    #[must_use]
    pub fn error(&self) -> &CatalogError {
        &self.error
    }

    /// The entries indexed before the failure.
    #[must_use]
    pub fn partial(&self) -> &ArchiveResolver {
        &self.partial
    }

    /// Keep the partial index and discard the error.
    #[must_use]
    pub fn into_partial(self) -> ArchiveResolver {
        *self.partial
    }
}

impl From<ArchiveBuildError> for CatalogError {
    fn from(err: ArchiveBuildError) -> Self {
        err.error
    }
}

#[derive(Debug, Default)]
struct ArchiveIndex {
    entries: IndexMap<String, ArchiveEntry>,
    // normalized name -> stored name, for names stored as "./x" or "/x"
    aliases: HashMap<String, String>,
    filesystem_id: String,
}

impl ArchiveIndex {
    fn new(filesystem_id: &str) -> Self {
        Self {
            filesystem_id: filesystem_id.to_string(),
            ..Self::default()
        }
    }

    fn ingest<R: Read>(&mut self, reader: R, max_entry_bytes: Option<u64>) -> Result<()> {
        let mut archive = tar::Archive::new(reader);
        let entries = archive
            .entries()
            .map_err(|e| CatalogError::decode("reading archive", e.to_string()))?;

        for (position, item) in entries.enumerate() {
            let entry = item
                .map_err(|e| CatalogError::decode("reading header", e.to_string()))
                .and_then(|item| read_entry(item, max_entry_bytes))
                .with_context(|| format!("entry {position}"))?;
            self.insert(entry);
        }
        Ok(())
    }

    /// Later entries with the same name replace earlier ones in place.
    fn insert(&mut self, entry: ArchiveEntry) {
        let normalized = normalize_path(&entry.name);
        if normalized != entry.name {
            self.aliases
                .insert(normalized.to_string(), entry.name.clone());
        }
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Exact stored name first, then the normalized form.
    fn lookup(&self, path: &str) -> Option<&ArchiveEntry> {
        if let Some(entry) = self.entries.get(path) {
            return Some(entry);
        }
        let normalized = normalize_path(path);
        self.entries.get(normalized).or_else(|| {
            self.aliases
                .get(normalized)
                .and_then(|stored| self.entries.get(stored))
        })
    }

    /// The entry a link points at, without following it any further.
    fn link_target(&self, link: &ArchiveEntry) -> Option<&ArchiveEntry> {
        let raw = link.link_target.as_deref()?;
        if link.kind == FileKind::Symlink {
            let resolved = resolve_symlink(&link.name, raw);
            if let Some(target) = self.lookup(&resolved) {
                return Some(target);
            }
        }
        self.lookup(raw)
    }

    /// The regular file an entry stands for, following at most one link.
    fn resolve<'a>(&'a self, entry: &'a ArchiveEntry) -> Option<&'a ArchiveEntry> {
        let file = match entry.kind {
            FileKind::Regular => entry,
            FileKind::Symlink | FileKind::HardLink => self.link_target(entry)?,
            _ => return None,
        };
        (file.kind == FileKind::Regular).then_some(file)
    }

    /// The regular file `path` names, following at most one link.
    fn get_file(&self, path: &str) -> Option<&ArchiveEntry> {
        self.resolve(self.lookup(path)?)
    }

    fn location(&self, file: &ArchiveEntry, access_path: &str) -> Location {
        Location {
            coordinates: Coordinates::new(file.name.clone(), self.filesystem_id.clone()),
            access_path: access_path.to_string(),
            annotations: Default::default(),
        }
    }

    /// Classify a matched entry: regular files as-is, links one hop.
    fn classify(&self, entry: &ArchiveEntry) -> Option<Location> {
        self.resolve(entry)
            .map(|file| self.location(file, &entry.name))
    }
}

/// Read one header and, for content-bearing kinds, its full body.
fn read_entry<R: Read>(
    mut item: tar::Entry<'_, R>,
    max_entry_bytes: Option<u64>,
) -> Result<ArchiveEntry> {
    let name = String::from_utf8_lossy(&item.path_bytes()).into_owned();
    let header = item.header();
    let kind = entry::kind_of(header.entry_type());
    let mode = header.mode().unwrap_or(0);
    let uid = header.uid().unwrap_or(0);
    let gid = header.gid().unwrap_or(0);
    let mod_time = header.mtime().ok().and_then(entry::mod_time);
    let size = item.size();
    let link_target = if kind.is_link() {
        item.link_name_bytes()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    } else {
        None
    };

    let content = if kind.carries_content() {
        if let Some(limit) = max_entry_bytes {
            if size > limit {
                return Err(CatalogError::archive(
                    format!("checking size of {name}"),
                    ArchiveErrorKind::EntryTooLarge {
                        path: name,
                        size,
                        limit,
                    },
                ));
            }
        }
        // Headers can lie about size; grow past this only as bytes arrive.
        let mut buf = Vec::with_capacity(usize::try_from(size.min(PREALLOC_LIMIT)).unwrap_or(0));
        item.read_to_end(&mut buf)
            .map_err(|e| CatalogError::decode("reading content", e.to_string()))
            .with_context(|| name.clone())?;
        if buf.len() as u64 != size {
            return Err(CatalogError::decode(
                format!("reading content of {name}"),
                format!("truncated: expected {size} bytes, got {}", buf.len()),
            ));
        }
        Some(Arc::from(buf))
    } else {
        None
    };

    Ok(ArchiveEntry {
        name,
        kind,
        link_target,
        size,
        mode,
        uid,
        gid,
        mod_time,
        content,
    })
}

/// Resolve a symlink target relative to the link's directory.
///
/// Absolute targets are taken relative to the archive root.
fn resolve_symlink(link_name: &str, target: &str) -> String {
    if target.starts_with('/') {
        return clean_path(target);
    }
    let link = normalize_path(link_name);
    let parent = link.rsplit_once('/').map_or("", |(dir, _)| dir);
    if parent.is_empty() {
        clean_path(target)
    } else {
        clean_path(&format!("{parent}/{target}"))
    }
}

/// Lexically collapse `.`, `..` and empty segments; never climbs above the root.
fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// A read-only, fully indexed tar or tar.gz archive.
///
/// Cloning is cheap; clones share one index.
#[derive(Clone)]
pub struct ArchiveResolver {
    index: Arc<ArchiveIndex>,
    channel_capacity: usize,
}

impl std::fmt::Debug for ArchiveResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveResolver")
            .field("entries", &self.index.entries.len())
            .field("filesystem_id", &self.index.filesystem_id)
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

impl ArchiveResolver {
    fn from_index(index: ArchiveIndex) -> Self {
        Self {
            index: Arc::new(index),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    fn build<R: Read>(
        reader: R,
        config: &ArchiveConfig,
    ) -> std::result::Result<Self, ArchiveBuildError> {
        let mut index = ArchiveIndex::new(&config.filesystem_id);
        let outcome = index.ingest(reader, config.max_entry_bytes);
        tracing::debug!(
            entries = index.entries.len(),
            complete = outcome.is_ok(),
            "indexed archive"
        );
        match outcome {
            Ok(()) => Ok(Self::from_index(index)),
            Err(error) => Err(ArchiveBuildError::new(error, Self::from_index(index))),
        }
    }

    /// Index an uncompressed tar stream.
    pub fn from_reader<R: Read>(
        reader: R,
        config: &ArchiveConfig,
    ) -> std::result::Result<Self, ArchiveBuildError> {
        Self::build(reader, config)
    }

    /// Index a gzip-compressed tar stream.
    pub fn from_gzip_reader<R: Read>(
        reader: R,
        config: &ArchiveConfig,
    ) -> std::result::Result<Self, ArchiveBuildError> {
        Self::build(GzDecoder::new(reader), config)
    }

    /// Index a tar stream, decompressing it when it starts with the gzip magic.
    pub fn from_reader_auto<R: Read>(
        reader: R,
        config: &ArchiveConfig,
    ) -> std::result::Result<Self, ArchiveBuildError> {
        let mut reader = BufReader::new(reader);
        let gzipped = match reader.fill_buf() {
            Ok(head) => head.starts_with(&GZIP_MAGIC),
            Err(e) => {
                let error = CatalogError::decode("sniffing compression", e.to_string());
                return Err(ArchiveBuildError::new(
                    error,
                    Self::from_index(ArchiveIndex::new(&config.filesystem_id)),
                ));
            }
        };
        if gzipped {
            Self::from_gzip_reader(reader, config)
        } else {
            Self::from_reader(reader, config)
        }
    }

    /// Index the archive at `path` using the configured compression.
    pub fn open(
        path: impl AsRef<Path>,
        config: &ArchiveConfig,
    ) -> std::result::Result<Self, ArchiveBuildError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ArchiveBuildError::new(
                CatalogError::io(path, e),
                Self::from_index(ArchiveIndex::new(&config.filesystem_id)),
            )
        })?;
        match config.compression {
            Compression::Auto => Self::from_reader_auto(file, config),
            Compression::Gzip => Self::from_gzip_reader(file, config),
            Compression::None => Self::from_reader(BufReader::new(file), config),
        }
    }

    /// Set the handoff queue size used by [`FileResolver::all_locations`].
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Number of distinct entry names indexed.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.index.entries.len()
    }

    /// Filesystem id stamped on every location this resolver returns.
    #[must_use]
    pub fn filesystem_id(&self) -> &str {
        &self.index.filesystem_id
    }

    /// Raw entries in archive order.
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.index.entries.values()
    }

    /// SHA-256 of the content at the location's real path.
    pub fn file_digest_by_location(&self, location: &Location) -> Result<FileDigest> {
        let content = self.content(location)?;
        Ok(FileDigest::new("sha256", sha256_hex(&content)))
    }

    /// Non-empty content stored at the real path itself; links have none.
    fn content(&self, location: &Location) -> Result<Arc<[u8]>> {
        let path = location.real_path();
        self.index
            .lookup(path)
            .and_then(ArchiveEntry::non_empty_content)
            .cloned()
            .or_not_found(path)
    }
}

impl FileResolver for ArchiveResolver {
    fn files_by_path(&self, paths: &[&str]) -> Result<Vec<Location>> {
        Ok(paths
            .iter()
            .filter_map(|path| {
                self.index
                    .get_file(path)
                    .map(|file| self.index.location(file, path))
            })
            .collect())
    }

    fn files_by_glob(&self, patterns: &[&str]) -> Result<Vec<Location>> {
        let matchers = glob::compile_all(patterns)?;
        Ok(self
            .index
            .entries
            .values()
            .filter(|entry| matchers.iter().any(|m| m.is_match(&entry.name)))
            .filter_map(|entry| self.index.classify(entry))
            .collect())
    }

    fn files_by_mime_type(&self, types: &[&str]) -> Result<Vec<Location>> {
        if types.is_empty() {
            return Ok(Vec::new());
        }
        // (entry as matched, regular file it resolves to)
        let candidates: Vec<(&ArchiveEntry, &ArchiveEntry)> = self
            .index
            .entries
            .values()
            .filter_map(|entry| self.index.resolve(entry).map(|file| (entry, file)))
            .collect();

        Ok(candidates
            .par_iter()
            .filter(|(_, file)| {
                let sniffed = mime::sniff(file.content().unwrap_or_default());
                let essence = sniffed.split(';').next().unwrap_or(sniffed).trim();
                types.iter().any(|t| *t == sniffed || *t == essence)
            })
            .map(|(entry, file)| self.index.location(file, &entry.name))
            .collect())
    }

    fn file_contents_by_location(&self, location: &Location) -> Result<Box<dyn Read + Send>> {
        let content = self.content(location)?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn file_metadata_by_location(&self, location: &Location) -> Result<FileMetadata> {
        let path = location.real_path();
        self.index
            .lookup(path)
            .map(ArchiveEntry::metadata)
            .or_not_found(path)
    }

    fn has_path(&self, path: &str) -> bool {
        match self.index.lookup(path) {
            Some(entry) if entry.kind.is_link() => self.index.link_target(entry).is_some(),
            Some(_) => true,
            None => false,
        }
    }

    fn relative_file_by_path(&self, _anchor: &Location, path: &str) -> Option<Location> {
        self.index
            .get_file(path)
            .map(|file| self.index.location(file, path))
    }

    fn all_locations(&self, cancel: &CancellationToken) -> LocationStream {
        let source = IndexLocations {
            index: Arc::clone(&self.index),
            position: 0,
        };
        LocationStream::spawn(source, self.channel_capacity, cancel)
    }
}

/// Raw entries as locations, in archive order.
struct IndexLocations {
    index: Arc<ArchiveIndex>,
    position: usize,
}

impl Iterator for IndexLocations {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        let (_, entry) = self.index.entries.get_index(self.position)?;
        self.position += 1;
        Some(self.index.location(entry, &entry.name))
    }
}
