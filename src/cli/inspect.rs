//! Archive inspection command handlers.
//!
//! Implements the `ls`, `find`, `cat`, `stat` and `ids` subcommands. Each
//! handler writes to the supplied writer so it can be exercised in tests.

use crate::config::CatalogConfig;
use crate::model::{FileKind, Identifiable, Location};
use crate::resolver::{ArchiveResolver, CancellationToken, FileResolver};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// What `find` should look for. Every non-empty list contributes matches.
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    pub paths: Vec<String>,
    pub globs: Vec<String>,
    pub mime_types: Vec<String>,
}

impl FindQuery {
    /// Whether no criteria were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.globs.is_empty() && self.mime_types.is_empty()
    }
}

/// Index the archive at `path`.
///
/// With `allow_partial`, a stream that fails part-way yields whatever was
/// indexed before the failure instead of an error.
pub fn open_archive(path: &Path, config: &CatalogConfig, allow_partial: bool) -> Result<ArchiveResolver> {
    let resolver = match ArchiveResolver::open(path, &config.archive) {
        Ok(resolver) => resolver,
        Err(err) if allow_partial => {
            tracing::warn!("using partial index of {}: {}", path.display(), err);
            err.into_partial()
        }
        Err(err) => {
            return Err(err).with_context(|| format!("indexing {}", path.display()));
        }
    };
    Ok(resolver.with_channel_capacity(config.enumeration.channel_capacity))
}

/// Run the ls command: every raw entry, in archive order.
pub fn run_ls(resolver: &dyn FileResolver, out: &mut dyn Write) -> Result<()> {
    let cancel = CancellationToken::new();
    for location in resolver.all_locations(&cancel) {
        writeln!(out, "{}", location.real_path())?;
    }
    Ok(())
}

/// Run the find command.
pub fn run_find(
    resolver: &dyn FileResolver,
    query: &FindQuery,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if query.is_empty() {
        bail!("find needs at least one of --path, --glob or --mime");
    }

    let mut found = Vec::new();
    if !query.paths.is_empty() {
        found.extend(resolver.files_by_path(&as_strs(&query.paths))?);
    }
    if !query.globs.is_empty() {
        found.extend(resolver.files_by_glob(&as_strs(&query.globs))?);
    }
    if !query.mime_types.is_empty() {
        found.extend(resolver.files_by_mime_type(&as_strs(&query.mime_types))?);
    }
    crate::ordering::sort_stable(&mut found);
    found.dedup();

    if json {
        serde_json::to_writer_pretty(&mut *out, &found)?;
        writeln!(out)?;
        return Ok(());
    }
    for location in &found {
        if location.is_virtual() {
            writeln!(out, "{} -> {}", location.access_path, location.real_path())?;
        } else {
            writeln!(out, "{}", location.real_path())?;
        }
    }
    Ok(())
}

/// Run the cat command: write the content `path` resolves to.
pub fn run_cat(resolver: &dyn FileResolver, path: &str, out: &mut dyn Write) -> Result<()> {
    let Some(location) = resolver.files_by_path(&[path])?.into_iter().next() else {
        bail!("no regular file at {path}");
    };
    let mut reader = resolver
        .file_contents_by_location(&location)
        .with_context(|| format!("reading {path}"))?;
    io::copy(&mut reader, out)?;
    Ok(())
}

#[derive(Serialize)]
struct StatOutput {
    #[serde(flatten)]
    metadata: crate::model::FileMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

/// Run the stat command: metadata of the raw entry at `path`, as JSON.
pub fn run_stat(resolver: &ArchiveResolver, path: &str, out: &mut dyn Write) -> Result<()> {
    let location = Location::new(path);
    let metadata = resolver
        .file_metadata_by_location(&location)
        .with_context(|| format!("stat {path}"))?;
    // Empty files have no content to digest.
    let sha256 = if metadata.kind == FileKind::Regular && metadata.size > 0 {
        Some(resolver.file_digest_by_location(&location)?.value)
    } else {
        None
    };
    serde_json::to_writer_pretty(&mut *out, &StatOutput { metadata, sha256 })?;
    writeln!(out)?;
    Ok(())
}

/// Run the ids command: every entry's coordinates with its identity.
pub fn run_ids(resolver: &dyn FileResolver, out: &mut dyn Write) -> Result<()> {
    let cancel = CancellationToken::new();
    for location in resolver.all_locations(&cancel) {
        writeln!(out, "{}  {}", location.id(), location.coordinates)?;
    }
    Ok(())
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
