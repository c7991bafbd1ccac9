//! **Deterministic identity and file resolution for software catalogers.**
//!
//! `sbom-catalog` is the layer every cataloger stands on when it turns a
//! container image, directory, or archive into a software bill of materials:
//!
//! - **Identity**: every artifact (file coordinates, packages, relationships)
//!   derives a stable [`ArtifactId`] from its canonical encoding, so equal
//!   content always yields equal ids across runs and machines.
//! - **Ordering**: heterogeneous records sort deterministically through
//!   [`Ord`] on closed sum types, with the [`ordering::TryComparable`] escape
//!   hatch for open extension points.
//! - **Resolution**: the [`FileResolver`] capability set addresses file content
//!   and metadata uniformly, and [`ArchiveResolver`] implements it over a tar or
//!   tar.gz stream indexed once in memory.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Coordinates`], [`Location`], file metadata, and the
//!   [`Package`] record.
//! - **[`ordering`]**: comparison helpers and stable sorting.
//! - **[`relationship`]**: typed edges between artifacts and the
//!   ownership-by-file-overlap builder.
//! - **[`resolver`]**: the resolver trait, cancellable location streams, and the
//!   archive resolver.
//! - **[`config`]**: YAML configuration with discovery and validation.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_catalog::config::ArchiveConfig;
//! use sbom_catalog::{ArchiveResolver, FileResolver, Identifiable};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = ArchiveResolver::open("rootfs.tar.gz", &ArchiveConfig::default())?;
//!
//!     for location in resolver.files_by_glob(&["**/os-release"])? {
//!         println!("{} {}", location.id(), location.coordinates);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod ordering;
pub mod relationship;
pub mod resolver;
pub mod utils;

// Re-export main types for convenience
pub use config::{ArchiveConfig, CatalogConfig, CatalogConfigBuilder, Compression};
pub use config::{ConfigError, Validatable};
pub use error::{CatalogError, ErrorContext, OptionContext, Result};
pub use model::{
    derive_identity, ArtifactId, Coordinates, FileDigest, FileKind, FileMetadata, Identifiable,
    Location, LocationSet, Package, PackageMetadata, PackageType,
};
pub use ordering::TryComparable;
pub use relationship::{
    dedup_edges, ownership_by_file_overlap, sort_relationships, Artifact, Relationship,
    RelationshipData, RelationshipType,
};
pub use resolver::{
    ArchiveBuildError, ArchiveResolver, CancellationToken, FileResolver, LocationStream,
};
