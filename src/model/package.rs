//! Package records produced by catalogers.
//!
//! Ecosystem metadata is a closed sum type: every variant is known at compile
//! time, so ordering across metadata kinds is exhaustive rather than decided
//! by runtime type inspection. Variants are declared in name order, which
//! keeps the cross-variant order identical to a type-name comparison.

use super::{derive_identity, ArtifactId, FileDigest, Identifiable, LocationSet};
use crate::utils::compare_versions;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Packaging ecosystem of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageType {
    Deb,
    RustCrate,
    Unknown,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deb => write!(f, "deb"),
            Self::RustCrate => write!(f, "rust-crate"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Entries that claim ownership of files on disk.
pub trait FileOwner {
    /// Owned paths, sorted and deduplicated.
    fn owned_files(&self) -> Vec<String>;
}

/// A single file attributed to a Debian package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpkgFileRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<FileDigest>,
    #[serde(default)]
    pub is_config_file: bool,
}

/// A Debian package database entry (`var/lib/dpkg/status`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpkgDbEntry {
    pub package: String,
    #[serde(default)]
    pub source: String,
    pub version: String,
    #[serde(default)]
    pub source_version: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub maintainer: String,
    #[serde(default)]
    pub installed_size: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_depends: Vec<String>,
    #[serde(default)]
    pub files: Vec<DpkgFileRecord>,
}

impl FileOwner for DpkgDbEntry {
    fn owned_files(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| !f.path.is_empty())
            .map(|f| f.path.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// A `[[package]]` entry from a `Cargo.lock`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RustCargoLockEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A dependency recorded by `cargo auditable` inside a binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RustBinaryAuditEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub source: String,
}

/// Ecosystem-specific payload of a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "metadataType", content = "metadata", rename_all = "kebab-case")]
pub enum PackageMetadata {
    DpkgDbEntry(DpkgDbEntry),
    RustBinaryAuditEntry(RustBinaryAuditEntry),
    RustCargoLockEntry(RustCargoLockEntry),
}

impl PackageMetadata {
    /// Files claimed by this metadata; empty for kinds that own nothing.
    #[must_use]
    pub fn owned_files(&self) -> Vec<String> {
        match self {
            Self::DpkgDbEntry(entry) => entry.owned_files(),
            Self::RustBinaryAuditEntry(_) | Self::RustCargoLockEntry(_) => Vec::new(),
        }
    }
}

/// A cataloged package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: PackageType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purl: String,
    #[serde(default)]
    pub licenses: Vec<String>,
    /// Where the evidence for this package was found
    #[serde(default)]
    pub locations: LocationSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PackageMetadata>,
}

impl Package {
    /// Create a package with no locations or metadata.
    pub fn new(name: impl Into<String>, version: impl Into<String>, kind: PackageType) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind,
            purl: String::new(),
            licenses: Vec::new(),
            locations: LocationSet::new(),
            metadata: None,
        }
    }

    /// Set the package URL.
    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = purl.into();
        self
    }

    /// Add a location where evidence was found.
    #[must_use]
    pub fn with_location(mut self, location: super::Location) -> Self {
        self.locations.insert(location);
        self
    }

    /// Attach ecosystem metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Files this package claims to own.
    #[must_use]
    pub fn owned_files(&self) -> Vec<String> {
        self.metadata
            .as_ref()
            .map(PackageMetadata::owned_files)
            .unwrap_or_default()
    }
}

impl Ord for Package {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| compare_versions(&self.version, &other.version))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.purl.cmp(&other.purl))
            .then_with(|| self.licenses.cmp(&other.licenses))
            .then_with(|| self.locations.cmp(&other.locations))
            .then_with(|| self.metadata.cmp(&other.metadata))
    }
}

impl PartialOrd for Package {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Identifiable for Package {
    fn id(&self) -> ArtifactId {
        derive_identity(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    fn dpkg(name: &str, files: &[&str]) -> Package {
        Package::new(name, "1.0", PackageType::Deb).with_metadata(PackageMetadata::DpkgDbEntry(
            DpkgDbEntry {
                package: name.to_string(),
                version: "1.0".to_string(),
                files: files
                    .iter()
                    .map(|p| DpkgFileRecord {
                        path: (*p).to_string(),
                        digest: None,
                        is_config_file: false,
                    })
                    .collect(),
                ..Default::default()
            },
        ))
    }

    #[test]
    fn test_owned_files_sorted_unique() {
        let pkg = dpkg("libc6", &["/usr/lib/b.so", "", "/usr/lib/a.so", "/usr/lib/b.so"]);
        assert_eq!(pkg.owned_files(), vec!["/usr/lib/a.so", "/usr/lib/b.so"]);
        assert!(Package::new("x", "1", PackageType::Unknown).owned_files().is_empty());
    }

    #[test]
    fn test_ordering_uses_semver_aware_versions() {
        let a = Package::new("serde", "1.9.0", PackageType::RustCrate);
        let b = Package::new("serde", "1.10.0", PackageType::RustCrate);
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_metadata_variants_order_by_name() {
        let dpkg = PackageMetadata::DpkgDbEntry(DpkgDbEntry::default());
        let audit = PackageMetadata::RustBinaryAuditEntry(RustBinaryAuditEntry::default());
        let lock = PackageMetadata::RustCargoLockEntry(RustCargoLockEntry::default());
        assert!(dpkg < audit);
        assert!(audit < lock);
    }

    #[test]
    fn test_identity_is_structural() {
        let a = Package::new("zlib", "1.3", PackageType::Deb).with_location(Location::new("var/lib/dpkg/status"));
        let b = Package::new("zlib", "1.3", PackageType::Deb).with_location(Location::new("var/lib/dpkg/status"));
        assert_eq!(a.id(), b.id());
        assert!(!a.id().is_empty());

        let c = b.clone().with_purl("pkg:deb/debian/zlib@1.3");
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_metadata_serialization_is_tagged() {
        let meta = PackageMetadata::RustCargoLockEntry(RustCargoLockEntry {
            name: "serde".into(),
            version: "1.0.0".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["metadataType"], "rust-cargo-lock-entry");
        assert_eq!(json["metadata"]["name"], "serde");
    }
}
