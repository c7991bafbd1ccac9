//! Typed, deterministically ordered edges between artifacts.
//!
//! A [`Relationship`] orders by `(from, to, type, data)` component-wise.
//! Two relationships are the *same edge* when `from`, `to`, and `type`
//! match; `data` only participates in sort order.
//!
//! Relationships must be built from fully resolved artifacts: the endpoints
//! are ordering keys, and an artifact that changes after the edge exists
//! would move the edge in sorted output.

mod ownership;

pub use ownership::ownership_by_file_overlap;

use crate::error::CatalogError;
use crate::model::{derive_identity, ArtifactId, Coordinates, Identifiable, Package};
use crate::ordering::{compare_dyn, compare_type_names, TryComparable};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The closed set of relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    /// The parent package's metadata claims a file the child package was found by.
    /// Only valid once all package cataloging for a source has completed.
    #[serde(rename = "ownership-by-file-overlap")]
    OwnershipByFileOverlap,
    /// The package's existence is evident from the file's contents.
    #[serde(rename = "evident-by")]
    EvidentBy,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "dependency-of")]
    DependencyOf,
    #[serde(rename = "described-by")]
    DescribedBy,
}

impl RelationshipType {
    /// Every relationship type.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::OwnershipByFileOverlap,
            Self::EvidentBy,
            Self::Contains,
            Self::DependencyOf,
            Self::DescribedBy,
        ]
    }

    /// Stable on-wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OwnershipByFileOverlap => "ownership-by-file-overlap",
            Self::EvidentBy => "evident-by",
            Self::Contains => "contains",
            Self::DependencyOf => "dependency-of",
            Self::DescribedBy => "described-by",
        }
    }
}

// Ordered by wire name, not declaration order.
impl Ord for RelationshipType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for RelationshipType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CatalogError::validation(format!("unknown relationship type '{s}'")))
    }
}

/// A relationship endpoint.
///
/// Same-variant endpoints compare structurally. Mixed variants order by
/// variant, declared in name order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Artifact {
    /// A file
    Coordinates(Coordinates),
    /// An artifact known only by identity (e.g. the scanned source itself)
    External(ArtifactId),
    /// A cataloged package
    Package(Arc<Package>),
}

impl Identifiable for Artifact {
    fn id(&self) -> ArtifactId {
        match self {
            Self::Coordinates(c) => c.id(),
            Self::External(id) => id.clone(),
            Self::Package(p) => p.id(),
        }
    }
}

impl From<Coordinates> for Artifact {
    fn from(coordinates: Coordinates) -> Self {
        Self::Coordinates(coordinates)
    }
}

impl From<Package> for Artifact {
    fn from(package: Package) -> Self {
        Self::Package(Arc::new(package))
    }
}

impl From<Arc<Package>> for Artifact {
    fn from(package: Arc<Package>) -> Self {
        Self::Package(package)
    }
}

/// Payload carried by a relationship.
///
/// Known payloads are enumerated; [`RelationshipData::Other`] is the open
/// extension point and orders through [`TryComparable`].
#[derive(Debug, Clone, Default)]
pub enum RelationshipData {
    Coordinates(Coordinates),
    #[default]
    Empty,
    /// Paths shared between the parent's owned files and the child's locations
    FileOverlap { files: Vec<String> },
    Other(Arc<dyn TryComparable>),
}

impl RelationshipData {
    /// Wrap an arbitrary comparable payload.
    pub fn other<T: TryComparable>(value: T) -> Self {
        Self::Other(Arc::new(value))
    }

    const fn variant_name(&self) -> &'static str {
        match self {
            Self::Coordinates(_) => "Coordinates",
            Self::Empty => "Empty",
            Self::FileOverlap { .. } => "FileOverlap",
            Self::Other(_) => "Other",
        }
    }
}

impl Ord for RelationshipData {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Coordinates(a), Self::Coordinates(b)) => a.cmp(b),
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::FileOverlap { files: a }, Self::FileOverlap { files: b }) => a.cmp(b),
            (Self::Other(a), Self::Other(b)) => compare_dyn(a.as_ref(), b.as_ref()),
            _ => compare_type_names(self.variant_name(), other.variant_name()),
        }
    }
}

impl PartialOrd for RelationshipData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RelationshipData {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RelationshipData {}

/// A typed edge between two artifacts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Relationship {
    pub from: Artifact,
    pub to: Artifact,
    pub kind: RelationshipType,
    pub data: RelationshipData,
}

#[derive(Serialize)]
struct EdgeIdentity<'a> {
    from: &'a ArtifactId,
    to: &'a ArtifactId,
    #[serde(rename = "type")]
    kind: RelationshipType,
}

impl Relationship {
    /// Create a relationship with no payload.
    pub fn new(from: impl Into<Artifact>, to: impl Into<Artifact>, kind: RelationshipType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            data: RelationshipData::Empty,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_data(mut self, data: RelationshipData) -> Self {
        self.data = data;
        self
    }

    /// Whether both relationships describe the same edge, ignoring data.
    #[must_use]
    pub fn same_edge(&self, other: &Self) -> bool {
        self.kind == other.kind && self.from == other.from && self.to == other.to
    }
}

impl Identifiable for Relationship {
    /// Derived from the endpoint identities and type; data is excluded.
    fn id(&self) -> ArtifactId {
        let from = self.from.id();
        let to = self.to.id();
        derive_identity(&EdgeIdentity {
            from: &from,
            to: &to,
            kind: self.kind,
        })
    }
}

/// Sort relationships by `(from, to, type, data)`, keeping input order for ties.
pub fn sort_relationships(relationships: &mut [Relationship]) {
    crate::ordering::sort_stable(relationships);
}

/// Drop later relationships that repeat an earlier edge.
#[must_use]
pub fn dedup_edges(relationships: Vec<Relationship>) -> Vec<Relationship> {
    let mut seen = BTreeSet::new();
    relationships
        .into_iter()
        .filter(|rel| seen.insert((rel.from.clone(), rel.to.clone(), rel.kind)))
        .collect()
}
