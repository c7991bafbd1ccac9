//! Caller-facing file locations.

use super::{ArtifactId, Coordinates, Identifiable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coordinates plus the path form the caller used to reach the file.
///
/// Returned by resolver queries and immutable afterwards. The access path
/// differs from the real path when the file was reached through a link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Path as requested by the caller
    #[serde(rename = "accessPath")]
    pub access_path: String,
    /// Free-form metadata attached by catalogers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl Location {
    /// A location reached directly by its real path.
    pub fn new(real_path: impl Into<String>) -> Self {
        let real_path = real_path.into();
        Self {
            coordinates: Coordinates::new(real_path.clone(), ""),
            access_path: real_path,
            annotations: BTreeMap::new(),
        }
    }

    /// A location on a specific filesystem (layer).
    pub fn with_filesystem(real_path: impl Into<String>, filesystem_id: impl Into<String>) -> Self {
        let coordinates = Coordinates::new(real_path, filesystem_id);
        Self::from_coordinates(coordinates)
    }

    /// A location whose access path differs from its real path.
    pub fn with_access_path(real_path: impl Into<String>, access_path: impl Into<String>) -> Self {
        Self {
            coordinates: Coordinates::new(real_path, ""),
            access_path: access_path.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// A location accessed by its real path.
    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            access_path: coordinates.real_path.clone(),
            coordinates,
            annotations: BTreeMap::new(),
        }
    }

    /// Attach an annotation.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// The canonicalized path.
    #[must_use]
    pub fn real_path(&self) -> &str {
        &self.coordinates.real_path
    }

    /// True when the file was reached through a different path than its real one.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.access_path != self.coordinates.real_path
    }
}

impl Identifiable for Location {
    /// Locations share the identity of their coordinates.
    fn id(&self) -> ArtifactId {
        self.coordinates.id()
    }
}

/// An ordered set of locations, unique by coordinates.
///
/// When two locations share coordinates the first one inserted is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<Location>", into = "Vec<Location>")]
pub struct LocationSet {
    locations: BTreeMap<Coordinates, Location>,
}

impl LocationSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a location; returns false if its coordinates were already present.
    pub fn insert(&mut self, location: Location) -> bool {
        if self.locations.contains_key(&location.coordinates) {
            return false;
        }
        self.locations
            .insert(location.coordinates.clone(), location);
        true
    }

    /// Whether a location with these coordinates is present.
    #[must_use]
    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        self.locations.contains_key(coordinates)
    }

    /// Number of locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locations in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Real paths in coordinate order.
    pub fn real_paths(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(|c| c.real_path.as_str())
    }
}

impl From<Vec<Location>> for LocationSet {
    fn from(locations: Vec<Location>) -> Self {
        locations.into_iter().collect()
    }
}

impl From<LocationSet> for Vec<Location> {
    fn from(set: LocationSet) -> Self {
        set.locations.into_values().collect()
    }
}

impl FromIterator<Location> for LocationSet {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let mut set = Self::new();
        for location in iter {
            set.insert(location);
        }
        set
    }
}

impl Extend<Location> for LocationSet {
    fn extend<I: IntoIterator<Item = Location>>(&mut self, iter: I) {
        for location in iter {
            self.insert(location);
        }
    }
}
