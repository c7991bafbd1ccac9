//! Content-addressable identity for catalog artifacts.
//!
//! An identity is the xxh3 hash of a value's canonical JSON encoding. The
//! encoding goes through [`serde_json::Value`], whose object maps are ordered
//! by key, so field order and hash-map iteration order never leak into the
//! result. Identical structural content yields the identical identity in any
//! process, on any platform.

use crate::error::{CatalogError, Result};
use crate::utils::content_hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier derived from an artifact's structural content.
///
/// An empty id means "unknown identity": derivation failed for this value.
/// All empty ids compare equal, so callers must check [`ArtifactId::is_empty`]
/// before treating two ids as proof that two artifacts are the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// The unknown identity.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Wrap an identifier computed elsewhere (e.g. read back from a document).
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the identifier string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when derivation failed for the underlying value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entity exposing a stable identity.
pub trait Identifiable {
    /// The entity's identity; empty if it could not be derived.
    fn id(&self) -> ArtifactId;
}

/// Canonical byte encoding of `value`.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let canonical = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&canonical)?)
}

/// Derive an identity, surfacing encoding failures.
pub fn try_derive_identity<T: Serialize + ?Sized>(value: &T) -> Result<ArtifactId> {
    let bytes = canonical_bytes(value).map_err(|e| {
        CatalogError::validation(format!(
            "unable to canonically encode {}: {e}",
            std::any::type_name::<T>()
        ))
    })?;
    Ok(ArtifactId(format!("{:016x}", content_hash(&bytes))))
}

/// Derive an identity, degrading to [`ArtifactId::empty`] on failure.
///
/// Failure never aborts the caller; it is logged as a warning.
pub fn derive_identity<T: Serialize + ?Sized>(value: &T) -> ArtifactId {
    match try_derive_identity(value) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(
                type_name = std::any::type_name::<T>(),
                "identity derivation failed, treating identity as unknown: {e}"
            );
            ArtifactId::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Serialize)]
    struct Record {
        name: String,
        tags: HashMap<String, String>,
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record {
            name: "zlib".to_string(),
            tags: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_identity_is_deterministic() {
        let a = record(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let b = record(&[("c", "3"), ("a", "1"), ("b", "2")]);
        assert_eq!(derive_identity(&a), derive_identity(&a));
        assert_eq!(derive_identity(&a), derive_identity(&b));
        assert_eq!(derive_identity(&a).as_str().len(), 16);
    }

    #[test]
    fn test_identity_changes_with_content() {
        let a = record(&[("a", "1")]);
        let b = record(&[("a", "2")]);
        assert_ne!(derive_identity(&a), derive_identity(&b));
    }

    #[test]
    fn test_unencodable_value_yields_empty_identity() {
        let mut bad: BTreeMap<(u8, u8), u8> = BTreeMap::new();
        bad.insert((1, 2), 3);

        assert!(try_derive_identity(&bad).is_err());
        let id = derive_identity(&bad);
        assert!(id.is_empty());
        assert_eq!(id, ArtifactId::empty());
    }

    #[test]
    fn test_display_and_serde_are_transparent() {
        let id = ArtifactId::from_raw("00ff");
        assert_eq!(id.to_string(), "00ff");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"00ff\"");
    }
}
