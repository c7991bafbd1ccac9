//! Structural identity of a file within a backing store.

use super::{derive_identity, ArtifactId, Identifiable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The minimal information needed to find a file within any source.
///
/// Equality is field-wise and ordering is lexicographic on
/// `(real_path, filesystem_id)`, which is exactly the derived order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinates {
    /// Path whose every ancestor is free of symlinks and hardlinks
    #[serde(rename = "path")]
    pub real_path: String,
    /// Backing filesystem (e.g. an image layer digest); empty for single-filesystem sources
    #[serde(rename = "layerID", default, skip_serializing_if = "String::is_empty")]
    pub filesystem_id: String,
}

impl Coordinates {
    /// Create coordinates for a path within a filesystem.
    pub fn new(real_path: impl Into<String>, filesystem_id: impl Into<String>) -> Self {
        Self {
            real_path: real_path.into(),
            filesystem_id: filesystem_id.into(),
        }
    }
}

impl Identifiable for Coordinates {
    fn id(&self) -> ArtifactId {
        derive_identity(self)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location<RealPath={:?}", self.real_path)?;
        if !self.filesystem_id.is_empty() {
            write!(f, " Layer={:?}", self.filesystem_id)?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_ordering_is_path_then_filesystem() {
        let a = Coordinates::new("a", "z");
        let b = Coordinates::new("b", "a");
        let a2 = Coordinates::new("a", "zz");
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(a.cmp(&a2), Ordering::Less);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_encoding_omits_empty_layer() {
        let c = Coordinates::new("etc/passwd", "");
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"path":"etc/passwd"}"#
        );

        let c = Coordinates::new("etc/passwd", "sha256:abc");
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"path":"etc/passwd","layerID":"sha256:abc"}"#
        );

        let back: Coordinates = serde_json::from_str(r#"{"path":"etc/passwd"}"#).unwrap();
        assert_eq!(back, Coordinates::new("etc/passwd", ""));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Coordinates::new("a/b", "").to_string(),
            r#"Location<RealPath="a/b">"#
        );
        assert_eq!(
            Coordinates::new("a/b", "l1").to_string(),
            r#"Location<RealPath="a/b" Layer="l1">"#
        );
    }

    #[test]
    fn test_identity_distinguishes_layers() {
        let a = Coordinates::new("a/b", "");
        let b = Coordinates::new("a/b", "layer");
        assert_eq!(a.id(), Coordinates::new("a/b", "").id());
        assert_ne!(a.id(), b.id());
    }
}
