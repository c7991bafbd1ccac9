//! Catalog data model: the identities every artifact and file location share.
//!
//! [`Coordinates`] name a file inside one backing store, [`Location`] adds the
//! path the caller asked for, and [`Package`] is the hashable, comparable
//! package record catalogers emit. Anything that can be serialized can derive
//! an [`ArtifactId`] through [`derive_identity`].
//!
//! ```
//! use sbom_catalog::model::{Coordinates, Identifiable};
//!
//! let a = Coordinates::new("usr/lib/os-release", "");
//! let b = Coordinates::new("usr/lib/os-release", "");
//! assert_eq!(a.id(), b.id());
//! assert!(!a.id().is_empty());
//! ```

mod coordinates;
mod identity;
mod location;
mod metadata;
mod package;

pub use coordinates::*;
pub use identity::*;
pub use location::*;
pub use metadata::*;
pub use package::*;
