//! Shared utilities.

mod hash;
mod path;
mod version;

pub use hash::{content_hash, sha256_hex};
pub(crate) use path::normalize_path;
pub use version::compare_versions;
