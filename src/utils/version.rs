//! Version comparison utilities.

use semver::Version;
use std::cmp::Ordering;

/// Compare two version strings.
///
/// Versions that parse as semver order by semver precedence (build metadata
/// breaks ties) and sort before versions that do not parse; the latter
/// compare as plain strings. Mixing the two rules per pair would not be
/// transitive.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(ver_a), Ok(ver_b)) => ver_a.cmp(&ver_b).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
