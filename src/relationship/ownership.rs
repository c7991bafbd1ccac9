//! Ownership-by-file-overlap relationships.

use super::{sort_relationships, Relationship, RelationshipData, RelationshipType};
use crate::model::Package;
use crate::utils::normalize_path;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Link packages whose metadata claims files that other packages were found by.
///
/// For every package owning files, and every other package with a location at
/// one of those paths, emits `owner --ownership-by-file-overlap--> owned` with
/// the overlapping paths as [`RelationshipData::FileOverlap`]. Paths match
/// with leading `/` and `./` ignored, since package databases record absolute
/// paths while archive entries are usually relative.
///
/// Call this only after every cataloger for the source has finished: the
/// result is a claim over the whole package set.
#[must_use]
pub fn ownership_by_file_overlap(packages: &[Arc<Package>]) -> Vec<Relationship> {
    let mut found_at: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
    for (idx, package) in packages.iter().enumerate() {
        for location in package.locations.iter() {
            found_at
                .entry(normalize_path(location.real_path()))
                .or_default()
                .insert(idx);
            found_at
                .entry(normalize_path(&location.access_path))
                .or_default()
                .insert(idx);
        }
    }

    let mut relationships = Vec::new();
    for (owner_idx, owner) in packages.iter().enumerate() {
        let owned = owner.owned_files();
        if owned.is_empty() {
            continue;
        }

        let mut overlaps: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        for path in owned {
            let Some(children) = found_at.get(normalize_path(&path)) else {
                continue;
            };
            for &child_idx in children {
                if child_idx == owner_idx || packages[child_idx] == *owner {
                    continue;
                }
                overlaps.entry(child_idx).or_default().insert(path.clone());
            }
        }

        for (child_idx, files) in overlaps {
            relationships.push(
                Relationship::new(
                    Arc::clone(owner),
                    Arc::clone(&packages[child_idx]),
                    RelationshipType::OwnershipByFileOverlap,
                )
                .with_data(RelationshipData::FileOverlap {
                    files: files.into_iter().collect(),
                }),
            );
        }
    }

    tracing::debug!(
        packages = packages.len(),
        relationships = relationships.len(),
        "computed ownership-by-file-overlap relationships"
    );
    sort_relationships(&mut relationships);
    relationships
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DpkgDbEntry, DpkgFileRecord, Location, PackageMetadata, PackageType};
    use crate::relationship::Artifact;

    fn deb(name: &str, files: &[&str]) -> Arc<Package> {
        Arc::new(
            Package::new(name, "1.0", PackageType::Deb)
                .with_location(Location::new("var/lib/dpkg/status"))
                .with_metadata(PackageMetadata::DpkgDbEntry(DpkgDbEntry {
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
                })),
        )
    }

    fn binary_crate(name: &str, path: &str) -> Arc<Package> {
        Arc::new(Package::new(name, "0.1.0", PackageType::RustCrate).with_location(Location::new(path)))
    }

    #[test]
    fn test_overlap_links_owner_to_owned() {
        let ripgrep_deb = deb("ripgrep", &["/usr/bin/rg", "/usr/share/doc/ripgrep/copyright"]);
        let rg_crate = binary_crate("ripgrep", "usr/bin/rg");
        let unrelated = binary_crate("fd", "usr/bin/fd");

        let rels = ownership_by_file_overlap(&[ripgrep_deb.clone(), rg_crate.clone(), unrelated]);
        assert_eq!(rels.len(), 1);
        let rel = &rels[0];
        assert_eq!(rel.kind, RelationshipType::OwnershipByFileOverlap);
        assert_eq!(rel.from, Artifact::Package(ripgrep_deb));
        assert_eq!(rel.to, Artifact::Package(rg_crate));
        assert_eq!(
            rel.data,
            RelationshipData::FileOverlap {
                files: vec!["/usr/bin/rg".to_string()]
            }
        );
    }

    #[test]
    fn test_overlap_ignores_rooting_of_paths() {
        let owner = deb("coreutils", &["/bin/ls"]);
        let found = binary_crate("uutils", "./bin/ls");
        let rels = ownership_by_file_overlap(&[owner, found]);
        assert_eq!(rels.len(), 1);
        assert_eq!(
            rels[0].data,
            RelationshipData::FileOverlap {
                files: vec!["/bin/ls".to_string()]
            }
        );
    }

    #[test]
    fn test_no_self_ownership() {
        let pkg = deb("base-files", &["/var/lib/dpkg/status"]);
        assert!(ownership_by_file_overlap(&[pkg]).is_empty());
    }
}
