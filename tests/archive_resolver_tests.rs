//! Integration tests for the tar-backed resolver.

use flate2::write::GzEncoder;
use sbom_catalog::config::{ArchiveConfig, Compression};
use sbom_catalog::{ArchiveResolver, CancellationToken, FileResolver, Identifiable, Location};
use std::io::{Read, Write};
use tar::{EntryType, Header};

enum Entry<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
    Symlink(&'a str, &'a str),
}

fn build_tar(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for entry in entries {
        let mut header = Header::new_gnu();
        header.set_mode(0o644);
        match entry {
            Entry::File(name, content) => {
                header.set_entry_type(EntryType::Regular);
                header.set_size(content.len() as u64);
                header.set_cksum();
                builder.append_data(&mut header, name, *content).unwrap();
            }
            Entry::Dir(name) => {
                header.set_entry_type(EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                header.set_cksum();
                builder.append_data(&mut header, name, std::io::empty()).unwrap();
            }
            Entry::Symlink(name, target) => {
                header.set_entry_type(EntryType::Symlink);
                header.set_size(0);
                builder.append_link(&mut header, name, target).unwrap();
            }
        }
    }
    builder.into_inner().unwrap()
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn index(entries: &[Entry<'_>]) -> ArchiveResolver {
    ArchiveResolver::from_reader(build_tar(entries).as_slice(), &ArchiveConfig::default()).unwrap()
}

fn contents(resolver: &dyn FileResolver, location: &Location) -> Vec<u8> {
    let mut buf = Vec::new();
    resolver
        .file_contents_by_location(location)
        .unwrap()
        .read_to_end(&mut buf)
        .unwrap();
    buf
}

fn real_paths(locations: &[Location]) -> Vec<&str> {
    locations.iter().map(Location::real_path).collect()
}

#[test]
fn symlink_lookup_reports_target_coordinates_and_content() {
    let resolver = index(&[
        Entry::Dir("a"),
        Entry::File("a/b.txt", b"hi"),
        Entry::Symlink("link.txt", "a/b.txt"),
    ]);

    let found = resolver.files_by_path(&["link.txt"]).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].coordinates.real_path, "a/b.txt");
    assert_eq!(found[0].access_path, "link.txt");
    assert_eq!(contents(&resolver, &found[0]), b"hi");
}

#[test]
fn glob_matches_across_directories() {
    let resolver = index(&[
        Entry::File("a/b.txt", b"b"),
        Entry::File("a/c.md", b"c"),
        Entry::File("d/e.txt", b"e"),
    ]);

    let found = resolver.files_by_glob(&["**/*.txt"]).unwrap();
    assert_eq!(real_paths(&found), vec!["a/b.txt", "d/e.txt"]);
}

#[test]
fn malformed_glob_is_an_error() {
    let resolver = index(&[Entry::File("a", b"a")]);
    let err = resolver.files_by_glob(&["**/*.txt", "[z"]).unwrap_err();
    assert!(err.is_invalid_pattern());
}

#[test]
fn empty_mime_list_returns_nothing() {
    let resolver = index(&[Entry::File("a.txt", b"text")]);
    assert!(resolver.files_by_mime_type(&[]).unwrap().is_empty());
    assert_eq!(resolver.files_by_mime_type(&["text/plain"]).unwrap().len(), 1);
}

#[test]
fn all_locations_yields_every_raw_entry() {
    let resolver = index(&[
        Entry::Dir("a"),
        Entry::File("a/b.txt", b"hi"),
        Entry::Symlink("link.txt", "a/b.txt"),
        Entry::Symlink("dangling", "missing"),
    ]);

    let all: Vec<Location> = resolver.all_locations(&CancellationToken::new()).collect();
    assert_eq!(all.len(), resolver.entry_count());
    assert_eq!(all.len(), 4);
    // Links are reported as stored, not dereferenced.
    assert!(all.iter().any(|l| l.real_path() == "link.txt"));
    assert!(all.iter().any(|l| l.real_path() == "dangling"));
}

#[test]
fn two_hop_chain_is_not_followed() {
    let resolver = index(&[
        Entry::File("target", b"x"),
        Entry::Symlink("hop2", "target"),
        Entry::Symlink("hop1", "hop2"),
    ]);
    assert!(resolver.files_by_path(&["hop1"]).unwrap().is_empty());
    assert!(resolver
        .relative_file_by_path(&Location::new("target"), "hop1")
        .is_none());
    assert_eq!(resolver.files_by_path(&["hop2"]).unwrap().len(), 1);
}

#[test]
fn relative_lookup_ignores_anchor() {
    let resolver = index(&[Entry::File("etc/os-release", b"ID=alpine\n")]);
    let anchor = Location::new("lib/apk/db/installed");
    let found = resolver.relative_file_by_path(&anchor, "etc/os-release").unwrap();
    assert_eq!(found.real_path(), "etc/os-release");
}

#[test]
fn decode_error_keeps_entries_read_so_far() {
    let mut bytes = build_tar(&[Entry::File("first", b"ok"), Entry::File("second", b"lost")]);
    // Second header starts after one header block and one content block.
    bytes[1024] ^= 0xff;

    let err = ArchiveResolver::from_reader(bytes.as_slice(), &ArchiveConfig::default()).unwrap_err();
    assert!(err.error().is_decode());
    assert_eq!(err.partial().entry_count(), 1);

    let partial = err.into_partial();
    assert!(partial.has_path("first"));
    assert!(!partial.has_path("second"));
}

#[test]
fn gzip_archive_opens_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rootfs.tar.gz");
    std::fs::write(
        &path,
        gzip(&build_tar(&[Entry::File("etc/os-release", b"ID=debian\n")])),
    )
    .unwrap();

    for compression in [Compression::Auto, Compression::Gzip] {
        let config = ArchiveConfig {
            compression,
            ..ArchiveConfig::default()
        };
        let resolver = ArchiveResolver::open(&path, &config).unwrap();
        let found = resolver.files_by_path(&["etc/os-release"]).unwrap();
        assert_eq!(contents(&resolver, &found[0]), b"ID=debian\n");
    }

    let plain = ArchiveConfig {
        compression: Compression::None,
        ..ArchiveConfig::default()
    };
    assert!(ArchiveResolver::open(&path, &plain).is_err());
}

#[test]
fn missing_archive_is_an_io_error() {
    let err = ArchiveResolver::open("/nonexistent/image.tar", &ArchiveConfig::default())
        .unwrap_err();
    assert!(!err.error().is_decode());
    assert_eq!(err.into_partial().entry_count(), 0);
}

#[test]
fn identities_are_stable_across_builds() {
    let entries = [Entry::File("usr/bin/rg", b"\x7fELF"), Entry::File("README", b"hi")];
    let first = index(&entries);
    let second = index(&entries);

    let ids = |r: &ArchiveResolver| -> Vec<String> {
        r.all_locations(&CancellationToken::new())
            .map(|l| l.id().to_string())
            .collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert!(ids(&first).iter().all(|id| !id.is_empty()));
}

#[test]
fn concurrent_queries_agree() {
    let names: Vec<String> = (0..200).map(|i| format!("pkg/{i:03}.txt")).collect();
    let entries: Vec<Entry<'_>> = names
        .iter()
        .map(|name| Entry::File(name.as_str(), b"payload"))
        .collect();
    let resolver = index(&entries);

    let expected = resolver.files_by_glob(&["pkg/*.txt"]).unwrap();
    assert_eq!(expected.len(), 200);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let found = resolver.files_by_glob(&["pkg/*.txt"]).unwrap();
                assert_eq!(found, expected);
                let streamed = resolver.all_locations(&CancellationToken::new()).count();
                assert_eq!(streamed, 200);
                assert!(resolver.has_path("pkg/199.txt"));
            });
        }
    });
}

#[test]
fn abandoned_enumeration_can_be_cancelled() {
    let names: Vec<String> = (0..1000).map(|i| format!("f{i}")).collect();
    let entries: Vec<Entry<'_>> = names.iter().map(|n| Entry::File(n.as_str(), b"")).collect();
    let resolver = index(&entries).with_channel_capacity(1);

    let cancel = CancellationToken::new();
    let mut stream = resolver.all_locations(&cancel);
    let head: Vec<Location> = stream.by_ref().take(3).collect();
    assert_eq!(real_paths(&head), vec!["f0", "f1", "f2"]);

    cancel.cancel();
    assert!(stream.next().is_none());
}
