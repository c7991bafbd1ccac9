#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_catalog::config::ArchiveConfig;
use sbom_catalog::{ArchiveResolver, CancellationToken, FileResolver};

/// Fuzz archive indexing with arbitrary bytes.
///
/// Malformed input must surface as a build error, never a panic, and any
/// partial index must still answer queries.
fuzz_target!(|data: &[u8]| {
    let config = ArchiveConfig {
        max_entry_bytes: Some(1 << 20),
        ..ArchiveConfig::default()
    };
    let resolver = match ArchiveResolver::from_reader_auto(data, &config) {
        Ok(resolver) => resolver,
        Err(err) => err.into_partial(),
    };
    let names: Vec<String> = resolver.entries().map(|e| e.name.clone()).collect();
    for name in &names {
        let _ = resolver.files_by_path(&[name.as_str()]);
        let _ = resolver.has_path(name);
    }
    let _ = resolver.files_by_mime_type(&["text/plain"]);
    let _ = resolver.all_locations(&CancellationToken::new()).count();
});
