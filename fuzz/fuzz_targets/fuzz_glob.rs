#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz glob compilation and matching.
///
/// The first line is the pattern, the rest are candidate paths. Invalid
/// patterns must be reported as errors.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut lines = s.lines();
        let Some(pattern) = lines.next() else {
            return;
        };
        if let Ok(matcher) = sbom_catalog::resolver::glob::compile(pattern) {
            for path in lines {
                let _ = matcher.is_match(path);
            }
        }
    }
});
