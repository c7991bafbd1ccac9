//! Recursive glob matching over stored archive paths.

use crate::error::{CatalogError, Result};
use crate::utils::normalize_path;
use globset::{GlobBuilder, GlobMatcher};

/// A compiled glob pattern.
///
/// `*` and `?` never cross a `/`; `**` spans any number of directories.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: String,
    matcher: GlobMatcher,
}

impl PathMatcher {
    /// The pattern as given.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match a stored path, also trying it without a leading `./` or `/`.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        if self.matcher.is_match(path) {
            return true;
        }
        let normalized = normalize_path(path);
        normalized != path && self.matcher.is_match(normalized)
    }
}

/// Compile one pattern, surfacing malformed syntax as an invalid-pattern error.
pub fn compile(pattern: &str) -> Result<PathMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|e| CatalogError::invalid_pattern(pattern, e.kind().to_string()))?;
    Ok(PathMatcher {
        pattern: pattern.to_string(),
        matcher: glob.compile_matcher(),
    })
}

/// Compile every pattern, failing on the first malformed one.
pub fn compile_all(patterns: &[&str]) -> Result<Vec<PathMatcher>> {
    patterns.iter().map(|p| compile(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_star_spans_directories() {
        let m = compile("**/*.txt").unwrap();
        assert!(m.is_match("a/b.txt"));
        assert!(m.is_match("d/e/f.txt"));
        assert!(!m.is_match("a/c.md"));
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let m = compile("a/*.txt").unwrap();
        assert!(m.is_match("a/b.txt"));
        assert!(!m.is_match("a/x/b.txt"));
    }

    #[test]
    fn test_matches_normalized_form() {
        let m = compile("usr/bin/*").unwrap();
        assert!(m.is_match("./usr/bin/rg"));
        assert!(m.is_match("/usr/bin/rg"));
    }

    #[test]
    fn test_malformed_pattern() {
        let err = compile("[a").unwrap_err();
        assert!(err.is_invalid_pattern());
        assert!(compile_all(&["**/*.txt", "[a"]).is_err());
    }
}
