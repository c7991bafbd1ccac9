//! Archive path normalization.

/// Strip leading `./` and `/` and a trailing `/`.
///
/// Archive entries, package databases and callers disagree on whether paths
/// are rooted; lookups compare the normalized forms.
pub(crate) fn normalize_path(path: &str) -> &str {
    let mut path = path;
    loop {
        let trimmed = path.trim_start_matches("./").trim_start_matches('/');
        if trimmed.len() == path.len() {
            break;
        }
        path = trimmed;
    }
    path.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./a/b/"), "a/b");
        assert_eq!(normalize_path("/a"), "a");
        assert_eq!(normalize_path("/usr/bin/rg"), "usr/bin/rg");
        assert_eq!(normalize_path(".//./usr"), "usr");
        assert_eq!(normalize_path("a/b.txt"), "a/b.txt");
        assert_eq!(normalize_path("./"), "");
    }
}
