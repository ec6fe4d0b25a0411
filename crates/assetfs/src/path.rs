//! Path splitting for slash-joined asset names.
//!
//! No `.`/`..` resolution and no collapsing of repeated separators: asset
//! names are taken literally.

use std::borrow::Cow;

/// Canonical separator.
pub const SEPARATOR: char = '/';

/// Convert backslash separators to `/`, unless the path already contains one.
pub fn sanitize(path: &str) -> Cow<'_, str> {
    if path.contains(SEPARATOR) || !path.contains('\\') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(path.replace('\\', "/"))
    }
}

/// Split a path into its segments, dropping empty trailing segments.
///
/// Interior and leading empty segments are kept; callers skip them.
pub fn segments(path: &str) -> Vec<String> {
    let path = sanitize(path);
    let mut parts: Vec<String> = path.split(SEPARATOR).map(str::to_owned).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Split a path into `(parent, leaf)` at the last separator.
///
/// A path without separator has an empty parent.
pub fn split_parent_leaf(path: &str) -> (String, String) {
    let path = sanitize(path);
    match path.rfind(SEPARATOR) {
        Some(idx) => (path[..idx].to_owned(), path[idx + 1..].to_owned()),
        None => (String::new(), path.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a/b.txt"), "a/b.txt");
        assert_eq!(sanitize("a\\b\\c.txt"), "a/b/c.txt");
        // Mixed input is left alone once a forward slash is present.
        assert_eq!(sanitize("a/b\\c.txt"), "a/b\\c.txt");
        assert!(matches!(sanitize("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_segments_trims_trailing() {
        assert_eq!(segments("a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(segments("a/b//"), vec!["a", "b"]);
        assert_eq!(segments("a\\b\\"), vec!["a", "b"]);
        assert!(segments("").is_empty());
        assert!(segments("///").is_empty());
    }

    #[test]
    fn test_segments_keeps_interior_empties() {
        assert_eq!(segments("/a//b"), vec!["", "a", "", "b"]);
    }

    #[test]
    fn test_split_parent_leaf() {
        assert_eq!(split_parent_leaf("b.txt"), ("".into(), "b.txt".into()));
        assert_eq!(split_parent_leaf("a/c/d.txt"), ("a/c".into(), "d.txt".into()));
        assert_eq!(split_parent_leaf("a/c/"), ("a/c".into(), "".into()));
        assert_eq!(split_parent_leaf("a\\b.txt"), ("a".into(), "b.txt".into()));
        assert_eq!(split_parent_leaf(""), ("".into(), "".into()));
    }
}
