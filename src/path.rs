//! Node path syntax checks and helpers.
//!
//! Paths are absolute, `/`-separated, and never end in `/` except for the
//! root itself (or the prefix of a sequential node, where the store appends
//! the suffix).

use crate::error::{Result, ZkError};

/// Validate a path before sending it to the store.
///
/// # Arguments
/// * `path` - Absolute node path
/// * `sequential` - Allow a trailing `/` (the store appends a sequence suffix)
///
/// # Example
/// ```
/// use zktree::path::validate_path;
///
/// assert!(validate_path("/app/config", false).is_ok());
/// assert!(validate_path("/app//config", false).is_err());
/// assert!(validate_path("/app/queue/", true).is_ok());
/// ```
pub fn validate_path(path: &str, sequential: bool) -> Result<()> {
    let invalid = || Err(ZkError::InvalidPath(path.to_string()));

    if path.is_empty() || !path.starts_with('/') {
        return invalid();
    }

    // Scan by code point, not by byte
    let chars: Vec<char> = path.chars().collect();
    if chars.len() == 1 {
        return Ok(());
    }

    if !sequential && path.ends_with('/') {
        return invalid();
    }

    for i in 1..chars.len() {
        let c = chars[i];
        match c {
            '\u{0}' => return invalid(),
            '/' => {
                if chars[i - 1] == '/' {
                    return invalid();
                }
            }
            '.' => {
                // Look through a second dot so both "." and ".." segments are caught
                let mut last = chars[i - 1];
                if last == '.' {
                    last = chars[i - 2];
                }
                if last == '/' && chars.get(i + 1).map_or(true, |next| *next == '/') {
                    return invalid();
                }
            }
            c if is_forbidden(c) => return invalid(),
            _ => {}
        }
    }

    Ok(())
}

fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' | '\u{f000}'..='\u{f8ff}' | '\u{fff0}'..='\u{fffe}'
    )
}

/// Join a child name onto its parent path.
pub fn join_child(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Parent of a path; the root is its own parent.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(path: &str) -> bool {
        matches!(validate_path(path, false), Err(ZkError::InvalidPath(_)))
    }

    #[test]
    fn test_accepts_well_formed_paths() {
        for path in [
            "/",
            "/a",
            "/a/b/c",
            "/zookeeper/quota",
            "/a.b",
            "/a/.b",
            "/a/..b",
            "/a/b.",
            "/a/...",
            "/é/日本語",
            "/with space",
        ] {
            assert!(validate_path(path, false).is_ok(), "{path:?} should be valid");
        }
    }

    #[test]
    fn test_rejects_missing_root() {
        assert!(rejected(""));
        assert!(rejected("a"));
        assert!(rejected("a/b"));
        assert!(rejected("."));
    }

    #[test]
    fn test_trailing_slash_only_for_sequential() {
        assert!(rejected("/a/"));
        assert!(rejected("/a/b/"));
        assert!(validate_path("/a/", true).is_ok());
        assert!(validate_path("/a/b/", true).is_ok());
        assert!(validate_path("/", true).is_ok());
    }

    #[test]
    fn test_rejects_doubled_slash() {
        assert!(rejected("//"));
        assert!(rejected("//a"));
        assert!(rejected("/a//b"));
        assert!(validate_path("/a//", true).is_err());
    }

    #[test]
    fn test_rejects_dot_segments() {
        assert!(rejected("/."));
        assert!(rejected("/.."));
        assert!(rejected("/a/."));
        assert!(rejected("/a/.."));
        assert!(rejected("/a/./b"));
        assert!(rejected("/a/../b"));
        assert!(rejected("/./a"));
        assert!(rejected("/../a"));
    }

    #[test]
    fn test_rejects_nul_and_control_points() {
        assert!(rejected("/a\u{0}b"));
        assert!(rejected("/a\u{1}"));
        assert!(rejected("/a\u{1f}"));
        assert!(rejected("/a\u{7f}"));
        assert!(rejected("/a\u{85}"));
        assert!(rejected("/a\u{9f}"));
        assert!(rejected("/\n"));
    }

    #[test]
    fn test_rejects_special_ranges() {
        assert!(rejected("/a\u{f000}"));
        assert!(rejected("/a\u{f8ff}"));
        assert!(rejected("/a\u{fff0}"));
        assert!(rejected("/a\u{fffe}"));
        assert!(validate_path("/a\u{efff}", false).is_ok());
        assert!(validate_path("/a\u{f900}", false).is_ok());
        assert!(validate_path("/a\u{ffff}", false).is_ok());
        assert!(validate_path("/a\u{a0}", false).is_ok());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let samples = ["/", "/a/b", "/a//b", "/a/./b", "/a\u{0}", "", "x", "/a/"];
        for path in samples {
            for sequential in [false, true] {
                let first = validate_path(path, sequential).is_ok();
                for _ in 0..8 {
                    assert_eq!(validate_path(path, sequential).is_ok(), first);
                }
            }
        }
    }

    #[test]
    fn test_join_and_parent() {
        assert_eq!(join_child("/", "a"), "/a");
        assert_eq!(join_child("/a", "b"), "/a/b");
        assert_eq!(parent_path("/a/b/c"), "/a/b");
        assert_eq!(parent_path("/a"), "/");
        assert_eq!(parent_path("/"), "/");
        assert_eq!(parent_path("/a/"), "/a");
    }
}
