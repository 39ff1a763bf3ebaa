//! Version selection for conditional writes.

use crate::error::{Result, ZkError};

/// Version to pass to a conditional write.
///
/// Parsed once, before any remote call, then resolved against the version
/// observed on the node right before the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionGuard {
    pinned: Option<i32>,
}

impl VersionGuard {
    /// Parse an optional user-supplied override.
    pub fn parse(version: Option<&str>) -> Result<Self> {
        let pinned = version
            .map(|raw| {
                raw.parse::<i32>().map_err(|source| ZkError::InvalidVersion {
                    value: raw.to_string(),
                    source,
                })
            })
            .transpose()?;
        Ok(Self { pinned })
    }

    /// The override if one was given, otherwise `observed`.
    pub fn resolve(&self, observed: i32) -> i32 {
        self.pinned.unwrap_or(observed)
    }
}

/// Effective version for a conditional write.
///
/// # Example
/// ```
/// use zktree::version::effective_version;
///
/// assert_eq!(effective_version(5, None).unwrap(), 5);
/// assert_eq!(effective_version(5, Some("7")).unwrap(), 7);
/// assert!(effective_version(5, Some("abc")).is_err());
/// ```
pub fn effective_version(observed: i32, version: Option<&str>) -> Result<i32> {
    VersionGuard::parse(version).map(|guard| guard.resolve(observed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_without_override() {
        assert_eq!(effective_version(5, None).unwrap(), 5);
        assert_eq!(effective_version(-1, None).unwrap(), -1);
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(effective_version(5, Some("7")).unwrap(), 7);
        assert_eq!(effective_version(5, Some("-1")).unwrap(), -1);
        assert_eq!(effective_version(5, Some("0")).unwrap(), 0);
    }

    #[test]
    fn test_bad_override_keeps_parse_error() {
        match effective_version(5, Some("abc")) {
            Err(ZkError::InvalidVersion { value, source }) => {
                assert_eq!(value, "abc");
                assert_eq!(source, "abc".parse::<i32>().unwrap_err());
            }
            other => panic!("expected InvalidVersion, got {other:?}"),
        }
        assert!(effective_version(5, Some("")).is_err());
        assert!(effective_version(5, Some(" 7")).is_err());
        assert!(effective_version(5, Some("2147483648")).is_err());
    }

    #[test]
    fn test_guard_resolves_later() {
        let guard = VersionGuard::parse(Some("3")).unwrap();
        assert_eq!(guard.resolve(10), 3);
        let guard = VersionGuard::parse(None).unwrap();
        assert_eq!(guard.resolve(10), 10);
        assert_eq!(VersionGuard::default(), guard);
    }
}
