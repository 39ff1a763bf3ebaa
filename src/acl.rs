//! ACL text codec.
//!
//! The compact grammar is a comma-separated list of `scheme:id:perms` entries.
//! Identities that contain a colon themselves (`digest:user:hash:perms`) are
//! written with four fields and the middle two are joined back together.
//! Permissions are letters from `cdrwa`; any other letter is ignored.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::{Result, ZkError};

bitflags! {
    /// Permission set of one ACL entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Perms: i32 {
        const READ = 1;
        const WRITE = 1 << 1;
        const CREATE = 1 << 2;
        const DELETE = 1 << 3;
        const ADMIN = 1 << 4;
    }
}

// Display order, highest bit first.
const PERM_LETTERS: [(Perms, char); 5] = [
    (Perms::ADMIN, 'a'),
    (Perms::DELETE, 'd'),
    (Perms::CREATE, 'c'),
    (Perms::WRITE, 'w'),
    (Perms::READ, 'r'),
];

impl Perms {
    /// Parse permission letters. Unknown letters are skipped.
    pub fn from_letters(letters: &str) -> Self {
        letters.chars().fold(Perms::empty(), |perms, c| {
            perms
                | match c {
                    'c' => Perms::CREATE,
                    'd' => Perms::DELETE,
                    'r' => Perms::READ,
                    'w' => Perms::WRITE,
                    'a' => Perms::ADMIN,
                    _ => Perms::empty(),
                }
        })
    }

    /// Render as letters in `adcwr` order.
    pub fn to_letters(self) -> String {
        PERM_LETTERS
            .iter()
            .filter(|(perm, _)| self.contains(*perm))
            .map(|(_, letter)| *letter)
            .collect()
    }
}

/// A single access control entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acl {
    /// Permission set
    pub perms: Perms,
    /// Authentication scheme (`world`, `digest`, `ip`, ...)
    pub scheme: String,
    /// Scheme-specific identity
    pub id: String,
}

impl Acl {
    /// Create an ACL entry.
    pub fn new(scheme: impl Into<String>, id: impl Into<String>, perms: Perms) -> Self {
        Self {
            perms,
            scheme: scheme.into(),
            id: id.into(),
        }
    }

    /// `world:anyone` entry with the given permissions.
    pub fn world(perms: Perms) -> Self {
        Self::new("world", "anyone", perms)
    }
}

impl FromStr for Acl {
    type Err = ZkError;

    fn from_str(entry: &str) -> Result<Self> {
        let fields: Vec<&str> = entry.split(':').collect();
        if fields.len() < 3 || fields.len() > 4 {
            return Err(ZkError::InvalidAcl(entry.to_string()));
        }

        let last = fields.len() - 1;
        Ok(Acl {
            perms: Perms::from_letters(fields[last]),
            scheme: fields[0].to_string(),
            id: fields[1..last].join(":"),
        })
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.scheme, self.id, self.perms.to_letters())
    }
}

/// ACL list granting `perms` to everyone.
pub fn world_acl(perms: Perms) -> Vec<Acl> {
    vec![Acl::world(perms)]
}

/// Parse comma-separated ACL text.
///
/// # Example
/// ```
/// use zktree::acl::{parse_acls, Perms};
///
/// let acls = parse_acls("world:anyone:r,digest:bob:c2VjcmV0:cdrwa").unwrap();
/// assert_eq!(acls[0].perms, Perms::READ);
/// assert_eq!(acls[1].id, "bob:c2VjcmV0");
/// ```
pub fn parse_acls(text: &str) -> Result<Vec<Acl>> {
    text.split(',').map(Acl::from_str).collect()
}

/// Format ACL entries back to text. An empty list formats to "".
pub fn format_acls(acls: &[Acl]) -> String {
    acls.iter()
        .map(Acl::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
