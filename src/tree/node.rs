//! Node metadata and creation modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Creation mode matching the store's create flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum CreateMode {
    /// Survives the creating session
    #[default]
    Persistent = 0,
    /// Removed when the creating session ends
    Ephemeral = 1,
    /// Persistent, with a store-assigned sequence suffix
    Sequential = 2,
    /// Ephemeral, with a store-assigned sequence suffix
    EphemeralSequential = 3,
}

impl CreateMode {
    /// Build from the two independent flags.
    pub fn from_flags(ephemeral: bool, sequential: bool) -> Self {
        match (ephemeral, sequential) {
            (false, false) => CreateMode::Persistent,
            (true, false) => CreateMode::Ephemeral,
            (false, true) => CreateMode::Sequential,
            (true, true) => CreateMode::EphemeralSequential,
        }
    }

    /// Create from the wire flag value.
    pub fn from_i32(flags: i32) -> Option<Self> {
        match flags {
            0 => Some(CreateMode::Persistent),
            1 => Some(CreateMode::Ephemeral),
            2 => Some(CreateMode::Sequential),
            3 => Some(CreateMode::EphemeralSequential),
            _ => None,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, CreateMode::Ephemeral | CreateMode::EphemeralSequential)
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, CreateMode::Sequential | CreateMode::EphemeralSequential)
    }
}

/// Snapshot of a node's metadata.
///
/// Stats are replaced wholesale on every read; a stat may already be stale
/// when the write that depends on it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeStat {
    /// Transaction id that created the node
    pub czxid: i64,
    /// Transaction id that last modified the node
    pub mzxid: i64,
    /// Transaction id that last modified the children
    pub pzxid: i64,
    /// Creation time (ms since epoch)
    pub ctime: i64,
    /// Last modification time (ms since epoch)
    pub mtime: i64,
    /// Data version
    pub version: i32,
    /// Children version
    pub cversion: i32,
    /// ACL version
    pub aversion: i32,
    /// Owning session id, zero unless ephemeral
    pub ephemeral_owner: i64,
    /// Data length in bytes
    pub data_length: i32,
    /// Number of direct children
    pub num_children: i32,
}

impl NodeStat {
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral_owner != 0
    }
}

impl fmt::Display for NodeStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------")?;
        writeln!(f, "{:<16}{:#x}", "Czxid", self.czxid)?;
        writeln!(f, "{:<16}{:#x}", "Mzxid", self.mzxid)?;
        writeln!(f, "{:<16}{:#x}", "Pzxid", self.pzxid)?;
        writeln!(f, "{:<16}{}", "Ctime", self.ctime)?;
        writeln!(f, "{:<16}{}", "Mtime", self.mtime)?;
        writeln!(f, "{:<16}{}", "DataVersion", self.version)?;
        writeln!(f, "{:<16}{}", "Cversion", self.cversion)?;
        writeln!(f, "{:<16}{}", "AclVersion", self.aversion)?;
        writeln!(f, "{:<16}{:#x}", "EphemeralOwner", self.ephemeral_owner)?;
        writeln!(f, "{:<16}{}", "DataLength", self.data_length)?;
        write!(f, "{:<16}{}", "NumChildren", self.num_children)
    }
}
