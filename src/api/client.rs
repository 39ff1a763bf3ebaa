//! Session client boundary.
//!
//! The wire protocol, connection handling and session keep-alive live behind
//! this trait. Everything in this crate talks to the store through it, one
//! call at a time.

use async_trait::async_trait;

use crate::acl::Acl;
use crate::error::Result;
use crate::tree::{CreateMode, NodeStat};

/// Primitive operations of a connected session.
///
/// Implementations report store failures with the typed [`ZkError`]
/// variants (`NoNode`, `NodeExists`, `BadVersion`, ...), typically through
/// [`ZkError::from_code`].
///
/// [`ZkError`]: crate::error::ZkError
/// [`ZkError::from_code`]: crate::error::ZkError::from_code
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Stat of the node, or `None` if it does not exist.
    async fn exists(&self, path: &str) -> Result<Option<NodeStat>>;

    /// Child names of the node plus the node's own stat.
    async fn children(&self, path: &str) -> Result<(Vec<String>, NodeStat)>;

    /// Data and stat of the node.
    async fn get(&self, path: &str) -> Result<(Vec<u8>, NodeStat)>;

    /// Replace the node's data if its version matches (`-1` matches any).
    async fn set(&self, path: &str, data: &[u8], version: i32) -> Result<NodeStat>;

    /// Create a node and return the path actually created.
    async fn create(&self, path: &str, data: &[u8], mode: CreateMode, acl: &[Acl])
        -> Result<String>;

    /// Delete the node if its version matches (`-1` matches any).
    async fn delete(&self, path: &str, version: i32) -> Result<()>;

    /// ACL and stat of the node.
    async fn get_acl(&self, path: &str) -> Result<(Vec<Acl>, NodeStat)>;

    /// Replace the node's ACL if its ACL version matches.
    async fn set_acl(&self, path: &str, acl: &[Acl], version: i32) -> Result<NodeStat>;

    /// Add authentication credentials to the session.
    async fn add_auth(&self, scheme: &str, auth: &[u8]) -> Result<()>;
}
