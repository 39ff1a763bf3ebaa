//! # zktree
//!
//! Tree operations for ZooKeeper-style coordination services.
//!
//! ## Features
//!
//! - **Path validation**: the store's own syntax rules, checked before any
//!   request is sent.
//! - **ACL text**: parse and format `scheme:id:perms` lists.
//! - **Recursive operations**:
//!   - Create a node together with its missing ancestors (`force_create`).
//!   - Delete a whole subtree, leaves first (`force_delete`).
//!   - List every leaf below a node (`list_leaves`).
//! - **Version guards**: conditional writes against the observed version or an
//!   explicit override.
//!
//! The crate does not speak the wire protocol itself. Connect with any client
//! implementing [`SessionClient`] and wrap it in a [`Session`]. The in-process
//! [`MemoryClient`] implements the same rules as the real store.
//!
//! Operations tolerate a tree that other clients change at the same time: lost
//! creation races count as success, nodes that disappear mid-delete are
//! skipped, and a node that gains children while being deleted is kept.
//! Nothing is rolled back when a call fails part-way.
//!
//! ## Example
//!
//! ```
//! use zktree::{CreateMode, MemoryClient, Session};
//!
//! # async fn example() -> zktree::Result<()> {
//! let session = Session::new(MemoryClient::new());
//!
//! // Creates /app and /app/workers first
//! session
//!     .force_create("/app/workers/w1", b"ready", CreateMode::Ephemeral, session.default_acl())
//!     .await?;
//! assert_eq!(session.list_leaves("/app").await?, vec!["/app/workers/w1"]);
//!
//! session.force_delete("/app").await?;
//! assert!(session.exists("/app").await?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod acl;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod path;
pub mod session;
pub mod tree;
pub mod version;

// Re-export commonly used types
pub use acl::{Acl, Perms};
pub use api::{ErrorCode, MemoryClient, SessionClient};
pub use config::Config;
pub use error::{Result, ZkError};
pub use session::Session;
pub use tree::{
    ChildEntry, CreateMode, CreateOptions, DeleteOptions, NodeStat, SetOptions, SetOutcome,
};
