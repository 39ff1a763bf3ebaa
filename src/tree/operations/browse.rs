//! Listing and tree walking.

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use crate::api::SessionClient;
use crate::error::{Result, ZkError};
use crate::path::{join_child, validate_path};
use crate::session::Session;

/// A direct child and its own child count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// Full path of the child
    pub path: String,
    /// Number of children under it
    pub num_children: i32,
}

impl<C: SessionClient> Session<C> {
    /// List the direct children of `path`, sorted by name.
    pub async fn list(&self, path: &str) -> Result<Vec<ChildEntry>> {
        validate_path(path, false)?;

        let (mut names, _) = self.children(path).await?;
        names.sort();

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let child = join_child(path, &name);
            let (_, stat) = self.children(&child).await?;
            entries.push(ChildEntry {
                path: child,
                num_children: stat.num_children,
            });
        }

        Ok(entries)
    }

    /// Every leaf (childless node) at or below `path`, sorted by full path.
    ///
    /// Any failure aborts the walk; there are no partial results.
    ///
    /// # Example
    /// ```
    /// use zktree::{MemoryClient, Session};
    ///
    /// # async fn example() -> zktree::Result<()> {
    /// let client = MemoryClient::new();
    /// client.seed("/app/a/x", b"")?;
    /// client.seed("/app/b", b"")?;
    ///
    /// let session = Session::new(client);
    /// assert_eq!(session.list_leaves("/app").await?, vec!["/app/a/x", "/app/b"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_leaves(&self, path: &str) -> Result<Vec<String>> {
        validate_path(path, false)?;
        if self.exists(path).await?.is_none() {
            return Err(ZkError::NoNode(path.to_string()));
        }

        let mut leaves = self.collect_leaves(path.to_string()).await?;
        leaves.sort();
        debug!(path, leaves = leaves.len(), "walked tree");
        Ok(leaves)
    }

    fn collect_leaves(&self, path: String) -> BoxFuture<'_, Result<Vec<String>>> {
        async move {
            let (children, _) = self.children(&path).await?;
            if children.is_empty() {
                return Ok(vec![path]);
            }

            let mut leaves = Vec::new();
            for name in children {
                leaves.extend(self.collect_leaves(join_child(&path, &name)).await?);
            }
            Ok(leaves)
        }
        .boxed()
    }
}
