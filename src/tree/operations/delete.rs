//! Node deletion, including whole subtrees.

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};

use crate::api::SessionClient;
use crate::error::{Result, ZkError};
use crate::path::{join_child, validate_path};
use crate::session::Session;
use crate::version::VersionGuard;

/// Options for [`Session::delete_node`].
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Version override; the observed data version when `None`
    pub version: Option<String>,
    /// Delete the whole subtree
    pub force: bool,
}

impl<C: SessionClient> Session<C> {
    /// Delete `path` and everything below it, children before parents.
    ///
    /// Every delete is conditional on the version read just before it.
    /// Children that disappear while the walk is running are skipped. A node
    /// that gained new children during the walk is left in place and the call
    /// still succeeds.
    ///
    /// The root can never be deleted. Nothing is restored if a call fails
    /// part-way.
    pub async fn force_delete(&self, path: &str) -> Result<()> {
        validate_path(path, false)?;
        if path == "/" {
            return Err(ZkError::InvalidPath(path.to_string()));
        }

        self.delete_tree(path.to_string()).await
    }

    fn delete_tree(&self, path: String) -> BoxFuture<'_, Result<()>> {
        async move {
            let (children, stat) = self.children(&path).await?;
            if children.is_empty() {
                self.delete(&path, stat.version).await?;
                debug!(path = %path, "deleted node");
                return Ok(());
            }

            for name in children {
                let child = join_child(&path, &name);
                match self.delete_tree(child.clone()).await {
                    Ok(()) => {}
                    Err(ZkError::NoNode(gone)) if gone == child => {
                        debug!(path = %child, "already deleted");
                        continue;
                    }
                    Err(err) => return Err(err),
                }

                if self.exists(&child).await?.is_none() {
                    continue;
                }
                if self.delete_if_present(&child, stat.version).await? {
                    debug!(path = %child, "deleted retained child");
                }
            }

            match self.exists(&path).await? {
                None => {
                    debug!(path = %path, "deleted concurrently");
                    Ok(())
                }
                Some(current) if current.num_children == 0 => {
                    if self.delete_if_present(&path, current.version).await? {
                        debug!(path = %path, "deleted node");
                    }
                    Ok(())
                }
                Some(current) => {
                    warn!(
                        path = %path,
                        children = current.num_children,
                        "new children appeared, node kept"
                    );
                    Ok(())
                }
            }
        }
        .boxed()
    }

    /// Conditional delete that treats a node removed by someone else as done.
    /// Returns whether this call removed it.
    async fn delete_if_present(&self, path: &str, version: i32) -> Result<bool> {
        match self.delete(path, version).await {
            Ok(()) => Ok(true),
            Err(ZkError::NoNode(gone)) if gone == path => {
                debug!(path, "deleted concurrently");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Delete a node the way the `delete` command does.
    ///
    /// The version override is checked before anything is sent. A missing
    /// node is `NoNode`. With `force` the whole subtree goes through
    /// [`Session::force_delete`]; otherwise a single conditional delete is
    /// issued and a node with children is refused by the store.
    pub async fn delete_node(&self, path: &str, options: DeleteOptions) -> Result<()> {
        let guard = VersionGuard::parse(options.version.as_deref())?;
        validate_path(path, false)?;

        let stat = self
            .exists(path)
            .await?
            .ok_or_else(|| ZkError::NoNode(path.to_string()))?;

        if options.force {
            return self.force_delete(path).await;
        }
        self.delete(path, guard.resolve(stat.version)).await
    }
}
