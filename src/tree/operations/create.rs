//! Node creation, including multi-level creation.

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use crate::acl::Acl;
use crate::api::SessionClient;
use crate::error::{Result, ZkError};
use crate::path::{parent_path, validate_path};
use crate::session::Session;
use crate::tree::CreateMode;

/// Options for [`Session::create_node`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Creation mode of the target node
    pub mode: CreateMode,
    /// ACL of the target node; the session default when `None`
    pub acl: Option<Vec<Acl>>,
    /// Create missing ancestors instead of failing
    pub force: bool,
}

impl<C: SessionClient> Session<C> {
    /// Create `path`, creating any missing ancestors first.
    ///
    /// Ancestors are created root-to-leaf as persistent nodes with empty data
    /// and the session's default ACL; only the target gets `data`, `mode` and
    /// `acl`. Levels that already exist are skipped, and losing a creation
    /// race to another writer counts as success.
    ///
    /// Returns the path of the target as created by the store (sequential
    /// nodes get a suffix), or `path` itself when it already existed.
    ///
    /// Nothing is rolled back if a call fails part-way.
    pub async fn force_create(
        &self,
        path: &str,
        data: &[u8],
        mode: CreateMode,
        acl: &[Acl],
    ) -> Result<String> {
        validate_path(path, mode.is_sequential())?;
        if path == "/" {
            return Ok(path.to_string());
        }

        // A sequential target never collides; the store appends a fresh suffix
        if !mode.is_sequential() && self.exists(path).await?.is_some() {
            debug!(path, "node already exists");
            return Ok(path.to_string());
        }

        self.ensure_path(parent_path(path).to_string()).await?;

        match self.create(path, data, mode, acl).await {
            Ok(created) => {
                debug!(path = %created, "created node");
                Ok(created)
            }
            Err(ZkError::NodeExists(_)) => {
                debug!(path, "node created concurrently");
                Ok(path.to_string())
            }
            Err(err) => Err(err),
        }
    }

    fn ensure_path(&self, path: String) -> BoxFuture<'_, Result<()>> {
        async move {
            if path == "/" || self.exists(&path).await?.is_some() {
                return Ok(());
            }

            self.ensure_path(parent_path(&path).to_string()).await?;

            match self
                .create(&path, &[], CreateMode::Persistent, self.default_acl())
                .await
            {
                Ok(_) => {
                    debug!(path = %path, "created ancestor");
                    Ok(())
                }
                Err(ZkError::NodeExists(_)) => {
                    debug!(path = %path, "ancestor created concurrently");
                    Ok(())
                }
                Err(err) => Err(err),
            }
        }
        .boxed()
    }

    /// Create a node the way the `create` command does.
    ///
    /// An existing target is always `NodeExists`. Without `force` a missing
    /// parent surfaces as `NoNode`; with it, ancestors are created through
    /// [`Session::force_create`].
    pub async fn create_node(
        &self,
        path: &str,
        data: &[u8],
        options: CreateOptions,
    ) -> Result<String> {
        validate_path(path, options.mode.is_sequential())?;
        let acl = options.acl.as_deref().unwrap_or(self.default_acl());

        if !options.mode.is_sequential() && self.exists(path).await?.is_some() {
            return Err(ZkError::NodeExists(path.to_string()));
        }

        if options.force {
            return self.force_create(path, data, options.mode, acl).await;
        }
        self.create(path, data, options.mode, acl).await
    }
}
