//! Session state and primitive request routing.
//!
//! Every primitive call made by the tree operations goes through one helper
//! that applies the optional per-call deadline and traces the request. Paths
//! are validated before a request is sent. Calls
//! are awaited one at a time; nothing here retries.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, trace};

use crate::acl::{world_acl, Acl, Perms};
use crate::api::SessionClient;
use crate::config::Config;
use crate::error::{Result, ZkError};
use crate::path::validate_path;
use crate::tree::{CreateMode, NodeStat};

/// Digest scheme used for configured credentials.
const AUTH_SCHEME: &str = "digest";

/// A connected session plus the defaults applied to tree operations.
pub struct Session<C> {
    client: C,
    default_acl: Vec<Acl>,
    op_timeout: Option<Duration>,
}

impl<C: SessionClient> Session<C> {
    /// Wrap a client with default settings: `world:anyone:cdrwa` for new
    /// nodes and no per-call deadline.
    pub fn new(client: C) -> Self {
        Self {
            client,
            default_acl: world_acl(Perms::all()),
            op_timeout: None,
        }
    }

    /// Wrap a client using `config`, sending its digest credentials.
    ///
    /// # Example
    /// ```
    /// use zktree::{Config, MemoryClient, Session};
    ///
    /// # async fn example() -> zktree::Result<()> {
    /// let config = Config::from_json(r#"{"acl": ["admin:secret"], "op_timeout_ms": 5000}"#)?;
    /// let session = Session::with_config(MemoryClient::new(), &config).await?;
    /// session.force_create("/app/config", b"v1", Default::default(), session.default_acl()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_config(client: C, config: &Config) -> Result<Self> {
        config.validate()?;

        let session = Self {
            client,
            default_acl: config.default_acl()?,
            op_timeout: config.op_timeout(),
        };

        for credential in &config.acl {
            session
                .call(
                    "add_auth",
                    AUTH_SCHEME,
                    session.client.add_auth(AUTH_SCHEME, credential.as_bytes()),
                )
                .await?;
        }
        debug!(
            credentials = config.acl.len(),
            op_timeout_ms = ?config.op_timeout_ms,
            "session configured"
        );

        Ok(session)
    }

    /// Underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// ACL given to nodes created without an explicit one.
    pub fn default_acl(&self) -> &[Acl] {
        &self.default_acl
    }

    pub fn set_default_acl(&mut self, acl: Vec<Acl>) {
        self.default_acl = acl;
    }

    /// Deadline applied to each primitive call; `None` waits indefinitely.
    pub fn set_op_timeout(&mut self, limit: Option<Duration>) {
        self.op_timeout = limit;
    }

    async fn call<T, F>(&self, op: &'static str, path: &str, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        trace!(op, path, "request");

        let result = match self.op_timeout {
            Some(limit) => match timeout(limit, request).await {
                Ok(result) => result,
                Err(_) => Err(ZkError::Timeout {
                    op,
                    path: path.to_string(),
                }),
            },
            None => request.await,
        };

        if let Err(err) = &result {
            debug!(op, path, error = %err, "request failed");
        }
        result
    }

    /// Stat of the node, or `None` if it does not exist.
    pub async fn exists(&self, path: &str) -> Result<Option<NodeStat>> {
        validate_path(path, false)?;
        self.call("exists", path, self.client.exists(path)).await
    }

    /// Child names plus the node's own stat.
    pub async fn children(&self, path: &str) -> Result<(Vec<String>, NodeStat)> {
        validate_path(path, false)?;
        self.call("children", path, self.client.children(path)).await
    }

    /// Node data and stat.
    pub async fn get(&self, path: &str) -> Result<(Vec<u8>, NodeStat)> {
        validate_path(path, false)?;
        self.call("get", path, self.client.get(path)).await
    }

    /// Conditional data write.
    pub async fn set(&self, path: &str, data: &[u8], version: i32) -> Result<NodeStat> {
        validate_path(path, false)?;
        self.call("set", path, self.client.set(path, data, version))
            .await
    }

    /// Bare create: a missing parent or an existing node is an error.
    pub async fn create(
        &self,
        path: &str,
        data: &[u8],
        mode: CreateMode,
        acl: &[Acl],
    ) -> Result<String> {
        validate_path(path, mode.is_sequential())?;
        self.call("create", path, self.client.create(path, data, mode, acl))
            .await
    }

    /// Conditional delete of a childless node.
    pub async fn delete(&self, path: &str, version: i32) -> Result<()> {
        validate_path(path, false)?;
        self.call("delete", path, self.client.delete(path, version))
            .await
    }

    /// Node ACL and stat.
    pub async fn get_acl(&self, path: &str) -> Result<(Vec<Acl>, NodeStat)> {
        validate_path(path, false)?;
        self.call("get_acl", path, self.client.get_acl(path)).await
    }

    /// Conditional ACL write.
    pub async fn set_acl(&self, path: &str, acl: &[Acl], version: i32) -> Result<NodeStat> {
        validate_path(path, false)?;
        self.call("set_acl", path, self.client.set_acl(path, acl, version))
            .await
    }
}
