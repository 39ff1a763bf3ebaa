//! Data and ACL updates.

use tracing::debug;

use crate::acl::{format_acls, parse_acls};
use crate::api::SessionClient;
use crate::error::{Result, ZkError};
use crate::path::validate_path;
use crate::session::Session;
use crate::tree::{CreateMode, NodeStat};
use crate::version::VersionGuard;

/// Options for [`Session::set_data`].
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Version override; the observed data version when `None`
    pub version: Option<String>,
    /// Create the node if it is missing (its parent must exist)
    pub create: bool,
    /// Create the node and any missing ancestors if it is missing
    pub force: bool,
}

/// What [`Session::set_data`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// Existing node updated
    Updated(NodeStat),
    /// Node was missing and got created at this path
    Created(String),
}

impl<C: SessionClient> Session<C> {
    /// Write `data` to `path`.
    ///
    /// An existing node gets a conditional set against its observed data
    /// version, or the override in `options.version`. A missing node is
    /// created when `force` or `create` is set and is `NoNode` otherwise.
    pub async fn set_data(&self, path: &str, data: &[u8], options: SetOptions) -> Result<SetOutcome> {
        let guard = VersionGuard::parse(options.version.as_deref())?;
        validate_path(path, false)?;

        if let Some(stat) = self.exists(path).await? {
            let stat = self.set(path, data, guard.resolve(stat.version)).await?;
            debug!(path, version = stat.version, "updated data");
            return Ok(SetOutcome::Updated(stat));
        }

        let created = if options.force {
            self.force_create(path, data, CreateMode::Persistent, self.default_acl())
                .await?
        } else if options.create {
            self.create(path, data, CreateMode::Persistent, self.default_acl())
                .await?
        } else {
            return Err(ZkError::NoNode(path.to_string()));
        };
        Ok(SetOutcome::Created(created))
    }

    /// ACL of `path` in text form, plus its stat.
    pub async fn get_acl_text(&self, path: &str) -> Result<(String, NodeStat)> {
        validate_path(path, false)?;
        let (acl, stat) = self.get_acl(path).await?;
        Ok((format_acls(&acl), stat))
    }

    /// Replace the ACL of `path` with the one described by `acl_text`.
    ///
    /// Both the ACL text and the version override are checked before
    /// anything is sent. The write is conditional on the observed ACL
    /// version unless an override is given.
    pub async fn update_acl(
        &self,
        path: &str,
        acl_text: &str,
        version: Option<&str>,
    ) -> Result<NodeStat> {
        let acl = parse_acls(acl_text)?;
        let guard = VersionGuard::parse(version)?;
        validate_path(path, false)?;

        let stat = self
            .exists(path)
            .await?
            .ok_or_else(|| ZkError::NoNode(path.to_string()))?;

        let stat = self.set_acl(path, &acl, guard.resolve(stat.aversion)).await?;
        debug!(path, aversion = stat.aversion, "updated acl");
        Ok(stat)
    }
}
