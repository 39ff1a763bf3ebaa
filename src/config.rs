//! Session configuration.
//!
//! Loading and saving the configuration file is left to the caller; this type
//! only describes the values and how they are checked and overridden.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::acl::{parse_acls, world_acl, Acl, Perms};
use crate::error::{Result, ZkError};

/// Server address used when none is configured.
pub const DEFAULT_SERVER: &str = "127.0.0.1:2181";

/// Comma-separated server list override.
pub const ENV_SERVER: &str = "ZKTREE_SERVER";

/// Comma-separated `user:password` credentials override.
pub const ENV_ACL: &str = "ZKTREE_ACL";

/// Settings for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ensemble addresses (`host:port`)
    pub server: Vec<String>,
    /// Digest credentials (`user:password`) added to the session
    pub acl: Vec<String>,
    /// Verbose logging
    pub verbose: bool,
    /// Session timeout requested from the ensemble
    pub session_timeout_ms: u64,
    /// Deadline for each primitive call
    pub op_timeout_ms: Option<u64>,
    /// ACL text for nodes created without an explicit ACL
    pub default_acl: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: vec![DEFAULT_SERVER.to_string()],
            acl: Vec::new(),
            verbose: false,
            session_timeout_ms: 10_000,
            op_timeout_ms: None,
            default_acl: None,
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `ZKTREE_SERVER` and `ZKTREE_ACL` from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(server) = lookup(ENV_SERVER).map(|v| split_list(&v)) {
            if !server.is_empty() {
                self.server = server;
            }
        }
        if let Some(acl) = lookup(ENV_ACL).map(|v| split_list(&v)) {
            if !acl.is_empty() {
                self.acl = acl;
            }
        }
        self
    }

    /// Check every field that can be checked without a connection.
    pub fn validate(&self) -> Result<()> {
        if self.server.is_empty() {
            return Err(ZkError::Config("no server configured".to_string()));
        }
        if let Some(bad) = self.acl.iter().find(|cred| !cred.contains(':')) {
            return Err(ZkError::Config(format!(
                "invalid credential {:?}, expected \"user:password\"",
                bad
            )));
        }
        self.default_acl()?;
        Ok(())
    }

    /// Parsed default ACL, `world:anyone:cdrwa` when unset.
    pub fn default_acl(&self) -> Result<Vec<Acl>> {
        match &self.default_acl {
            Some(text) => parse_acls(text),
            None => Ok(world_acl(Perms::all())),
        }
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }

    pub fn op_timeout(&self) -> Option<Duration> {
        self.op_timeout_ms.map(Duration::from_millis)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server, vec![DEFAULT_SERVER.to_string()]);
        assert_eq!(config.session_timeout(), Duration::from_secs(10));
        assert_eq!(config.op_timeout(), None);
        assert_eq!(config.default_acl().unwrap(), world_acl(Perms::all()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = Config::from_json(
            r#"{"server": ["zk1:2181", "zk2:2181"], "op_timeout_ms": 250, "default_acl": "world:anyone:r"}"#,
        )
        .unwrap();
        assert_eq!(config.server.len(), 2);
        assert_eq!(config.op_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.session_timeout_ms, 10_000);
        assert_eq!(config.default_acl().unwrap()[0].perms, Perms::READ);

        assert!(matches!(Config::from_json("{"), Err(ZkError::Json(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            server: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ZkError::Config(_))));

        let config = Config {
            acl: vec!["user:pw".to_string(), "nopassword".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ZkError::Config(_))));

        let config = Config {
            default_acl: Some("world:anyone".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ZkError::InvalidAcl(_))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            ENV_SERVER => Some("zk1:2181, zk2:2181,".to_string()),
            ENV_ACL => Some("a:b".to_string()),
            _ => None,
        });
        assert_eq!(config.server, vec!["zk1:2181", "zk2:2181"]);
        assert_eq!(config.acl, vec!["a:b"]);

        let config = Config::default().with_overrides(|_| Some(" , ".to_string()));
        assert_eq!(config, Config::default());
    }
}
