//! Error types for the zktree library.

use std::num::ParseIntError;

use thiserror::Error;

use crate::api::ErrorCode;

/// Main error type for zktree operations.
#[derive(Error, Debug)]
pub enum ZkError {
    /// Path failed local syntax validation.
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// ACL text could not be parsed, or the store rejected the ACL.
    #[error("Invalid ACL: {0:?}")]
    InvalidAcl(String),

    /// Version override is not a base-10 integer.
    #[error("Invalid version {value:?}: {source}")]
    InvalidVersion {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Node does not exist.
    #[error("Node does not exist: {0}")]
    NoNode(String),

    /// Node already exists.
    #[error("Node already exists: {0}")]
    NodeExists(String),

    /// Conditional write lost against a newer version.
    #[error("Version conflict: {0}")]
    BadVersion(String),

    /// Node still has children.
    #[error("Node has children: {0}")]
    NotEmpty(String),

    /// Ephemeral nodes may not have children.
    #[error("Ephemeral nodes may not have children: {0}")]
    NoChildrenForEphemerals(String),

    /// Session lacks permission for the node.
    #[error("Not authorized: {0}")]
    NoAuth(String),

    /// Connection to the ensemble was lost.
    #[error("Connection failure: {0}")]
    Connection(String),

    /// Session expired on the server.
    #[error("Session expired")]
    SessionExpired,

    /// Primitive call exceeded its deadline.
    #[error("{op} timed out: {path}")]
    Timeout { op: &'static str, path: String },

    /// Any other server error code.
    #[error("Server error: {code} - {message}")]
    Server { code: i32, message: String },

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ZkError {
    /// Map a server error code onto the typed variant for `path`.
    pub fn from_code(code: ErrorCode, path: &str) -> Self {
        let path = path.to_string();
        match code {
            ErrorCode::NoNode => ZkError::NoNode(path),
            ErrorCode::NodeExists => ZkError::NodeExists(path),
            ErrorCode::BadVersion => ZkError::BadVersion(path),
            ErrorCode::NotEmpty => ZkError::NotEmpty(path),
            ErrorCode::NoChildrenForEphemerals => ZkError::NoChildrenForEphemerals(path),
            ErrorCode::NoAuth | ErrorCode::AuthFailed => ZkError::NoAuth(path),
            ErrorCode::InvalidAcl => ZkError::InvalidAcl(path),
            ErrorCode::ConnectionLoss | ErrorCode::SessionMoved => {
                ZkError::Connection(code.description().to_string())
            }
            ErrorCode::SessionExpired => ZkError::SessionExpired,
            ErrorCode::OperationTimeout => ZkError::Timeout {
                op: "request",
                path,
            },
            other => ZkError::Server {
                code: other as i32,
                message: other.description().to_string(),
            },
        }
    }

    /// Server error code carried by this error, if it originated remotely.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ZkError::NoNode(_) => Some(ErrorCode::NoNode),
            ZkError::NodeExists(_) => Some(ErrorCode::NodeExists),
            ZkError::BadVersion(_) => Some(ErrorCode::BadVersion),
            ZkError::NotEmpty(_) => Some(ErrorCode::NotEmpty),
            ZkError::NoChildrenForEphemerals(_) => Some(ErrorCode::NoChildrenForEphemerals),
            ZkError::NoAuth(_) => Some(ErrorCode::NoAuth),
            ZkError::InvalidAcl(_) => Some(ErrorCode::InvalidAcl),
            ZkError::Connection(_) => Some(ErrorCode::ConnectionLoss),
            ZkError::SessionExpired => Some(ErrorCode::SessionExpired),
            ZkError::Timeout { .. } => Some(ErrorCode::OperationTimeout),
            ZkError::Server { code, .. } => Some(ErrorCode::from(*code)),
            _ => None,
        }
    }

    /// True for errors caused by the transport rather than the tree.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            ZkError::Connection(_) | ZkError::SessionExpired | ZkError::Timeout { .. }
        )
    }
}

/// Result type alias for zktree operations.
pub type Result<T> = std::result::Result<T, ZkError>;
