//! Coordination service error codes.

/// Server error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    /// Everything is OK
    Ok = 0,
    /// System and server-side errors
    SystemError = -1,
    /// A runtime inconsistency was found
    RuntimeInconsistency = -2,
    /// A data inconsistency was found
    DataInconsistency = -3,
    /// Connection to the server has been lost
    ConnectionLoss = -4,
    /// Error while marshalling or unmarshalling data
    MarshallingError = -5,
    /// Operation is unimplemented
    Unimplemented = -6,
    /// Operation timeout
    OperationTimeout = -7,
    /// Invalid arguments
    BadArguments = -8,
    /// API errors
    ApiError = -100,
    /// Node does not exist
    NoNode = -101,
    /// Not authenticated
    NoAuth = -102,
    /// Version conflict
    BadVersion = -103,
    /// Ephemeral nodes may not have children
    NoChildrenForEphemerals = -108,
    /// The node already exists
    NodeExists = -110,
    /// The node has children
    NotEmpty = -111,
    /// The session has been expired by the server
    SessionExpired = -112,
    /// Invalid callback specified
    InvalidCallback = -113,
    /// Invalid ACL specified
    InvalidAcl = -114,
    /// Client authentication failed
    AuthFailed = -115,
    /// Session moved to another server
    SessionMoved = -118,
    /// Unknown error
    Unknown = -9999,
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        match code {
            0 => ErrorCode::Ok,
            -1 => ErrorCode::SystemError,
            -2 => ErrorCode::RuntimeInconsistency,
            -3 => ErrorCode::DataInconsistency,
            -4 => ErrorCode::ConnectionLoss,
            -5 => ErrorCode::MarshallingError,
            -6 => ErrorCode::Unimplemented,
            -7 => ErrorCode::OperationTimeout,
            -8 => ErrorCode::BadArguments,
            -100 => ErrorCode::ApiError,
            -101 => ErrorCode::NoNode,
            -102 => ErrorCode::NoAuth,
            -103 => ErrorCode::BadVersion,
            -108 => ErrorCode::NoChildrenForEphemerals,
            -110 => ErrorCode::NodeExists,
            -111 => ErrorCode::NotEmpty,
            -112 => ErrorCode::SessionExpired,
            -113 => ErrorCode::InvalidCallback,
            -114 => ErrorCode::InvalidAcl,
            -115 => ErrorCode::AuthFailed,
            -118 => ErrorCode::SessionMoved,
            _ => ErrorCode::Unknown,
        }
    }
}

impl ErrorCode {
    /// Get human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::Ok => "ok",
            ErrorCode::SystemError => "system error",
            ErrorCode::RuntimeInconsistency => "runtime inconsistency",
            ErrorCode::DataInconsistency => "data inconsistency",
            ErrorCode::ConnectionLoss => "connection loss",
            ErrorCode::MarshallingError => "marshalling error",
            ErrorCode::Unimplemented => "unimplemented",
            ErrorCode::OperationTimeout => "operation timeout",
            ErrorCode::BadArguments => "bad arguments",
            ErrorCode::ApiError => "api error",
            ErrorCode::NoNode => "node does not exist",
            ErrorCode::NoAuth => "not authenticated",
            ErrorCode::BadVersion => "version conflict",
            ErrorCode::NoChildrenForEphemerals => "ephemeral nodes may not have children",
            ErrorCode::NodeExists => "node already exists",
            ErrorCode::NotEmpty => "node has children",
            ErrorCode::SessionExpired => "session has been expired by the server",
            ErrorCode::InvalidCallback => "invalid callback specified",
            ErrorCode::InvalidAcl => "invalid ACL specified",
            ErrorCode::AuthFailed => "client authentication failed",
            ErrorCode::SessionMoved => "session moved to another server",
            ErrorCode::Unknown => "unknown error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_conversion() {
        assert_eq!(ErrorCode::from(0), ErrorCode::Ok);
        assert_eq!(ErrorCode::from(-4), ErrorCode::ConnectionLoss);
        assert_eq!(ErrorCode::from(-8), ErrorCode::BadArguments);
        assert_eq!(ErrorCode::from(-101), ErrorCode::NoNode);
        assert_eq!(ErrorCode::from(-103), ErrorCode::BadVersion);
        assert_eq!(ErrorCode::from(-108), ErrorCode::NoChildrenForEphemerals);
        assert_eq!(ErrorCode::from(-110), ErrorCode::NodeExists);
        assert_eq!(ErrorCode::from(-111), ErrorCode::NotEmpty);
        assert_eq!(ErrorCode::from(-114), ErrorCode::InvalidAcl);
        assert_eq!(ErrorCode::from(-118), ErrorCode::SessionMoved);

        // Gaps in the numbering are unknown
        assert_eq!(ErrorCode::from(-104), ErrorCode::Unknown);
        assert_eq!(ErrorCode::from(-999), ErrorCode::Unknown);
    }

    #[test]
    fn test_discriminants_match_wire_codes() {
        assert_eq!(ErrorCode::NoNode as i32, -101);
        assert_eq!(ErrorCode::NodeExists as i32, -110);
        assert_eq!(ErrorCode::from(ErrorCode::AuthFailed as i32), ErrorCode::AuthFailed);
    }

    #[test]
    fn test_error_code_descriptions() {
        assert_eq!(ErrorCode::NoNode.description(), "node does not exist");
        assert_eq!(ErrorCode::NodeExists.description(), "node already exists");
        assert_eq!(ErrorCode::BadVersion.description(), "version conflict");
        assert_eq!(ErrorCode::Unknown.description(), "unknown error");
    }
}
