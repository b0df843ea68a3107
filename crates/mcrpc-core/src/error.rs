use std::fmt;

use serde::Serialize;

/// Failures of a single RPC call.
///
/// These never escape the dispatcher as `Err`; they are carried inside
/// [`RpcResponse::error`](crate::rpc::RpcResponse) so callers inspect one
/// place regardless of where the call failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RpcError {
    #[error("no network configured: {0}")]
    ConfigurationMissing(String),

    /// Rejected before any request was built.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("unexpected response shape: {0}")]
    Deserialization(String),
}

/// Coarse classification of an [`RpcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationMissing,
    InvalidParams,
    TransportFailure,
    Timeout,
    NodeReportedError,
    DeserializationError,
}

impl RpcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            Self::InvalidParams(_) => ErrorKind::InvalidParams,
            Self::ConnectionRefused(_) | Self::Transport(_) => ErrorKind::TransportFailure,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Node { .. } => ErrorKind::NodeReportedError,
            Self::Deserialization(_) => ErrorKind::DeserializationError,
        }
    }

    /// True when no node response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransportFailure | ErrorKind::Timeout)
    }

    /// The node's error code, for node-reported errors only.
    pub fn node_code(&self) -> Option<i64> {
        match self {
            Self::Node { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationMissing => write!(f, "configuration_missing"),
            Self::InvalidParams => write!(f, "invalid_params"),
            Self::TransportFailure => write!(f, "transport_failure"),
            Self::Timeout => write!(f, "timeout"),
            Self::NodeReportedError => write!(f, "node_reported_error"),
            Self::DeserializationError => write!(f, "deserialization_error"),
        }
    }
}

impl Serialize for RpcError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("RpcError", 3)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("code", &self.node_code())?;
        let message = match self {
            Self::Node { message, .. } => message.clone(),
            other => other.to_string(),
        };
        state.serialize_field("message", &message)?;
        state.end()
    }
}

/// Errors raised while building a [`ConnectionConfig`](crate::config::ConnectionConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Errors raised when custom field maps or amounts fail validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("custom field key must not be empty")]
    EmptyKey,

    #[error("duplicate custom field key: {0}")]
    DuplicateKey(String),

    #[error("`{0}` holds a non-finite number")]
    NonFinite(String),
}

impl From<FieldError> for RpcError {
    fn from(err: FieldError) -> Self {
        Self::InvalidParams(err.to_string())
    }
}
