use serde::Serialize;

use crate::error::RpcError;

/// Outcome of one RPC call.
///
/// After a completed call exactly one of `result` and `error` is set, except
/// for the no-content verbs (`subscribe`, `unsubscribe`) where a successful
/// call leaves both unset. Only trust `result` when `error` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
    /// Correlation id of the request this envelope answers.
    pub id: String,
}

impl<T> RpcResponse<T> {
    pub fn success(id: impl Into<String>, result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
            id: id.into(),
        }
    }

    pub fn no_content(id: impl Into<String>) -> Self {
        Self {
            result: None,
            error: None,
            id: id.into(),
        }
    }

    pub fn failure(id: impl Into<String>, error: RpcError) -> Self {
        Self {
            result: None,
            error: Some(error),
            id: id.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<Option<T>, RpcError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }

    /// Transform a successful payload, keeping the error and id.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RpcResponse<U> {
        RpcResponse {
            result: self.result.map(f),
            error: self.error,
            id: self.id,
        }
    }
}
