use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

use super::params::Params;

/// One JSON-RPC request as sent to the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: String,
    pub params: Vec<Value>,
    pub chain_name: String,
}

impl RpcRequest {
    /// Build a request, reusing `id` when supplied and generating one otherwise.
    pub fn build(method: &str, params: Params, id: Option<String>, chain_name: &str) -> Self {
        Self {
            jsonrpc: "1.0",
            id: id.unwrap_or_else(new_correlation_id),
            method: method.to_owned(),
            params: params.into_values(),
            chain_name: chain_name.to_owned(),
        }
    }
}

/// A fresh, unique correlation id (32 hex chars).
pub fn new_correlation_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default)]
    pub(super) result: Option<Value>,
    #[serde(default)]
    pub(super) error: Option<Value>,
}

/// Decode the raw body into its `result` / `error` parts.
///
/// A body that is not a JSON-RPC envelope at all is a protocol mismatch and
/// surfaces as [`RpcError::Deserialization`].
pub(super) fn decode_response(body: &[u8]) -> Result<JsonRpcResponse, RpcError> {
    serde_json::from_slice(body).map_err(|e| {
        RpcError::Deserialization(format!(
            "decode JSON-RPC response: {e}; body={}",
            String::from_utf8_lossy(body)
        ))
    })
}

/// Parse a JSON-RPC error value into a structured [`RpcError`].
///
/// Errors shaped as `{"code": <int>, "message": <string>}` are passed through
/// verbatim as [`RpcError::Node`]. Anything else means the node and client
/// disagree about the protocol.
pub(super) fn parse_jsonrpc_error(err: Value) -> RpcError {
    #[derive(Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<JsonRpcError>(err.clone()) {
        Ok(parsed) => RpcError::Node {
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => RpcError::Deserialization(format!("non-standard JSON-RPC error: {err}")),
    }
}
