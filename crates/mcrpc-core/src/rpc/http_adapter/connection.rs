use reqwest::StatusCode;

use crate::config::ConnectionConfig;
use crate::error::RpcError;

pub(super) fn build_http_client(config: &ConnectionConfig) -> Result<reqwest::Client, RpcError> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.timeout())
        .pool_max_idle_per_host(32)
        .tcp_nodelay(true)
        .build()
        .map_err(|e| RpcError::Transport(format!("build HTTP client: {e}")))
}

/// Map a `reqwest` failure onto the transport error kinds.
pub(super) fn classify_reqwest_error(err: reqwest::Error) -> RpcError {
    let message = err.to_string();
    if err.is_timeout() {
        RpcError::Timeout(message)
    } else if err.is_connect() {
        RpcError::ConnectionRefused(message)
    } else {
        RpcError::Transport(message)
    }
}

/// Decide what to do with a response body given its HTTP status.
///
/// MultiChain reports node errors with a JSON-RPC body on HTTP 500, so any
/// body that looks like a JSON-RPC envelope is handed on regardless of
/// status. Other non-success replies never reached the RPC layer.
pub(super) fn check_status(status: StatusCode, body: &[u8]) -> Result<(), RpcError> {
    if status.is_success() || looks_like_jsonrpc(body) {
        return Ok(());
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RpcError::Transport(format!(
            "authentication rejected (HTTP {status}); verify rpc user and password"
        )));
    }
    let snippet: String = String::from_utf8_lossy(body).chars().take(200).collect();
    Err(RpcError::Transport(format!("HTTP {status}: {snippet}")))
}

fn looks_like_jsonrpc(body: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.as_object().map(|o| o.contains_key("error") || o.contains_key("result")))
        .unwrap_or(false)
}
