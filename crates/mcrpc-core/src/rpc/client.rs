use std::sync::Arc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::error::RpcError;

use super::envelope::RpcResponse;
use super::http_adapter::HttpTransport;
use super::params::Params;
use super::protocol::{decode_response, new_correlation_id, parse_jsonrpc_error, RpcRequest};
use super::Transport;

/// Verbs that answer a successful call with a `null` result.
///
/// For these, a null result yields an envelope with neither result nor error.
/// Every other verb deserializes its result into the caller's type, so a
/// null there is either a valid `Option`/`Value` or a shape mismatch.
pub const NO_CONTENT_METHODS: &[&str] = &["subscribe", "unsubscribe"];

/// Explicit addressing for one call: target network and correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    pub network: String,
    pub id: String,
}

impl CallTarget {
    pub fn new(network: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            id: id.into(),
        }
    }

    /// Target `network` with a freshly generated correlation id.
    pub fn network(network: impl Into<String>) -> Self {
        Self::new(network, new_correlation_id())
    }
}

/// The dispatcher: resolves the network, builds the request, sends it and
/// turns the reply into an [`RpcResponse`].
///
/// Holds no per-call state, so one client can serve concurrent callers.
/// Every failure, including missing configuration, is returned inside the
/// envelope rather than as `Err`.
pub struct RpcClient<T = HttpTransport> {
    config: Arc<ConnectionConfig>,
    transport: T,
}

impl RpcClient<HttpTransport> {
    /// Create a client backed by the HTTP transport.
    pub fn new(config: Arc<ConnectionConfig>) -> Result<Self, RpcError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> RpcClient<T> {
    pub fn with_transport(config: Arc<ConnectionConfig>, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Inferred call: configured default network, generated correlation id.
    pub async fn call<R: DeserializeOwned>(&self, method: &str, params: Params) -> RpcResponse<R> {
        self.dispatch(None, method, params).await
    }

    /// Explicit call: caller-supplied network and correlation id.
    pub async fn call_on<R: DeserializeOwned>(
        &self,
        network: impl Into<String>,
        id: impl Into<String>,
        method: &str,
        params: Params,
    ) -> RpcResponse<R> {
        self.dispatch(Some(CallTarget::new(network, id)), method, params)
            .await
    }

    /// Issue the same call against several networks concurrently.
    ///
    /// Envelopes come back in the order of `networks`, each with its own
    /// correlation id.
    pub async fn call_networks<R: DeserializeOwned>(
        &self,
        networks: &[&str],
        method: &str,
        params: Params,
    ) -> Vec<RpcResponse<R>> {
        let calls = networks.iter().map(|network| {
            self.dispatch(Some(CallTarget::network(*network)), method, params.clone())
        });
        join_all(calls).await
    }

    /// Single entry point shared by both calling conventions.
    pub async fn dispatch<R: DeserializeOwned>(
        &self,
        target: Option<CallTarget>,
        method: &str,
        params: Params,
    ) -> RpcResponse<R> {
        let (network, id) = match target {
            Some(CallTarget { network, id }) => (network, id),
            None => {
                let id = new_correlation_id();
                match self.config.default_network() {
                    Some(network) => (network.to_owned(), id),
                    None => {
                        return RpcResponse::failure(
                            id,
                            RpcError::ConfigurationMissing(format!(
                                "`{method}` needs a network but no default network is configured"
                            )),
                        );
                    }
                }
            }
        };

        let request = RpcRequest::build(method, params, Some(id), &network);
        debug!(
            rpc.id = %request.id,
            rpc.method = method,
            rpc.network = %network,
            rpc.params = request.params.len(),
            "rpc call"
        );

        let body = match self.transport.send(&request).await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    rpc.id = %request.id,
                    rpc.method = method,
                    rpc.network = %network,
                    error = %err,
                    "rpc transport failed"
                );
                return RpcResponse::failure(request.id, err);
            }
        };

        complete(request.id, method, &body)
    }
}

/// Turn a raw reply body into a typed envelope.
fn complete<R: DeserializeOwned>(id: String, method: &str, body: &[u8]) -> RpcResponse<R> {
    let decoded = match decode_response(body) {
        Ok(decoded) => decoded,
        Err(err) => return RpcResponse::failure(id, err),
    };

    if let Some(err) = decoded.error.filter(|e| !e.is_null()) {
        let err = parse_jsonrpc_error(err);
        debug!(rpc.id = %id, rpc.method = method, error = %err, "rpc node error");
        return RpcResponse::failure(id, err);
    }

    let result = decoded.result.unwrap_or(Value::Null);
    if result.is_null() && NO_CONTENT_METHODS.contains(&method) {
        return RpcResponse::no_content(id);
    }

    match serde_json::from_value::<R>(result) {
        Ok(value) => RpcResponse::success(id, value),
        Err(e) => RpcResponse::failure(
            id,
            RpcError::Deserialization(format!("invalid `{method}` result: {e}")),
        ),
    }
}
