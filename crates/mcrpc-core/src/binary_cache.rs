//! Node-side binary caches for staging payloads too large for one call.
//!
//! A cache lives in node memory until it is deleted with
//! [`RpcClient::delete_binary_cache`] or the node restarts. Nothing here
//! releases a handle automatically: the caller owns its lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RpcError;
use crate::rpc::{CallTarget, Params, RpcClient, RpcResponse, Transport};

/// Opaque token naming a node-side binary cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinaryCacheHandle(String);

impl BinaryCacheHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BinaryCacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<T: Transport> RpcClient<T> {
    pub async fn create_binary_cache(
        &self,
        target: Option<CallTarget>,
    ) -> RpcResponse<BinaryCacheHandle> {
        self.dispatch(target, "createbinarycache", Params::new())
            .await
    }

    /// Append `chunk` to the cache. Returns the cache's total size in bytes.
    pub async fn append_binary_cache(
        &self,
        target: Option<CallTarget>,
        handle: &BinaryCacheHandle,
        chunk: &[u8],
    ) -> RpcResponse<u64> {
        let params = Params::new().arg(handle.as_str()).arg(hex::encode(chunk));
        self.dispatch(target, "appendbinarycache", params).await
    }

    pub async fn delete_binary_cache(
        &self,
        target: Option<CallTarget>,
        handle: &BinaryCacheHandle,
    ) -> RpcResponse<()> {
        self.dispatch(target, "deletebinarycache", Params::new().arg(handle.as_str()))
            .await
    }
}

/// Create a cache on `network` and append `data` to it in `chunk_size` pieces.
///
/// Returns the live handle; delete it once the referencing call is done.
/// When an append fails the partially filled cache is left in place and
/// the handle is logged, so the caller can still clean it up.
pub async fn upload<T: Transport>(
    client: &RpcClient<T>,
    network: Option<&str>,
    data: &[u8],
    chunk_size: usize,
) -> Result<BinaryCacheHandle, RpcError> {
    if chunk_size == 0 {
        return Err(RpcError::InvalidParams(
            "binary cache chunk size must be at least 1".to_owned(),
        ));
    }
    let target = || network.map(CallTarget::network);

    let handle = client
        .create_binary_cache(target())
        .await
        .into_result()?
        .ok_or_else(|| RpcError::Deserialization("createbinarycache returned no handle".into()))?;

    for (index, chunk) in data.chunks(chunk_size).enumerate() {
        let resp = client.append_binary_cache(target(), &handle, chunk).await;
        if let Some(err) = resp.error {
            warn!(
                cache = %handle,
                chunk = index,
                error = %err,
                "binary cache append failed; cache left for caller cleanup"
            );
            return Err(err);
        }
        debug!(cache = %handle, chunk = index, total = ?resp.result, "binary cache chunk appended");
    }

    Ok(handle)
}
