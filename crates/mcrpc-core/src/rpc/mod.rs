//! JSON-RPC dispatch layer.
//!
//! Defines the [`Transport`] trait, the HTTP implementation
//! ([`HttpTransport`]), request building ([`Params`], [`RpcRequest`]), the
//! response envelope ([`RpcResponse`]) and the dispatcher ([`RpcClient`]).

mod client;
mod envelope;
mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod params;
mod protocol;

pub use client::{CallTarget, RpcClient, NO_CONTENT_METHODS};
pub use envelope::RpcResponse;
pub use http_adapter::HttpTransport;
pub use params::{CustomFields, FieldValue, Params};
pub use protocol::{new_correlation_id, RpcRequest};

use async_trait::async_trait;

use crate::error::RpcError;

/// Carries one serialized request to the node and returns the raw reply body.
///
/// Implementations must not retry: node verbs are frequently non-idempotent.
/// Failures before a usable body was obtained are reported as
/// [`RpcError::Timeout`], [`RpcError::ConnectionRefused`] or
/// [`RpcError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RpcRequest) -> Result<Vec<u8>, RpcError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &RpcRequest) -> Result<Vec<u8>, RpcError> {
        (**self).send(request).await
    }
}
