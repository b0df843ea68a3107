//! Typed verb methods on [`RpcClient`](crate::rpc::RpcClient).
//!
//! Each verb is a thin translation from typed arguments to one dispatcher
//! call with the node's exact method name and positional order. Every verb
//! takes an `Option<CallTarget>`: `None` addresses the configured default
//! network, `Some` supplies network and correlation id explicitly.

mod assets;
mod exchange;
mod node;
mod permissions;
mod streams;

pub use assets::IssueOptions;
pub use permissions::GrantOptions;
pub use streams::ItemQuery;

use serde_json::Value;

use crate::error::{FieldError, RpcError};
use crate::rpc::{new_correlation_id, CallTarget, RpcResponse};

/// Envelope for a call rejected before any request was built.
pub(crate) fn rejected<R>(target: Option<CallTarget>, err: impl Into<RpcError>) -> RpcResponse<R> {
    let id = target.map_or_else(new_correlation_id, |t| t.id);
    RpcResponse::failure(id, err.into())
}

/// Reject NaN and infinite amounts; JSON has no encoding for them.
pub(crate) fn check_finite(amounts: &[(&str, Option<f64>)]) -> Result<(), FieldError> {
    match amounts
        .iter()
        .find(|(_, value)| value.is_some_and(|v| !v.is_finite()))
    {
        Some((name, _)) => Err(FieldError::NonFinite((*name).to_owned())),
        None => Ok(()),
    }
}

/// Comma-separated list, as the node expects for addresses and permissions.
pub(crate) fn comma_list(items: &[&str]) -> String {
    items.join(",")
}

/// A single identifier as a string, several as an array.
pub(crate) fn one_or_many(items: &[&str]) -> Value {
    match items {
        [single] => Value::String((*single).to_owned()),
        many => Value::from(many.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>()),
    }
}
