pub mod binary_cache;
pub mod config;
pub mod error;
pub mod rpc;
pub mod types;
pub mod verbs;

#[cfg(test)]
mod test_util;

pub use binary_cache::BinaryCacheHandle;
pub use config::ConnectionConfig;
pub use error::{ConfigError, ErrorKind, RpcError};
pub use rpc::{CallTarget, CustomFields, Params, RpcClient, RpcResponse};
