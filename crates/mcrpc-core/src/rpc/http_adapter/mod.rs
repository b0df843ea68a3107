//! HTTP transport for MultiChain-compatible JSON-RPC endpoints.
//!
//! Implements [`Transport`](super::Transport) over `reqwest` with basic auth,
//! bounded timeouts and optional request rate limiting.

mod connection;
mod transport;

pub use transport::HttpTransport;
