//! Shared test helpers for `mcrpc-core` unit tests.

use std::sync::Arc;

use crate::config::ConnectionConfig;

pub const TEST_ENDPOINT: &str = "http://127.0.0.1:4360";
pub const TEST_ADMIN: &str = "1AdminAddressXXXXXXXXXXXXXXXXXXXXX";

/// Config whose default network is `network`, with an admin address.
pub fn config_with_network(network: &str) -> Arc<ConnectionConfig> {
    Arc::new(
        ConnectionConfig::builder(TEST_ENDPOINT)
            .credentials("multichainrpc", "test-pass")
            .default_network(network)
            .admin_address(TEST_ADMIN)
            .build()
            .expect("static test config must build"),
    )
}

/// Config with neither a default network nor an admin address.
pub fn config_without_network() -> Arc<ConnectionConfig> {
    Arc::new(
        ConnectionConfig::builder(TEST_ENDPOINT)
            .credentials("multichainrpc", "test-pass")
            .build()
            .expect("static test config must build"),
    )
}
