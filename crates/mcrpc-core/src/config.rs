//! Connection configuration shared by every dispatcher.
//!
//! A [`ConnectionConfig`] is built once (from a builder or from environment
//! variables) and then only read. Wrap it in an `Arc` to share it between
//! clients; nothing in this crate mutates it after [`ConnectionConfigBuilder::build`].

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const ENV_RPC_URL: &str = "MCRPC_RPC_URL";
pub const ENV_RPC_USER: &str = "MCRPC_RPC_USER";
pub const ENV_RPC_PASS: &str = "MCRPC_RPC_PASS";
pub const ENV_CHAIN: &str = "MCRPC_CHAIN";
pub const ENV_ADMIN_ADDRESS: &str = "MCRPC_ADMIN_ADDRESS";
pub const ENV_TIMEOUT_SECS: &str = "MCRPC_TIMEOUT_SECS";
pub const ENV_REQUESTS_PER_SECOND: &str = "MCRPC_REQUESTS_PER_SECOND";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Node endpoint, credentials and addressing defaults.
#[derive(Clone)]
pub struct ConnectionConfig {
    endpoint: Url,
    username: String,
    password: String,
    default_network: Option<String>,
    admin_address: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    requests_per_second: Option<NonZeroU32>,
}

impl ConnectionConfig {
    pub fn builder(endpoint: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            default_network: None,
            admin_address: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            requests_per_second: None,
        }
    }

    /// Load configuration from the `MCRPC_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENV_RPC_URL).ok_or(ConfigError::Missing(ENV_RPC_URL))?;
        let user = get(ENV_RPC_USER).ok_or(ConfigError::Missing(ENV_RPC_USER))?;
        let pass = get(ENV_RPC_PASS).ok_or(ConfigError::Missing(ENV_RPC_PASS))?;
        let mut builder = Self::builder(endpoint).credentials(user, pass);
        if let Some(chain) = get(ENV_CHAIN) {
            builder = builder.default_network(chain);
        }
        if let Some(address) = get(ENV_ADMIN_ADDRESS) {
            builder = builder.admin_address(address);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                field: ENV_TIMEOUT_SECS,
                message: format!("`{raw}` is not a number of seconds ({e})"),
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = get(ENV_REQUESTS_PER_SECOND) {
            let rps: u32 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                field: ENV_REQUESTS_PER_SECOND,
                message: format!("`{raw}` is not a request rate ({e})"),
            })?;
            builder = builder.requests_per_second(rps);
        }
        builder.build()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn default_network(&self) -> Option<&str> {
        self.default_network.as_deref()
    }

    pub fn admin_address(&self) -> Option<&str> {
        self.admin_address.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn requests_per_second(&self) -> Option<NonZeroU32> {
        self.requests_per_second
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("default_network", &self.default_network)
            .field("admin_address", &self.admin_address)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    endpoint: String,
    username: Option<String>,
    password: Option<String>,
    default_network: Option<String>,
    admin_address: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    requests_per_second: Option<u32>,
}

impl ConnectionConfigBuilder {
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn default_network(mut self, name: impl Into<String>) -> Self {
        self.default_network = Some(name.into());
        self
    }

    pub fn admin_address(mut self, address: impl Into<String>) -> Self {
        self.admin_address = Some(address.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn requests_per_second(mut self, limit: u32) -> Self {
        self.requests_per_second = Some(limit);
        self
    }

    pub fn build(self) -> Result<ConnectionConfig, ConfigError> {
        let endpoint = parse_endpoint(&self.endpoint)?;
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("rpc username"))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::Missing("rpc password"))?;

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "timeout",
                message: "must be greater than zero".to_owned(),
            });
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "connect_timeout",
                message: "must be greater than zero".to_owned(),
            });
        }
        let requests_per_second = match self.requests_per_second {
            None => None,
            Some(limit) => Some(NonZeroU32::new(limit).ok_or_else(|| ConfigError::Invalid {
                field: "requests_per_second",
                message: "must be at least 1".to_owned(),
            })?),
        };

        Ok(ConnectionConfig {
            endpoint,
            username,
            password,
            default_network: self.default_network.filter(|n| !n.is_empty()),
            admin_address: self.admin_address.filter(|a| !a.is_empty()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            requests_per_second,
        })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    if endpoint.trim().is_empty() {
        return Err(ConfigError::Missing("rpc endpoint"));
    }
    let parsed = Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
        field: "endpoint",
        message: format!("`{endpoint}` is not an HTTP(S) URL ({e})"),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::Invalid {
            field: "endpoint",
            message: format!("unsupported scheme `{other}`; expected http or https"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn builder_accepts_complete_config() {
        let config = ConnectionConfig::builder("http://127.0.0.1:4360")
            .credentials("multichainrpc", "secret")
            .default_network("chain1")
            .admin_address("1AdminAddr")
            .build()
            .expect("config must build");
        assert_eq!(config.endpoint().as_str(), "http://127.0.0.1:4360/");
        assert_eq!(config.default_network(), Some("chain1"));
        assert_eq!(config.admin_address(), Some("1AdminAddr"));
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.requests_per_second().is_none());
    }

    #[test]
    fn builder_rejects_missing_credentials() {
        let err = ConnectionConfig::builder("http://127.0.0.1:4360")
            .build()
            .expect_err("credentials are mandatory");
        assert!(matches!(err, ConfigError::Missing("rpc username")));
    }

    #[test]
    fn builder_rejects_empty_password() {
        let err = ConnectionConfig::builder("http://127.0.0.1:4360")
            .credentials("user", "")
            .build()
            .expect_err("empty password must be rejected");
        assert!(matches!(err, ConfigError::Missing("rpc password")));
    }

    #[test]
    fn builder_rejects_unsupported_scheme() {
        let err = ConnectionConfig::builder("ftp://example.com")
            .credentials("user", "pass")
            .build()
            .expect_err("ftp must be rejected");
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn builder_rejects_zero_rate_limit() {
        let err = ConnectionConfig::builder("http://127.0.0.1:4360")
            .credentials("user", "pass")
            .requests_per_second(0)
            .build()
            .expect_err("zero rate must be rejected");
        assert!(err.to_string().contains("requests_per_second"));
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = ConnectionConfig::builder("http://127.0.0.1:4360")
            .credentials("user", "hunter2")
            .build()
            .expect("config must build");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn from_lookup_reads_all_settings() {
        let config = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_RPC_URL, "http://node:8570"),
            (ENV_RPC_USER, "multichainrpc"),
            (ENV_RPC_PASS, "pw"),
            (ENV_CHAIN, "chain1"),
            (ENV_ADMIN_ADDRESS, "1Admin"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_REQUESTS_PER_SECOND, "20"),
        ]))
        .expect("config must load");
        assert_eq!(config.username(), "multichainrpc");
        assert_eq!(config.default_network(), Some("chain1"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.requests_per_second().map(NonZeroU32::get), Some(20));
    }

    #[test]
    fn from_lookup_without_chain_leaves_default_network_unset() {
        let config = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_RPC_URL, "http://node:8570"),
            (ENV_RPC_USER, "u"),
            (ENV_RPC_PASS, "p"),
            (ENV_CHAIN, "  "),
        ]))
        .expect("config must load");
        assert!(config.default_network().is_none());
    }

    #[test]
    fn from_lookup_names_the_missing_credential() {
        let err = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_RPC_URL, "http://node:8570"),
            (ENV_RPC_USER, "multichainrpc"),
        ]))
        .expect_err("password is mandatory");
        assert!(matches!(err, ConfigError::Missing(ENV_RPC_PASS)));

        let err = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_RPC_URL, "http://node:8570"),
            (ENV_RPC_PASS, "pw"),
        ]))
        .expect_err("username is mandatory");
        assert!(matches!(err, ConfigError::Missing(ENV_RPC_USER)));
    }

    #[test]
    fn from_lookup_requires_url() {
        let err = ConnectionConfig::from_lookup(lookup_from(&[(ENV_RPC_USER, "u")]))
            .expect_err("url is mandatory");
        assert!(matches!(err, ConfigError::Missing(ENV_RPC_URL)));
    }

    #[test]
    fn from_lookup_rejects_bad_timeout() {
        let err = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_RPC_URL, "http://node:8570"),
            (ENV_RPC_USER, "u"),
            (ENV_RPC_PASS, "p"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .expect_err("non-numeric timeout must fail");
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }
}
