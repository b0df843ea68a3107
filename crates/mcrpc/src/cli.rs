use clap::Parser;

/// mcrpc: issue one JSON-RPC call to a MultiChain node and print the envelope.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node RPC URL.
    #[arg(long, default_value = "http://127.0.0.1:8570", env = "MCRPC_RPC_URL")]
    pub rpc_url: String,

    /// RPC username.
    #[arg(long, default_value = "multichainrpc", env = "MCRPC_RPC_USER")]
    pub rpc_user: String,

    /// RPC password (the node's `rpcpassword`).
    #[arg(long, env = "MCRPC_RPC_PASS", hide_env_values = true)]
    pub rpc_pass: String,

    /// Chain to address. Required unless every call names one.
    #[arg(long, env = "MCRPC_CHAIN")]
    pub chain: Option<String>,

    /// Default source address for `issuefrom`-style verbs.
    #[arg(long, env = "MCRPC_ADMIN_ADDRESS")]
    pub admin_address: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30", env = "MCRPC_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Maximum requests per second sent to the node.
    #[arg(long, env = "MCRPC_REQUESTS_PER_SECOND")]
    pub requests_per_second: Option<u32>,

    /// Correlation id for the call. Makes the call explicit; requires --chain.
    #[arg(long, requires = "chain")]
    pub id: Option<String>,

    /// Node verb, e.g. `getinfo` or `liststreams`.
    pub method: String,

    /// Positional parameters. Each is parsed as JSON and sent as a string
    /// when it is not valid JSON.
    #[arg(allow_hyphen_values = true)]
    pub params: Vec<String>,
}
