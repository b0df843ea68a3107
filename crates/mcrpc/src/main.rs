mod cli;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;
use serde_json::Value;

use mcrpc_core::{CallTarget, ConnectionConfig, Params, RpcClient, RpcResponse};

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let mut builder = ConnectionConfig::builder(&args.rpc_url)
        .credentials(&args.rpc_user, &args.rpc_pass)
        .timeout(Duration::from_secs(args.timeout_secs));
    if let Some(chain) = &args.chain {
        builder = builder.default_network(chain);
    }
    if let Some(address) = &args.admin_address {
        builder = builder.admin_address(address);
    }
    if let Some(limit) = args.requests_per_second {
        builder = builder.requests_per_second(limit);
    }
    let config = builder.build().wrap_err("invalid connection settings")?;
    let client = RpcClient::new(Arc::new(config)).wrap_err("build RPC client")?;

    let target = match (&args.id, &args.chain) {
        (Some(id), Some(chain)) => Some(CallTarget::new(chain, id)),
        _ => None,
    };
    let params = parse_params(&args.params);

    tracing::debug!(method = %args.method, params = params.len(), "issuing call");
    let response: RpcResponse<Value> = client.dispatch(target, &args.method, params).await;

    let rendered = serde_json::to_string_pretty(&response).wrap_err("render response")?;
    println!("{rendered}");

    Ok(if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Parse each CLI argument as JSON, keeping it as a plain string otherwise.
fn parse_params(raw: &[String]) -> Params {
    raw.iter()
        .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
        .collect::<Vec<Value>>()
        .into()
}
