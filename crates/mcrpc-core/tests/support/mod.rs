//! In-process fake node speaking the MultiChain JSON-RPC dialect.
//!
//! Implements just enough verbs for end-to-end tests of the HTTP transport
//! and dispatcher. State is kept in memory per server instance.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use serde_json::{json, Value};

pub const USER: &str = "multichainrpc";
pub const PASS: &str = "fake-node-pass";
pub const CHAIN: &str = "chain1";
pub const TIP_HEIGHT: u64 = 100;

static TRACING_INIT: Once = Once::new();

pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mcrpc_core=debug")),
            )
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
struct NodeState {
    filters: Vec<(String, String, usize)>,
    streams: HashSet<String>,
    caches: HashMap<String, Vec<u8>>,
    published: Vec<Value>,
}

struct FakeNode {
    next_id: AtomicU64,
    state: Mutex<NodeState>,
}

impl FakeNode {
    fn next_txid(&self) -> String {
        format!("{:064x}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Start a fake node on an ephemeral port and return its base URL.
pub async fn spawn_fake_node() -> String {
    init_tracing();

    let node = Arc::new(FakeNode {
        next_id: AtomicU64::new(0),
        state: Mutex::new(NodeState::default()),
    });
    node.state
        .lock()
        .expect("fake node state poisoned")
        .streams
        .insert("root".to_owned());

    let router = Router::new().route("/", post(handle)).with_state(node);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("fake node must bind");
    let addr = listener.local_addr().expect("bound listener has address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("fake node server failed");
    });
    format!("http://{addr}")
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("probe listener must bind");
    let addr = listener.local_addr().expect("bound listener has address");
    drop(listener);
    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{USER}:{PASS}"))
    );
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

fn ok(id: &Value, result: Value) -> Response {
    Json(json!({ "result": result, "error": null, "id": id })).into_response()
}

fn fail(id: &Value, code: i64, message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "result": null,
            "error": { "code": code, "message": message },
            "id": id,
        })),
    )
        .into_response()
}

fn block_hash(height: u64) -> String {
    format!("{:064x}", 0xb10c_0000_u64 + height)
}

async fn handle(
    State(node): State<Arc<FakeNode>>,
    headers: HeaderMap,
    Json(req): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let id = req.get("id").cloned().unwrap_or(Value::Null);
    if req.get("chain_name").and_then(Value::as_str) != Some(CHAIN) {
        return fail(&id, -32600, "Wrong chain name");
    }
    let method = req.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = req
        .get("params")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let param_str = |i: usize| params.get(i).and_then(Value::as_str).unwrap_or_default().to_owned();

    match method {
        "getinfo" => ok(
            &id,
            json!({
                "version": "2.3.3",
                "nodeversion": 20303901,
                "protocolversion": 20013,
                "chainname": CHAIN,
                "description": "MultiChain chain1",
                "port": 4361,
                "blocks": TIP_HEIGHT,
                "connections": 0,
                "balance": 0.0,
                "errors": "",
            }),
        ),
        "getblockcount" => ok(&id, json!(TIP_HEIGHT)),
        "getblock" => {
            let Ok(height) = param_str(0).parse::<u64>() else {
                return fail(&id, -5, "Block not found");
            };
            if height > TIP_HEIGHT {
                return fail(&id, -8, "Block height out of range");
            }
            let verbosity = params.get(1).and_then(Value::as_u64).unwrap_or(1);
            let txid = format!("{:064x}", height);
            match verbosity {
                0 => ok(&id, json!(format!("00{height:02x}"))),
                1 => ok(
                    &id,
                    json!({
                        "hash": block_hash(height),
                        "height": height,
                        "time": 1_700_000_000 + height,
                        "confirmations": TIP_HEIGHT - height + 1,
                        "tx": [txid],
                    }),
                ),
                _ => ok(
                    &id,
                    json!({
                        "hash": block_hash(height),
                        "miner": "1MinerXXXX",
                        "confirmations": TIP_HEIGHT - height + 1,
                        "size": 300,
                        "height": height,
                        "version": 3,
                        "merkleroot": txid,
                        "tx": [{ "txid": txid, "vin": [], "vout": [] }],
                        "time": 1_700_000_000 + height,
                        "nonce": 7,
                        "difficulty": 0.0000002,
                    }),
                ),
            }
        }
        "issue" => ok(&id, json!(node.next_txid())),
        "subscribe" => ok(&id, Value::Null),
        "create" => {
            let kind = param_str(0);
            let name = param_str(1);
            let mut state = node.state.lock().expect("fake node state poisoned");
            match kind.as_str() {
                "stream" => {
                    state.streams.insert(name);
                }
                "streamfilter" | "txfilter" => {
                    let code_len = param_str(3).len();
                    let txid = node.next_txid();
                    state.filters.push((name, txid.clone(), code_len));
                    return ok(&id, json!(txid));
                }
                _ => return fail(&id, -8, "Invalid entity type"),
            }
            ok(&id, json!(node.next_txid()))
        }
        "liststreamfilters" => {
            let state = node.state.lock().expect("fake node state poisoned");
            let rows: Vec<Value> = state
                .filters
                .iter()
                .map(|(name, txid, len)| {
                    json!({
                        "name": name,
                        "createtxid": txid,
                        "filterref": "101-266-1234",
                        "language": "javascript",
                        "codelength": len,
                    })
                })
                .collect();
            ok(&id, Value::Array(rows))
        }
        "createbinarycache" => {
            let handle = format!("cache{}", node.next_id.fetch_add(1, Ordering::Relaxed));
            node.state
                .lock()
                .expect("fake node state poisoned")
                .caches
                .insert(handle.clone(), Vec::new());
            ok(&id, json!(handle))
        }
        "appendbinarycache" => {
            let Ok(bytes) = hex::decode(param_str(1)) else {
                return fail(&id, -8, "data should be hexadecimal string");
            };
            let mut state = node.state.lock().expect("fake node state poisoned");
            match state.caches.get_mut(&param_str(0)) {
                Some(cache) => {
                    cache.extend_from_slice(&bytes);
                    ok(&id, json!(cache.len()))
                }
                None => fail(&id, -8, "Binary cache item with this identifier not found"),
            }
        }
        "deletebinarycache" => {
            let mut state = node.state.lock().expect("fake node state poisoned");
            match state.caches.remove(&param_str(0)) {
                Some(_) => ok(&id, Value::Null),
                None => fail(&id, -8, "Binary cache item with this identifier not found"),
            }
        }
        "publish" => {
            let mut state = node.state.lock().expect("fake node state poisoned");
            if !state.streams.contains(&param_str(0)) {
                return fail(&id, -708, "Stream with this name not found");
            }
            let data = params.get(2).cloned().unwrap_or(Value::Null);
            if let Some(handle) = data.get("cache").and_then(Value::as_str) {
                if !state.caches.contains_key(handle) {
                    return fail(&id, -8, "Binary cache item with this identifier not found");
                }
            }
            state.published.push(data);
            ok(&id, json!(node.next_txid()))
        }
        "slowverb" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            ok(&id, Value::Null)
        }
        "garbage" => (StatusCode::OK, "this is not json").into_response(),
        _ => fail(&id, -32601, "Method not found"),
    }
}
