use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::RpcError;

use super::protocol::RpcRequest;
use super::Transport;

enum MockReply {
    Body(Vec<u8>),
    Fail(RpcError),
}

/// A mock transport for testing. Returns canned replies keyed by method name
/// and records every request it receives.
pub struct MockTransport {
    replies: HashMap<String, MockReply>,
    sent: Mutex<Vec<RpcRequest>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Answer `method` with a successful JSON-RPC envelope carrying `result`.
    pub fn respond(self, method: &str, result: Value) -> Self {
        let body = json!({ "result": result, "error": null, "id": null });
        self.respond_raw(method, body.to_string().into_bytes())
    }

    /// Answer `method` with a node-reported error.
    pub fn fail_node(self, method: &str, code: i64, message: &str) -> Self {
        let body = json!({
            "result": null,
            "error": { "code": code, "message": message },
            "id": null,
        });
        self.respond_raw(method, body.to_string().into_bytes())
    }

    /// Fail `method` before any body is obtained.
    pub fn fail_transport(mut self, method: &str, err: RpcError) -> Self {
        self.replies.insert(method.to_owned(), MockReply::Fail(err));
        self
    }

    pub fn respond_raw(mut self, method: &str, body: Vec<u8>) -> Self {
        self.replies.insert(method.to_owned(), MockReply::Body(body));
        self
    }

    pub fn requests(&self) -> Vec<RpcRequest> {
        self.sent.lock().expect("mock request log poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().expect("mock request log poisoned").len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RpcRequest) -> Result<Vec<u8>, RpcError> {
        self.sent
            .lock()
            .expect("mock request log poisoned")
            .push(request.clone());

        match self.replies.get(&request.method) {
            Some(MockReply::Body(body)) => Ok(body.clone()),
            Some(MockReply::Fail(err)) => Err(err.clone()),
            None => {
                let body = json!({
                    "result": null,
                    "error": { "code": -32601, "message": "Method not found" },
                    "id": request.id,
                });
                Ok(body.to_string().into_bytes())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::Params;

    #[tokio::test]
    async fn unknown_method_answers_method_not_found() {
        let mock = MockTransport::new();
        let req = RpcRequest::build("nosuchverb", Params::new(), None, "chain1");
        let body = mock.send(&req).await.expect("mock must answer");
        let json: Value = serde_json::from_slice(&body).expect("mock body must be JSON");
        assert_eq!(json["error"]["code"], -32601);
        assert_eq!(mock.call_count(), 1);
    }
}
