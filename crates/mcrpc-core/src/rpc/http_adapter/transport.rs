use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{header, Url};
use tracing::{debug, trace};

use crate::config::ConnectionConfig;
use crate::error::RpcError;

use super::super::protocol::RpcRequest;
use super::super::Transport;
use super::connection::{build_http_client, check_status, classify_reqwest_error};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// JSON-RPC transport over HTTP(S) with basic auth.
///
/// One POST per request, no retries and no caching. The underlying
/// `reqwest::Client` pools connections and is safe to share across tasks.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    user: String,
    pass: String,
    limiter: Option<DirectRateLimiter>,
}

impl HttpTransport {
    pub fn new(config: &ConnectionConfig) -> Result<Self, RpcError> {
        let client = build_http_client(config)?;
        let limiter = config
            .requests_per_second()
            .map(|limit| RateLimiter::direct(Quota::per_second(limit)));

        Ok(Self {
            client,
            url: config.endpoint().clone(),
            user: config.username().to_owned(),
            pass: config.password().to_owned(),
            limiter,
        })
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RpcRequest) -> Result<Vec<u8>, RpcError> {
        self.wait_for_rate_limit().await;

        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .basic_auth(&self.user, Some(&self.pass))
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;
        let status = response.status();

        let body = response.bytes().await.map_err(classify_reqwest_error)?;
        debug!(
            rpc.id = %request.id,
            rpc.method = %request.method,
            %status,
            body_len = body.len(),
            "rpc response"
        );
        trace!(
            rpc.id = %request.id,
            rpc.method = %request.method,
            body = %String::from_utf8_lossy(&body),
            "rpc response body"
        );

        check_status(status, &body)?;
        Ok(body.to_vec())
    }
}
