use serde_json::{json, Value};

use crate::rpc::{CallTarget, CustomFields, Params, RpcClient, RpcResponse, Transport};
use crate::types::{FilterInfo, FilterKind, StreamData, StreamInfo, StreamItem};

use super::{one_or_many, rejected};

/// Paging and detail options of `liststreamitems` / `liststreamkeyitems`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub verbose: bool,
    /// Number of items; the node defaults to 10.
    pub count: Option<u32>,
    /// Offset; negative counts from the end. The node defaults to `-count`.
    pub start: Option<i64>,
    pub local_ordering: Option<bool>,
}

impl ItemQuery {
    fn append_to(&self, params: Params) -> Params {
        params
            .opt_or(self.verbose.then_some(true), false)
            .opt_or(self.count, 10)
            .opt_or(self.start, -i64::from(self.count.unwrap_or(10)))
            .opt(self.local_ordering)
    }
}

impl<T: Transport> RpcClient<T> {
    /// Create a stream. Returns the creation txid.
    pub async fn create_stream(
        &self,
        target: Option<CallTarget>,
        name: &str,
        open: bool,
        details: Option<&CustomFields>,
    ) -> RpcResponse<String> {
        let details = match details.map(CustomFields::to_value).transpose() {
            Ok(details) => details,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg("stream")
            .arg(name)
            .arg(open)
            .opt(details);
        self.dispatch(target, "create", params).await
    }

    pub async fn list_streams(
        &self,
        target: Option<CallTarget>,
        streams: Option<&[&str]>,
        verbose: bool,
    ) -> RpcResponse<Vec<StreamInfo>> {
        let params = Params::new()
            .opt_or(streams.map(one_or_many), "*")
            .opt(verbose.then_some(true));
        self.dispatch(target, "liststreams", params).await
    }

    /// Subscribe to streams or assets. Answers with no content on success.
    pub async fn subscribe(
        &self,
        target: Option<CallTarget>,
        entities: &[&str],
        rescan: Option<bool>,
    ) -> RpcResponse<()> {
        let params = Params::new().arg(one_or_many(entities)).opt(rescan);
        self.dispatch(target, "subscribe", params).await
    }

    /// Unsubscribe from streams or assets. Answers with no content on success.
    pub async fn unsubscribe(
        &self,
        target: Option<CallTarget>,
        entities: &[&str],
        purge: Option<bool>,
    ) -> RpcResponse<()> {
        let params = Params::new().arg(one_or_many(entities)).opt(purge);
        self.dispatch(target, "unsubscribe", params).await
    }

    /// Publish an item under one or more keys. Returns the txid.
    pub async fn publish(
        &self,
        target: Option<CallTarget>,
        stream: &str,
        keys: &[&str],
        data: &StreamData,
    ) -> RpcResponse<String> {
        let data = match data.to_value() {
            Ok(data) => data,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new().arg(stream).arg(one_or_many(keys)).arg(data);
        self.dispatch(target, "publish", params).await
    }

    pub async fn publish_from(
        &self,
        target: Option<CallTarget>,
        from: &str,
        stream: &str,
        keys: &[&str],
        data: &StreamData,
    ) -> RpcResponse<String> {
        let data = match data.to_value() {
            Ok(data) => data,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(from)
            .arg(stream)
            .arg(one_or_many(keys))
            .arg(data);
        self.dispatch(target, "publishfrom", params).await
    }

    pub async fn list_stream_items(
        &self,
        target: Option<CallTarget>,
        stream: &str,
        query: &ItemQuery,
    ) -> RpcResponse<Vec<StreamItem>> {
        let params = query.append_to(Params::new().arg(stream));
        self.dispatch(target, "liststreamitems", params).await
    }

    pub async fn list_stream_key_items(
        &self,
        target: Option<CallTarget>,
        stream: &str,
        key: &str,
        query: &ItemQuery,
    ) -> RpcResponse<Vec<StreamItem>> {
        let params = query.append_to(Params::new().arg(stream).arg(key));
        self.dispatch(target, "liststreamkeyitems", params).await
    }

    /// Create a stream or transaction filter from JavaScript source.
    /// Returns the creation txid.
    pub async fn create_filter(
        &self,
        target: Option<CallTarget>,
        kind: FilterKind,
        name: &str,
        restrictions: Option<&CustomFields>,
        js_code: &str,
    ) -> RpcResponse<String> {
        let restrictions = match restrictions.map(CustomFields::to_value).transpose() {
            Ok(restrictions) => restrictions.unwrap_or_else(|| json!({})),
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(kind.as_str())
            .arg(name)
            .arg(restrictions)
            .arg(js_code);
        self.dispatch(target, "create", params).await
    }

    pub async fn list_stream_filters(
        &self,
        target: Option<CallTarget>,
        filters: Option<&[&str]>,
        verbose: bool,
    ) -> RpcResponse<Vec<FilterInfo>> {
        let params = Params::new()
            .opt_or(filters.map(one_or_many), "*")
            .opt(verbose.then_some(true));
        self.dispatch(target, "liststreamfilters", params).await
    }

    pub async fn list_tx_filters(
        &self,
        target: Option<CallTarget>,
        filters: Option<&[&str]>,
        verbose: bool,
    ) -> RpcResponse<Vec<FilterInfo>> {
        let params = Params::new()
            .opt_or(filters.map(one_or_many), "*")
            .opt(verbose.then_some(true));
        self.dispatch(target, "listtxfilters", params).await
    }

    /// Approve or disapprove a filter. Stream filters are approved per
    /// stream, so pass the stream name in `for_stream`.
    pub async fn approve_from(
        &self,
        target: Option<CallTarget>,
        from: &str,
        filter: &str,
        approve: bool,
        for_stream: Option<&str>,
    ) -> RpcResponse<String> {
        let approval = match for_stream {
            Some(stream) => json!({ "for": stream, "approve": approve }),
            None => Value::Bool(approve),
        };
        let params = Params::new().arg(from).arg(filter).arg(approval);
        self.dispatch(target, "approvefrom", params).await
    }
}
