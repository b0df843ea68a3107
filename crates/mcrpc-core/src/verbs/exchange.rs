//! Atomic asset exchange verbs.
//!
//! An exchange is a chain of dependent calls (`preparelockunspent` →
//! `createrawexchange` → `appendrawexchange`/`completerawexchange` →
//! `sendrawtransaction`). The dispatcher does not order concurrent calls, so
//! callers must await each step before issuing the next.

use crate::rpc::{CallTarget, Params, RpcClient, RpcResponse, Transport};
use crate::types::{AppendedExchange, AssetAmounts, DecodedExchange, LockedOutput};

use super::rejected;

impl<T: Transport> RpcClient<T> {
    /// Lock an output holding `assets` for use in an exchange offer.
    pub async fn prepare_lock_unspent(
        &self,
        target: Option<CallTarget>,
        assets: &AssetAmounts,
        lock: Option<bool>,
    ) -> RpcResponse<LockedOutput> {
        let assets = match assets.to_value() {
            Ok(assets) => assets,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new().arg(assets).opt(lock);
        self.dispatch(target, "preparelockunspent", params).await
    }

    /// Offer the locked `output` in exchange for `ask`. Returns the partial
    /// transaction hex.
    pub async fn create_raw_exchange(
        &self,
        target: Option<CallTarget>,
        output: &LockedOutput,
        ask: &AssetAmounts,
    ) -> RpcResponse<String> {
        let ask = match ask.to_value() {
            Ok(ask) => ask,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(output.txid.as_str())
            .arg(output.vout)
            .arg(ask);
        self.dispatch(target, "createrawexchange", params).await
    }

    pub async fn append_raw_exchange(
        &self,
        target: Option<CallTarget>,
        hex: &str,
        output: &LockedOutput,
        ask: &AssetAmounts,
    ) -> RpcResponse<AppendedExchange> {
        let ask = match ask.to_value() {
            Ok(ask) => ask,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(hex)
            .arg(output.txid.as_str())
            .arg(output.vout)
            .arg(ask);
        self.dispatch(target, "appendrawexchange", params).await
    }

    /// Complete an exchange with the counterparty's output. Returns the
    /// final transaction hex, ready for [`RpcClient::send_raw_transaction`].
    pub async fn complete_raw_exchange(
        &self,
        target: Option<CallTarget>,
        hex: &str,
        output: &LockedOutput,
        ask: &AssetAmounts,
    ) -> RpcResponse<String> {
        let ask = match ask.to_value() {
            Ok(ask) => ask,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(hex)
            .arg(output.txid.as_str())
            .arg(output.vout)
            .arg(ask);
        self.dispatch(target, "completerawexchange", params).await
    }

    pub async fn decode_raw_exchange(
        &self,
        target: Option<CallTarget>,
        hex: &str,
    ) -> RpcResponse<DecodedExchange> {
        self.dispatch(target, "decoderawexchange", Params::new().arg(hex))
            .await
    }

    pub async fn send_raw_transaction(&self, target: Option<CallTarget>, hex: &str) -> RpcResponse<String> {
        self.dispatch(target, "sendrawtransaction", Params::new().arg(hex))
            .await
    }
}
