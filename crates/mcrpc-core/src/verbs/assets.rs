use serde_json::Value;

use crate::error::{FieldError, RpcError};
use crate::rpc::{CallTarget, CustomFields, Params, RpcClient, RpcResponse, Transport};
use crate::types::{AssetBalance, AssetInfo, AssetSpec};

use super::{check_finite, rejected};

/// Optional arguments of `issue`, `issuefrom` and `issuemore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueOptions {
    /// Smallest transferable unit; the node defaults to 1.
    pub units: Option<f64>,
    pub native_amount: Option<f64>,
    pub details: Option<CustomFields>,
}

impl IssueOptions {
    /// Check `qty` and the optional amounts, then convert the details.
    fn prepare(&self, qty: f64) -> Result<Option<Value>, FieldError> {
        check_finite(&[
            ("qty", Some(qty)),
            ("units", self.units),
            ("native_amount", self.native_amount),
        ])?;
        self.details.as_ref().map(CustomFields::to_value).transpose()
    }
}

impl<T: Transport> RpcClient<T> {
    /// Issue a new asset to `to`. Returns the issuance txid.
    ///
    /// Each call creates a distinct asset transaction; nothing is cached or
    /// deduplicated, so resubmitting after an ambiguous failure can issue twice.
    pub async fn issue(
        &self,
        target: Option<CallTarget>,
        to: &str,
        asset: &AssetSpec,
        qty: f64,
        options: &IssueOptions,
    ) -> RpcResponse<String> {
        let details = match options.prepare(qty) {
            Ok(details) => details,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(to)
            .arg(asset.to_value())
            .arg(qty)
            .opt_or(options.units, 1)
            .opt_or(options.native_amount, 0)
            .opt(details);
        self.dispatch(target, "issue", params).await
    }

    /// Issue from `from`, or from the configured admin address when `None`.
    pub async fn issue_from(
        &self,
        target: Option<CallTarget>,
        from: Option<&str>,
        to: &str,
        asset: &AssetSpec,
        qty: f64,
        options: &IssueOptions,
    ) -> RpcResponse<String> {
        let Some(from) = from.or(self.config().admin_address()).map(str::to_owned) else {
            return rejected(
                target,
                RpcError::ConfigurationMissing(
                    "issuefrom needs a source address but no admin address is configured".into(),
                ),
            );
        };
        let details = match options.prepare(qty) {
            Ok(details) => details,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(from)
            .arg(to)
            .arg(asset.to_value())
            .arg(qty)
            .opt_or(options.units, 1)
            .opt_or(options.native_amount, 0)
            .opt(details);
        self.dispatch(target, "issuefrom", params).await
    }

    /// Issue more units of an open asset. `units` in `options` is ignored.
    pub async fn issue_more(
        &self,
        target: Option<CallTarget>,
        to: &str,
        asset: &str,
        qty: f64,
        options: &IssueOptions,
    ) -> RpcResponse<String> {
        let details = check_finite(&[("qty", Some(qty)), ("native_amount", options.native_amount)])
            .and_then(|()| options.details.as_ref().map(CustomFields::to_value).transpose());
        let details = match details {
            Ok(details) => details,
            Err(err) => return rejected(target, err),
        };
        let params = Params::new()
            .arg(to)
            .arg(asset)
            .arg(qty)
            .opt_or(options.native_amount, 0)
            .opt(details);
        self.dispatch(target, "issuemore", params).await
    }

    pub async fn list_assets(
        &self,
        target: Option<CallTarget>,
        assets: Option<&[&str]>,
        verbose: bool,
    ) -> RpcResponse<Vec<AssetInfo>> {
        let params = Params::new()
            .opt_or(assets.map(super::one_or_many), "*")
            .opt(verbose.then_some(true));
        self.dispatch(target, "listassets", params).await
    }

    pub async fn get_address_balances(
        &self,
        target: Option<CallTarget>,
        address: &str,
        min_conf: Option<u32>,
        include_locked: Option<bool>,
    ) -> RpcResponse<Vec<AssetBalance>> {
        let params = Params::new()
            .arg(address)
            .opt_or(min_conf, 1)
            .opt(include_locked);
        self.dispatch(target, "getaddressbalances", params).await
    }

    pub async fn send_asset(
        &self,
        target: Option<CallTarget>,
        to: &str,
        asset: &str,
        qty: f64,
        native_amount: Option<f64>,
    ) -> RpcResponse<String> {
        if let Err(err) = check_finite(&[("qty", Some(qty)), ("native_amount", native_amount)]) {
            return rejected(target, err);
        }
        let params = Params::new()
            .arg(to)
            .arg(asset)
            .arg(qty)
            .opt(native_amount);
        self.dispatch(target, "sendasset", params).await
    }

    pub async fn send_asset_from(
        &self,
        target: Option<CallTarget>,
        from: &str,
        to: &str,
        asset: &str,
        qty: f64,
        native_amount: Option<f64>,
    ) -> RpcResponse<String> {
        if let Err(err) = check_finite(&[("qty", Some(qty)), ("native_amount", native_amount)]) {
            return rejected(target, err);
        }
        let params = Params::new()
            .arg(from)
            .arg(to)
            .arg(asset)
            .arg(qty)
            .opt(native_amount);
        self.dispatch(target, "sendassetfrom", params).await
    }
}
