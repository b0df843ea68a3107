use crate::rpc::{CallTarget, Params, RpcClient, RpcResponse, Transport};
use crate::types::{AddressValidation, PermissionEntry};

use super::{check_finite, comma_list, rejected};

/// Optional arguments shared by `grant`, `grantfrom` and `revoke`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrantOptions {
    pub native_amount: Option<f64>,
    pub start_block: Option<u64>,
    pub end_block: Option<u64>,
}

impl GrantOptions {
    fn append_to(&self, params: Params) -> Params {
        params
            .opt_or(self.native_amount, 0)
            .opt_or(self.start_block, 0)
            .opt(self.end_block)
    }
}

impl<T: Transport> RpcClient<T> {
    pub async fn get_new_address(&self, target: Option<CallTarget>) -> RpcResponse<String> {
        self.dispatch(target, "getnewaddress", Params::new()).await
    }

    pub async fn get_addresses(&self, target: Option<CallTarget>) -> RpcResponse<Vec<String>> {
        self.dispatch(target, "getaddresses", Params::new()).await
    }

    pub async fn validate_address(
        &self,
        target: Option<CallTarget>,
        address: &str,
    ) -> RpcResponse<AddressValidation> {
        self.dispatch(target, "validateaddress", Params::new().arg(address))
            .await
    }

    /// `listpermissions`; `None` means all permissions / all addresses.
    pub async fn list_permissions(
        &self,
        target: Option<CallTarget>,
        permissions: Option<&str>,
        addresses: Option<&[&str]>,
    ) -> RpcResponse<Vec<PermissionEntry>> {
        let params = Params::new()
            .opt_or(permissions, "*")
            .opt(addresses.map(comma_list));
        self.dispatch(target, "listpermissions", params).await
    }

    /// Grant `permissions` (comma-separated, e.g. `"send,receive"`).
    /// Returns the txid.
    pub async fn grant(
        &self,
        target: Option<CallTarget>,
        addresses: &[&str],
        permissions: &str,
        options: &GrantOptions,
    ) -> RpcResponse<String> {
        if let Err(err) = check_finite(&[("native_amount", options.native_amount)]) {
            return rejected(target, err);
        }
        let params = Params::new().arg(comma_list(addresses)).arg(permissions);
        self.dispatch(target, "grant", options.append_to(params))
            .await
    }

    pub async fn grant_from(
        &self,
        target: Option<CallTarget>,
        from: &str,
        addresses: &[&str],
        permissions: &str,
        options: &GrantOptions,
    ) -> RpcResponse<String> {
        if let Err(err) = check_finite(&[("native_amount", options.native_amount)]) {
            return rejected(target, err);
        }
        let params = Params::new()
            .arg(from)
            .arg(comma_list(addresses))
            .arg(permissions);
        self.dispatch(target, "grantfrom", options.append_to(params))
            .await
    }

    pub async fn revoke(
        &self,
        target: Option<CallTarget>,
        addresses: &[&str],
        permissions: &str,
        native_amount: Option<f64>,
    ) -> RpcResponse<String> {
        if let Err(err) = check_finite(&[("native_amount", native_amount)]) {
            return rejected(target, err);
        }
        let params = Params::new()
            .arg(comma_list(addresses))
            .arg(permissions)
            .opt(native_amount);
        self.dispatch(target, "revoke", params).await
    }
}
