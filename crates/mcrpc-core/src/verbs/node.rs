use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::rpc::{CallTarget, Params, RpcClient, RpcResponse, Transport};
use crate::types::{BlockRef, BlockVerbosity, ConciseBlock, NodeInfo, VerboseBlock};

impl<T: Transport> RpcClient<T> {
    pub async fn get_info(&self, target: Option<CallTarget>) -> RpcResponse<NodeInfo> {
        self.dispatch(target, "getinfo", Params::new()).await
    }

    /// Chain parameters. Keys vary between protocol versions, so the
    /// result is left untyped.
    pub async fn get_blockchain_params(&self, target: Option<CallTarget>) -> RpcResponse<Value> {
        self.dispatch(target, "getblockchainparams", Params::new())
            .await
    }

    pub async fn get_block_count(&self, target: Option<CallTarget>) -> RpcResponse<u64> {
        self.dispatch(target, "getblockcount", Params::new()).await
    }

    pub async fn get_best_block_hash(&self, target: Option<CallTarget>) -> RpcResponse<String> {
        self.dispatch(target, "getbestblockhash", Params::new())
            .await
    }

    pub async fn get_block_hash(&self, target: Option<CallTarget>, height: u64) -> RpcResponse<String> {
        self.dispatch(target, "getblockhash", Params::new().arg(height))
            .await
    }

    /// `getblock` with the result shape chosen by the caller.
    ///
    /// The node changes the reply's shape with `verbosity`; pick `R` to
    /// match (`String` for hex, [`ConciseBlock`], [`VerboseBlock`], or
    /// `Value`).
    pub async fn get_block<R: DeserializeOwned>(
        &self,
        target: Option<CallTarget>,
        block: impl Into<BlockRef>,
        verbosity: BlockVerbosity,
    ) -> RpcResponse<R> {
        let params = Params::new()
            .arg(block.into().to_string())
            .arg(verbosity as u8);
        self.dispatch(target, "getblock", params).await
    }

    pub async fn get_block_verbose(
        &self,
        target: Option<CallTarget>,
        block: impl Into<BlockRef>,
    ) -> RpcResponse<VerboseBlock> {
        self.get_block(target, block, BlockVerbosity::Full).await
    }

    pub async fn get_block_concise(
        &self,
        target: Option<CallTarget>,
        block: impl Into<BlockRef>,
    ) -> RpcResponse<ConciseBlock> {
        self.get_block(target, block, BlockVerbosity::TxIds).await
    }

    pub async fn help(&self, target: Option<CallTarget>, command: Option<&str>) -> RpcResponse<String> {
        self.dispatch(target, "help", Params::new().opt(command))
            .await
    }
}
