//! `EthChainClient`: the `ChainClient` capability over Ethereum JSON-RPC.
//!
//! Uses `eth_blockNumber` for the head and `eth_getBlockByNumber(n, true)`
//! for full blocks with transaction objects.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use blockwatch_core::client::ChainClient;
use blockwatch_core::error::SyncError;
use blockwatch_core::hex::{parse_hex_i64, to_hex_quantity};
use blockwatch_core::types::BlockPayload;

use crate::error::TransportError;
use crate::request::JsonRpcRequest;
use crate::transport::{HttpClientConfig, HttpTransport, RpcTransport};

/// Chain client for Ethereum-compatible nodes.
pub struct EthChainClient<T> {
    transport: T,
    next_id: AtomicU64,
}

impl EthChainClient<HttpTransport> {
    /// Create a client talking HTTP to `url`.
    pub fn http(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(url, config)?))
    }
}

impl<T: RpcTransport> EthChainClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `method` and return the raw `result` value.
    async fn call_raw(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let resp = self
            .transport
            .send(JsonRpcRequest::new(id, method, params))
            .await?;
        resp.into_result().map_err(TransportError::Rpc)
    }

    /// Call `method` and deserialize the result.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<R, TransportError> {
        let result = self.call_raw(method, params).await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl<T: RpcTransport> ChainClient for EthChainClient<T> {
    async fn head_block_number(&self) -> Result<i64, SyncError> {
        let head: String = self.call("eth_blockNumber", vec![]).await?;
        parse_hex_i64(&head)
    }

    async fn block_by_number(&self, number: i64) -> Result<BlockPayload, SyncError> {
        if number < 0 {
            return Err(SyncError::Decode(format!("negative block number {number}")));
        }

        let result = self
            .call_raw(
                "eth_getBlockByNumber",
                vec![json!(to_hex_quantity(number)), json!(true)],
            )
            .await?;

        if result.is_null() {
            return Err(SyncError::BlockNotFound(number));
        }

        serde_json::from_value(result)
            .map_err(|e| SyncError::Decode(format!("block {number}: {e}")))
    }
}
