//! Scriptable in-memory chain used by the engine and facade tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use blockwatch_core::client::ChainClient;
use blockwatch_core::error::SyncError;
use blockwatch_core::hex::to_hex_quantity;
use blockwatch_core::types::BlockPayload;

#[derive(Default)]
struct ChainState {
    head: i64,
    blocks: HashMap<i64, BlockPayload>,
    head_failures: usize,
    block_requests: Vec<i64>,
}

#[derive(Default)]
pub(crate) struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_head(&self, head: i64) {
        self.state.lock().unwrap().head = head;
    }

    /// Insert (or replace) the block at `number`.
    pub(crate) fn put_block(&self, number: i64, hash: &str, parent: &str, txs: Vec<Value>) {
        self.put_payload(number, block(number, hash, parent, txs));
    }

    pub(crate) fn put_payload(&self, number: i64, payload: BlockPayload) {
        self.state.lock().unwrap().blocks.insert(number, payload);
    }

    /// Make the next `n` head queries fail with an RPC error.
    pub(crate) fn fail_head(&self, n: usize) {
        self.state.lock().unwrap().head_failures = n;
    }

    /// Block numbers requested so far, in order.
    pub(crate) fn block_requests(&self) -> Vec<i64> {
        self.state.lock().unwrap().block_requests.clone()
    }

    /// Linear chain `from..=to` where block `n` has hash `0xb{n}`.
    pub(crate) fn linear(from: i64, to: i64) -> Self {
        let chain = Self::new();
        for n in from..=to {
            chain.put_block(n, &format!("0xb{n}"), &format!("0xb{}", n - 1), vec![]);
        }
        chain.set_head(to);
        chain
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn head_block_number(&self) -> Result<i64, SyncError> {
        let mut state = self.state.lock().unwrap();
        if state.head_failures > 0 {
            state.head_failures -= 1;
            return Err(SyncError::Rpc("connection reset".into()));
        }
        Ok(state.head)
    }

    async fn block_by_number(&self, number: i64) -> Result<BlockPayload, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.block_requests.push(number);
        state
            .blocks
            .get(&number)
            .cloned()
            .ok_or(SyncError::BlockNotFound(number))
    }
}

pub(crate) fn block(number: i64, hash: &str, parent: &str, txs: Vec<Value>) -> BlockPayload {
    BlockPayload {
        number: to_hex_quantity(number),
        hash: hash.into(),
        parent_hash: parent.into(),
        transactions: txs,
    }
}

pub(crate) fn tx_json(hash: &str, from: &str, to: &str, value: &str, number: i64) -> Value {
    json!({
        "hash": hash,
        "from": from,
        "to": to,
        "value": value,
        "blockNumber": to_hex_quantity(number),
    })
}
