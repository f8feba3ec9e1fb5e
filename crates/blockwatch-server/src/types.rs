//! Request and response bodies of the REST API.

use serde::{Deserialize, Serialize};

use blockwatch_core::state::EngineState;
use blockwatch_core::types::Transaction;
use blockwatch_sync::SyncMetrics;

/// `GET /block`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNumberResponse {
    pub block_number: i64,
}

/// `POST /subscribe` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    pub address: String,
}

/// `GET /address/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// `GET /status`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Human-readable engine state, e.g. `"running"`.
    pub state: String,
    /// Structured form of `state`.
    pub engine: EngineState,
    pub block_number: i64,
    pub watched: usize,
    pub metrics: SyncMetrics,
}
