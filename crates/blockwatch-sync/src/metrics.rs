//! Engine counters for observability.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Snapshot of the engine's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetrics {
    /// Completed poll iterations (successful or idle).
    pub ticks: u64,
    /// Iterations that found no new block.
    pub idle_ticks: u64,
    /// Iterations abandoned because of an RPC or decode failure.
    pub failed_ticks: u64,
    pub blocks_processed: u64,
    pub transactions_seen: u64,
    /// (address, transaction) entries appended to the registry.
    pub transactions_matched: u64,
    /// Malformed transaction objects skipped.
    pub transactions_skipped: u64,
    pub reorgs_detected: u64,
    /// Unix timestamp of the last committed block.
    pub last_block_at: Option<i64>,
}

/// Shared, cheaply cloneable handle to the engine's counters.
#[derive(Debug, Clone, Default)]
pub struct MetricsHandle(Arc<Mutex<SyncMetrics>>);

impl MetricsHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current counters.
    pub fn snapshot(&self) -> SyncMetrics {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn record(&self, f: impl FnOnce(&mut SyncMetrics)) {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner));
    }
}
