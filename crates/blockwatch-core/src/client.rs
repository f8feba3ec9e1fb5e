//! The `ChainClient` trait: what the engine needs from a node.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::types::BlockPayload;

/// Head-number and block lookups against a remote node.
///
/// Implementations must be `Send + Sync` so the engine can run on any Tokio
/// worker.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Number of the most recent block known to the node.
    async fn head_block_number(&self) -> Result<i64, SyncError>;

    /// Full block (with transaction objects) at `number`.
    async fn block_by_number(&self, number: i64) -> Result<BlockPayload, SyncError>;
}

#[async_trait]
impl<C: ChainClient + ?Sized> ChainClient for std::sync::Arc<C> {
    async fn head_block_number(&self) -> Result<i64, SyncError> {
        (**self).head_block_number().await
    }

    async fn block_by_number(&self, number: i64) -> Result<BlockPayload, SyncError> {
        (**self).block_by_number(number).await
    }
}
