//! Error types for the BlockWatch pipeline.

use thiserror::Error;

/// Errors that can occur while syncing blocks or serving queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Block {0} is not available on the node yet")]
    BlockNotFound(i64),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Reorg detected at block {block_number}: expected hash {expected}, got {actual}")]
    ReorgDetected {
        block_number: i64,
        expected: String,
        actual: String,
    },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Address {0} is already subscribed")]
    AlreadySubscribed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Sync task aborted: {0}")]
    Aborted(String),
}

impl SyncError {
    /// Returns `true` if the next poll tick may succeed where this one failed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Rpc(_) | Self::BlockNotFound(_) | Self::Decode(_) | Self::Storage(_)
        )
    }

    /// Returns `true` if the error is a detected reorg.
    pub fn is_reorg(&self) -> bool {
        matches!(self, Self::ReorgDetected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(SyncError::Rpc("timeout".into()).is_transient());
        assert!(SyncError::BlockNotFound(7).is_transient());
        assert!(!SyncError::InvalidAddress("0xG".into()).is_transient());

        let reorg = SyncError::ReorgDetected {
            block_number: 10,
            expected: "0xa".into(),
            actual: "0xb".into(),
        };
        assert!(reorg.is_reorg());
        assert!(!reorg.is_transient());
    }

    #[test]
    fn display_mentions_block() {
        let e = SyncError::ReorgDetected {
            block_number: 42,
            expected: "0xaa".into(),
            actual: "0xbb".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("0xaa"));
    }
}
