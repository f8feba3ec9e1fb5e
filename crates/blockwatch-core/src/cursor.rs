//! Sync cursor: the engine's position in the chain.

use serde::{Deserialize, Serialize};

/// The last block the engine fully processed.
///
/// `block_number` is [`SyncCursor::UNSET`] until the first block is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCursor {
    /// Last processed block number, or `-1`.
    pub block_number: i64,
    /// Hash recorded when that block was processed.
    pub block_hash: Option<String>,
}

impl Default for SyncCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncCursor {
    /// Sentinel meaning "no block processed yet".
    pub const UNSET: i64 = -1;

    pub fn new() -> Self {
        Self {
            block_number: Self::UNSET,
            block_hash: None,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.block_number == Self::UNSET
    }

    /// Move the cursor forward. Never moves it backwards.
    pub fn advance(&mut self, block_number: i64, block_hash: impl Into<String>) {
        if block_number >= self.block_number {
            self.block_number = block_number;
            self.block_hash = Some(block_hash.into());
        }
    }

    /// Returns the next block to process in sequential mode.
    pub fn next_block(&self) -> i64 {
        self.block_number + 1
    }
}
