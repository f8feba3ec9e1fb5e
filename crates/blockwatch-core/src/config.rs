//! Sync engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the engine catches up when the node is more than one block ahead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchUpMode {
    /// Fetch only the reported head; intermediate blocks are skipped.
    #[default]
    JumpToHead,
    /// Walk every block from `cursor + 1` up to the head.
    Sequential,
}

/// What the engine does when the continuity check fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorgPolicy {
    /// Stop the engine and report the reorg as its terminal state.
    #[default]
    Halt,
    /// Log the reorg and keep processing from the new block.
    Resume,
}

/// Configuration for a sync engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Chain label used in logs (e.g. `"ethereum"`).
    pub chain: String,
    /// Delay between poll iterations (milliseconds).
    pub poll_interval_ms: u64,
    pub catch_up: CatchUpMode,
    pub reorg_policy: ReorgPolicy,
    /// First block to process in sequential mode. `None` = start at the head.
    pub start_block: Option<i64>,
    /// Upper bound on blocks processed in one sequential iteration.
    pub max_blocks_per_tick: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            chain: "ethereum".into(),
            poll_interval_ms: 1_000,
            catch_up: CatchUpMode::JumpToHead,
            reorg_policy: ReorgPolicy::Halt,
            start_block: None,
            max_blocks_per_tick: 100,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
