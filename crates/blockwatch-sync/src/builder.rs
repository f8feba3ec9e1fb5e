//! Fluent builder for sync engines.
//!
//! # Example
//!
//! ```rust,no_run
//! use blockwatch_core::config::CatchUpMode;
//! use blockwatch_sync::SyncEngineBuilder;
//!
//! let config = SyncEngineBuilder::new()
//!     .chain("sepolia")
//!     .poll_interval_ms(2_000)
//!     .catch_up(CatchUpMode::Sequential)
//!     .start_block(5_000_000)
//!     .build_config();
//! ```

use std::sync::Arc;

use tracing::Span;

use blockwatch_core::client::ChainClient;
use blockwatch_core::config::{CatchUpMode, ReorgPolicy, SyncConfig};
use blockwatch_core::storage::Storage;

use crate::engine::SyncEngine;

/// Fluent builder for [`SyncConfig`] and [`SyncEngine`].
#[derive(Default)]
pub struct SyncEngineBuilder {
    config: SyncConfig,
    span: Option<Span>,
}

impl SyncEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chain label used in logs.
    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.config.chain = chain.into();
        self
    }

    /// Set the polling interval in milliseconds.
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn catch_up(mut self, mode: CatchUpMode) -> Self {
        self.config.catch_up = mode;
        self
    }

    pub fn reorg_policy(mut self, policy: ReorgPolicy) -> Self {
        self.config.reorg_policy = policy;
        self
    }

    /// Set the first block for sequential catch-up.
    pub fn start_block(mut self, block: i64) -> Self {
        self.config.start_block = Some(block);
        self
    }

    pub fn max_blocks_per_tick(mut self, n: u64) -> Self {
        self.config.max_blocks_per_tick = n;
        self
    }

    /// Record the engine's log events under `span` instead of the default
    /// `sync{chain=..}` span.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Build the `SyncConfig`.
    pub fn build_config(self) -> SyncConfig {
        self.config
    }

    /// Build an idle engine over `client` and `storage`.
    pub fn build<C: ChainClient>(self, client: C, storage: Arc<dyn Storage>) -> SyncEngine<C> {
        let engine = SyncEngine::new(self.config, client, storage);
        match self.span {
            Some(span) => engine.with_span(span),
            None => engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockChain;
    use blockwatch_core::state::EngineState;
    use blockwatch_storage::InMemoryRegistry;

    #[test]
    fn builder_defaults() {
        let cfg = SyncEngineBuilder::new().build_config();
        assert_eq!(cfg.chain, "ethereum");
        assert_eq!(cfg.poll_interval_ms, 1_000);
        assert_eq!(cfg.catch_up, CatchUpMode::JumpToHead);
        assert_eq!(cfg.reorg_policy, ReorgPolicy::Halt);
        assert_eq!(cfg.start_block, None);
        assert_eq!(cfg.max_blocks_per_tick, 100);
    }

    #[test]
    fn builder_custom() {
        let cfg = SyncEngineBuilder::new()
            .chain("sepolia")
            .poll_interval_ms(250)
            .catch_up(CatchUpMode::Sequential)
            .reorg_policy(ReorgPolicy::Resume)
            .start_block(42)
            .max_blocks_per_tick(8)
            .build_config();

        assert_eq!(cfg.chain, "sepolia");
        assert_eq!(cfg.poll_interval_ms, 250);
        assert_eq!(cfg.catch_up, CatchUpMode::Sequential);
        assert_eq!(cfg.reorg_policy, ReorgPolicy::Resume);
        assert_eq!(cfg.start_block, Some(42));
        assert_eq!(cfg.max_blocks_per_tick, 8);
    }

    #[test]
    fn build_produces_idle_engine() {
        let engine = SyncEngineBuilder::new()
            .chain("holesky")
            .span(tracing::info_span!("custom"))
            .build(MockChain::new(), Arc::new(InMemoryRegistry::new()));

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.config().chain, "holesky");
        assert!(engine.cursor().is_unset());
    }
}
