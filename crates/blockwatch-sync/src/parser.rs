//! Synchronous query facade over the registry.

use std::sync::Arc;

use tokio::sync::watch;

use blockwatch_core::address::Address;
use blockwatch_core::error::SyncError;
use blockwatch_core::state::EngineState;
use blockwatch_core::storage::Storage;
use blockwatch_core::types::Transaction;

use crate::metrics::{MetricsHandle, SyncMetrics};

/// Query surface exposed to API layers.
///
/// All methods are synchronous and callable from any thread while the
/// engine is running.
pub trait Parser: Send + Sync {
    /// Last committed block number, or `-1` before the first block.
    fn current_block(&self) -> i64;

    /// Watch `address`. Returns `false` for malformed or already-watched
    /// addresses.
    fn subscribe(&self, address: &str) -> bool;

    /// Transactions touching `address` in discovery order.
    fn transactions(&self, address: &str) -> Vec<Transaction>;
}

/// [`Parser`] backed by a shared [`Storage`] and the engine's published
/// state.
#[derive(Clone)]
pub struct BlockParser {
    storage: Arc<dyn Storage>,
    state: watch::Receiver<EngineState>,
    metrics: MetricsHandle,
}

impl BlockParser {
    pub fn new(
        storage: Arc<dyn Storage>,
        state: watch::Receiver<EngineState>,
        metrics: MetricsHandle,
    ) -> Self {
        Self {
            storage,
            state,
            metrics,
        }
    }

    /// Like [`Parser::subscribe`], but says why a subscription was refused.
    pub fn try_subscribe(&self, address: &str) -> Result<Address, SyncError> {
        let address = Address::parse(address)?;
        self.storage.store_address(&address)?;
        tracing::info!(address = %address, "address subscribed");
        Ok(address)
    }

    pub fn state(&self) -> EngineState {
        self.state.borrow().clone()
    }

    pub fn metrics(&self) -> SyncMetrics {
        self.metrics.snapshot()
    }

    pub fn watched_count(&self) -> usize {
        self.storage.observed_count()
    }
}

impl Parser for BlockParser {
    fn current_block(&self) -> i64 {
        self.storage.current_block()
    }

    fn subscribe(&self, address: &str) -> bool {
        self.try_subscribe(address).is_ok()
    }

    fn transactions(&self, address: &str) -> Vec<Transaction> {
        match Address::parse(address) {
            Ok(address) => self.storage.transactions_for(address.as_str()),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwatch_storage::InMemoryRegistry;

    fn parser() -> (BlockParser, Arc<InMemoryRegistry>) {
        let registry = Arc::new(InMemoryRegistry::new());
        let (_tx, rx) = watch::channel(EngineState::Idle);
        let storage: Arc<dyn Storage> = registry.clone();
        (BlockParser::new(storage, rx, MetricsHandle::new()), registry)
    }

    fn tx(hash: &str, from: &str, to: &str, block_number: i64) -> Transaction {
        Transaction {
            hash: hash.into(),
            from: from.into(),
            to: Some(to.into()),
            value: "0x1".into(),
            block_number,
        }
    }

    #[test]
    fn fresh_parser_reports_unset_cursor() {
        let (p, _) = parser();
        assert_eq!(p.current_block(), -1);
        assert_eq!(p.state(), EngineState::Idle);
        assert_eq!(p.watched_count(), 0);
    }

    #[test]
    fn subscribe_rejects_malformed_and_duplicates() {
        let (p, _) = parser();
        assert!(!p.subscribe("0xG"));
        assert_eq!(p.watched_count(), 0);

        assert!(p.subscribe("0xAbC"));
        assert!(!p.subscribe("abc"), "same address without prefix");
        assert_eq!(p.watched_count(), 1);
    }

    #[test]
    fn try_subscribe_reports_reason() {
        let (p, _) = parser();
        assert_eq!(
            p.try_subscribe("zz"),
            Err(SyncError::InvalidAddress("zz".into()))
        );
        assert_eq!(p.try_subscribe("0x01").unwrap().as_str(), "0x01");
        assert!(matches!(
            p.try_subscribe("0x01"),
            Err(SyncError::AlreadySubscribed(_))
        ));
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let (p, registry) = parser();
        p.subscribe("0xaa");
        registry.commit_block(3, &[tx("0x1", "0xaa", "0xbb", 3)]);

        assert_eq!(p.transactions("0xAA").len(), 1);
        assert_eq!(p.transactions("AA").len(), 1);
        assert!(p.transactions("0xbb").is_empty());
        assert!(p.transactions("not-hex").is_empty());
        assert_eq!(p.current_block(), 3);
    }

    #[test]
    fn usable_as_trait_object() {
        let (p, _) = parser();
        let facade: Arc<dyn Parser> = Arc::new(p);
        assert!(facade.subscribe("0x1"));
        assert!(facade.transactions("0x1").is_empty());
    }
}
