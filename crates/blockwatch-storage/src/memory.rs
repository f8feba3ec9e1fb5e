//! In-memory storage backend.
//!
//! Keeps watched addresses, matched transactions and the visible cursor in
//! RAM behind one mutex. All data is lost when the process exits.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use blockwatch_core::address::Address;
use blockwatch_core::cursor::SyncCursor;
use blockwatch_core::error::SyncError;
use blockwatch_core::storage::Storage;
use blockwatch_core::types::Transaction;

#[derive(Debug)]
struct RegistryState {
    observed: HashSet<String>,
    transactions: HashMap<String, Vec<Transaction>>,
    current_block: i64,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            observed: HashSet::new(),
            transactions: HashMap::new(),
            current_block: SyncCursor::UNSET,
        }
    }
}

impl RegistryState {
    fn append(&mut self, address: &str, tx: Transaction) {
        self.transactions
            .entry(address.to_string())
            .or_default()
            .push(tx);
    }
}

/// In-memory address/transaction registry.
///
/// Address set, transaction map and cursor share one lock, so a block's
/// transactions become visible in the same instant as its cursor value.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    inner: Mutex<RegistryState>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        // No critical section panics between related writes; poison is benign.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the cursor and an address's transactions under one lock.
    pub fn snapshot(&self, address: &str) -> (i64, Vec<Transaction>) {
        let state = self.state();
        let txs = state.transactions.get(address).cloned().unwrap_or_default();
        (state.current_block, txs)
    }

    /// Total number of stored (address, transaction) entries.
    pub fn entry_count(&self) -> usize {
        self.state().transactions.values().map(Vec::len).sum()
    }
}

impl Storage for InMemoryRegistry {
    fn store_address(&self, address: &Address) -> Result<(), SyncError> {
        let mut state = self.state();
        if !state.observed.insert(address.as_str().to_string()) {
            return Err(SyncError::AlreadySubscribed(address.to_string()));
        }
        tracing::debug!(address = %address, "watching address");
        Ok(())
    }

    fn is_observed(&self, address: &str) -> bool {
        self.state().observed.contains(address)
    }

    fn store_transaction(&self, address: &str, tx: Transaction) {
        self.state().append(address, tx);
    }

    fn transactions_for(&self, address: &str) -> Vec<Transaction> {
        self.state()
            .transactions
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    fn current_block(&self) -> i64 {
        self.state().current_block
    }

    fn commit_block(&self, block_number: i64, transactions: &[Transaction]) -> usize {
        let mut state = self.state();
        let mut appended = 0;

        for tx in transactions {
            if state.observed.contains(&tx.from) {
                state.append(&tx.from, tx.clone());
                appended += 1;
            }
            if let Some(to) = &tx.to {
                if state.observed.contains(to) {
                    state.append(to, tx.clone());
                    appended += 1;
                }
            }
        }

        if block_number > state.current_block {
            state.current_block = block_number;
        }
        appended
    }

    fn observed_count(&self) -> usize {
        self.state().observed.len()
    }
}
