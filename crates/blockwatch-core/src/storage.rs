//! The `Storage` trait: the address/transaction registry contract.

use crate::address::Address;
use crate::error::SyncError;
use crate::types::Transaction;

/// Thread-safe registry of watched addresses and their transactions.
///
/// The engine writes through [`Storage::commit_block`]; readers call the
/// query methods from any thread. Implementations serialize every call
/// through a single critical section and never block on I/O while holding
/// it.
///
/// Address arguments of the `&str` methods are expected in normalized form
/// (see [`Address`]).
pub trait Storage: Send + Sync {
    /// Start watching `address`.
    ///
    /// Returns [`SyncError::AlreadySubscribed`] if it is already watched.
    fn store_address(&self, address: &Address) -> Result<(), SyncError>;

    /// Returns `true` if `address` is watched.
    fn is_observed(&self, address: &str) -> bool;

    /// Append `tx` to the sequence kept for `address`.
    fn store_transaction(&self, address: &str, tx: Transaction);

    /// Transactions recorded for `address` in discovery order. Empty when
    /// the address is unknown.
    fn transactions_for(&self, address: &str) -> Vec<Transaction>;

    /// Number of the last committed block, or `SyncCursor::UNSET`.
    fn current_block(&self) -> i64;

    /// Store every transaction under each watched side and advance the
    /// cursor to `block_number`, atomically with respect to readers.
    ///
    /// Returns the number of (address, transaction) entries appended.
    fn commit_block(&self, block_number: i64, transactions: &[Transaction]) -> usize;

    /// Number of watched addresses.
    fn observed_count(&self) -> usize;
}
