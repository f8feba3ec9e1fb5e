//! blockwatch-storage: storage backends for BlockWatch.
//!
//! Backends:
//! - [`memory`]: in-memory registry (no persistence; rebuilt on every start)

pub mod memory;

pub use memory::InMemoryRegistry;
